use std::{ops::Deref, time::Duration};

use crate::{parser::YtHtmlDocument, yt::ChannelScraper};

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain HTTP page fetcher shared by document sources and channel scraping.
#[derive(Debug, Clone)]
pub struct Scraper(pub reqwest::Client);

impl Scraper {
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Scraper(client))
    }
}

impl Default for Scraper {
    fn default() -> Self {
        Scraper::with_timeout(DEFAULT_HTTP_TIMEOUT).unwrap_or_else(|_| Scraper(reqwest::Client::new()))
    }
}

impl Deref for Scraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ChannelScraper for Scraper {
    async fn scrape_page(&self, url: &str) -> anyhow::Result<YtHtmlDocument> {
        let yt_html_document = self
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?
            .error_for_status()?
            .text()
            .await?;

        Ok(yt_html_document.into())
    }
}

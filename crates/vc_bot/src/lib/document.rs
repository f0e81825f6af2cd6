use std::future::Future;

use itertools::Itertools;
use scraper::Html;

use crate::yt::scraper::Scraper;

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub trait DocumentFetcher {
    /// Raw markup of the page at `url`.
    fn fetch_document(&self, url: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

impl DocumentFetcher for Scraper {
    async fn fetch_document(&self, url: &str) -> anyhow::Result<String> {
        let body = self
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }
}

/// Visible text of an HTML page in document order, one text node per line.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| text.trim()))
        .filter(|text| !text.is_empty())
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_text_in_document_order() {
        let html = r#"
            <html>
              <head><title>Founder Fit</title><style>body { color: red; }</style></head>
              <body>
                <h1>Founder Fit and Outreach</h1>
                <p>Investors look for <b>founder-market fit</b>.</p>
                <script>window.notion = {"boot": true};</script>
                <noscript>Enable JavaScript</noscript>
                <ul><li>Warm intros</li><li>   </li><li>Cold email</li></ul>
              </body>
            </html>
        "#;

        assert_eq!(
            extract_visible_text(html),
            "Founder Fit\nFounder Fit and Outreach\nInvestors look for\nfounder-market fit\n.\nWarm intros\nCold email"
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(extract_visible_text("just words"), "just words");
        assert_eq!(extract_visible_text(""), "");
    }
}

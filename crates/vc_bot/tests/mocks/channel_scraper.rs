use std::sync::{Arc, Mutex};
use vc_bot::{parser::YtHtmlDocument, yt::ChannelScraper};

#[derive(Clone)]
pub struct MockChannelScraper {
    pub channel_html: String,
    pub videos_html: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockChannelScraper {
    /// A handle page exposing `channel_id` and a videos tab listing `video_ids`.
    pub fn channel(channel_id: &str, video_ids: &[&str]) -> Self {
        let items = video_ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "richItemRenderer": { "content": { "videoRenderer": { "videoId": id } } }
                })
            })
            .collect::<Vec<_>>();
        let initial_data = serde_json::json!({
            "contents": { "twoColumnBrowseResultsRenderer": { "tabs": [
                { "tabRenderer": { "title": "Home" } },
                { "tabRenderer": { "title": "Videos", "content": { "richGridRenderer": { "contents": items } } } }
            ] } }
        });

        Self {
            channel_html: format!(
                r#"<html><script>var ytInitialData = {{"metadata":{{"channelMetadataRenderer":{{"channelId":"{channel_id}"}}}}}};</script></html>"#
            ),
            videos_html: format!(
                r#"<html><script nonce="x">var ytInitialData = {initial_data};</script></html>"#
            ),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn without_channel_id() -> Self {
        Self {
            channel_html: "<html><body>This page isn't available</body></html>".into(),
            ..Self::channel("UCaaaaaaaaaaaaaaaaaaaaaa", &[])
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::channel("UCaaaaaaaaaaaaaaaaaaaaaa", &[])
        }
    }
}

impl ChannelScraper for MockChannelScraper {
    async fn scrape_page(&self, url: &str) -> anyhow::Result<YtHtmlDocument> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        let html = if url.ends_with("/videos") {
            &self.videos_html
        } else {
            &self.channel_html
        };
        Ok(YtHtmlDocument::new(html.clone()))
    }
}

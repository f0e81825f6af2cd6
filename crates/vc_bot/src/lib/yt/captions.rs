use anyhow::Context;
use serde_json::Value;
use transcript_store::{Segment, VideoId};

use crate::{
    parser::{caption_tracks, pick_caption_track, timed_text_segments, YtHtmlDocument},
    types::TimedText,
    yt::{TranscriptFetcher, YOUTUBE_BASE_URL},
};

/// Reads captions the way the YouTube web player does: the watch page lists
/// the caption tracks, and the chosen track is downloaded as json3 timedtext.
#[derive(Debug, Clone)]
pub struct CaptionFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl CaptionFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: YOUTUBE_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> anyhow::Result<YtHtmlDocument> {
        let page = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id.as_str())])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?
            .error_for_status()?
            .text()
            .await?;

        Ok(page.into())
    }
}

impl TranscriptFetcher for CaptionFetcher {
    #[tracing::instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_transcript(&self, video_id: &VideoId) -> anyhow::Result<Vec<Segment>> {
        let page = self.fetch_watch_page(video_id).await?;
        let player_response = page
            .player_response::<Value>()
            .context("Watch page did not contain a player response")?;

        let tracks = caption_tracks(&player_response)?;
        let track = pick_caption_track(&tracks)
            .with_context(|| format!("No captions available for {video_id}"))?;
        tracing::debug!(language = %track.language_code, generated = track.is_generated(), "Selected caption track");

        let timed_text = self
            .client
            .get(&track.base_url)
            .query(&[("fmt", "json3")])
            .send()
            .await?
            .error_for_status()?
            .json::<TimedText>()
            .await
            .context("Failed to decode caption track")?;

        let segments = timed_text_segments(timed_text);
        if segments.is_empty() {
            anyhow::bail!("Caption track for {video_id} is empty");
        }

        Ok(segments)
    }
}

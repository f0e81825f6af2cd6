pub mod captions;
pub mod scraper;

use std::future::Future;

use transcript_store::{Segment, VideoId};

use crate::parser::YtHtmlDocument;

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

pub trait ChannelScraper {
    /// Fetches a channel (or channel tab) page.
    fn scrape_page(&self, url: &str) -> impl Future<Output = anyhow::Result<YtHtmlDocument>> + Send;
}

pub trait TranscriptFetcher {
    /// Retrieves the caption segments of a single video. Fails when the video
    /// has no captions or the request is refused.
    fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = anyhow::Result<Vec<Segment>>> + Send;
}

pub fn channel_videos_url(channel_id: &str) -> String {
    format!("{YOUTUBE_BASE_URL}/channel/{channel_id}/videos")
}

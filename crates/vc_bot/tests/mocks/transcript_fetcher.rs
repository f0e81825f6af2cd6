use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use transcript_store::{Segment, VideoId};
use vc_bot::yt::TranscriptFetcher;

#[derive(Clone, Default)]
pub struct MockTranscriptFetcher {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub failing_ids: HashSet<String>,
}

impl MockTranscriptFetcher {
    pub fn failing_for(video_ids: &[&str]) -> Self {
        Self {
            failing_ids: video_ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Segments served for `video_id`.
    pub fn segments_for(video_id: &str) -> Vec<Segment> {
        vec![
            Segment {
                text: format!("{video_id} opening remarks"),
                start: 0.0,
                duration: 2.5,
            },
            Segment {
                text: "Raise when you have traction".into(),
                start: 2.5,
                duration: 3.0,
            },
        ]
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    async fn fetch_transcript(&self, video_id: &VideoId) -> anyhow::Result<Vec<Segment>> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if self.failing_ids.contains(video_id.as_str()) {
            anyhow::bail!("Transcripts are disabled for {video_id}");
        }
        Ok(Self::segments_for(video_id))
    }
}

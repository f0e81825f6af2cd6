use std::{collections::HashSet, future::Future};

use crate::{Transcript, VideoId};

pub mod fs;

pub trait TranscriptStore {
    fn get_existing_video_ids(
        &self,
        video_ids: &[&str],
    ) -> impl Future<Output = anyhow::Result<HashSet<String>>> + Send;

    fn get_transcript(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = anyhow::Result<Option<Transcript>>> + Send;

    /// Persists `transcript` unless an entry for its video already exists.
    /// Existing entries are never overwritten.
    fn insert_transcript(
        &self,
        transcript: &Transcript,
    ) -> impl Future<Output = anyhow::Result<InsertOutcome>> + Send;

    /// Every readable entry. Order is unspecified.
    fn load_all(&self) -> impl Future<Output = anyhow::Result<Vec<Transcript>>> + Send;
}

impl<T: TranscriptStore + Send + Sync> TranscriptStore for &T {
    async fn get_existing_video_ids(&self, video_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        (**self).get_existing_video_ids(video_ids).await
    }

    async fn get_transcript(&self, video_id: &VideoId) -> anyhow::Result<Option<Transcript>> {
        (**self).get_transcript(video_id).await
    }

    async fn insert_transcript(&self, transcript: &Transcript) -> anyhow::Result<InsertOutcome> {
        (**self).insert_transcript(transcript).await
    }

    async fn load_all(&self) -> anyhow::Result<Vec<Transcript>> {
        (**self).load_all().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyCached,
}

use anyhow::anyhow;
use itertools::Itertools;
use transcript_store::TranscriptStore;

use crate::{
    cache::TranscriptCache,
    document::{extract_visible_text, DocumentFetcher},
    error::Error,
    prompt::{truncate_chars, DOCUMENT_CONTEXT_CHARS, LIBRARY_CONTEXT_CHARS},
    registry::{Source, SourceKind},
    resolve::extract_video_id,
    yt::TranscriptFetcher,
};

/// Turns a [`Source`] into the raw text handed to the prompt composer.
#[derive(Debug)]
pub struct ContextFetcher<D, S, F>
where
    D: DocumentFetcher + Send + Sync,
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    documents: D,
    cache: TranscriptCache<S, F>,
}

impl<D, S, F> ContextFetcher<D, S, F>
where
    D: DocumentFetcher + Send + Sync,
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    pub fn new(documents: D, cache: TranscriptCache<S, F>) -> Self {
        Self { documents, cache }
    }

    pub fn cache(&self) -> &TranscriptCache<S, F> {
        &self.cache
    }

    #[tracing::instrument(skip(self), fields(source = %source.name, kind = %source.kind))]
    pub async fn fetch(&self, source: &Source) -> Result<String, Error> {
        let text = match source.kind {
            SourceKind::Document => {
                let html = self
                    .documents
                    .fetch_document(&source.locator)
                    .await
                    .map_err(|e| Error::Fetch {
                        locator: source.locator.clone(),
                        source: e,
                    })?;
                extract_visible_text(&html)
            }
            SourceKind::Transcript => {
                let video_id =
                    extract_video_id(&source.locator).ok_or_else(|| Error::Fetch {
                        locator: source.locator.clone(),
                        source: anyhow!("no YouTube video id in URL"),
                    })?;
                self.cache.get_or_fetch(&video_id).await?.text()
            }
        };

        Ok(truncate_chars(&text, DOCUMENT_CONTEXT_CHARS).to_string())
    }

    /// Like [`ContextFetcher::fetch`], but a failure yields an empty context so
    /// the question can still be answered.
    pub async fn fetch_or_empty(&self, source: &Source) -> String {
        self.fetch(source)
            .await
            .inspect_err(|e| {
                tracing::warn!(source = %source.name, error = ?e, "Falling back to empty context")
            })
            .unwrap_or_default()
    }

    /// Every cached transcript, labeled by video id, within the library budget.
    pub async fn library_context(&self) -> String {
        let transcripts = match self.cache.load_all().await {
            Ok(transcripts) => transcripts,
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to load transcript library");
                return String::new();
            }
        };

        let combined = transcripts
            .iter()
            .sorted_by(|a, b| a.video_id.cmp(&b.video_id))
            .map(|t| format!("[{}]\n{}", t.video_id, t.text()))
            .join("\n\n");

        truncate_chars(&combined, LIBRARY_CONTEXT_CHARS).to_string()
    }
}

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use transcript_store::{InsertOutcome, Transcript, TranscriptStore, VideoId};

use crate::{
    error::Error,
    parser::parse_video_ids,
    resolve::{channel_id_from_url, normalize_channel_locator},
    yt::{channel_videos_url, ChannelScraper, TranscriptFetcher},
};

/// Outcome of a channel-wide transcript sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkFetchReport {
    pub channel_id: String,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

/// Read-through transcript cache: lookups hit the store first and only go to
/// the network for videos never seen before.
#[derive(Debug)]
pub struct TranscriptCache<S, F>
where
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    store: S,
    fetcher: F,
}

impl<S, F> TranscriptCache<S, F>
where
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn load_all(&self) -> Result<Vec<Transcript>, Error> {
        self.store.load_all().await.map_err(Error::Store)
    }

    #[tracing::instrument(skip(self), fields(video_id = %video_id))]
    pub async fn get_or_fetch(&self, video_id: &VideoId) -> Result<Transcript, Error> {
        if let Some(transcript) = self
            .store
            .get_transcript(video_id)
            .await
            .map_err(Error::Store)?
        {
            tracing::debug!("Transcript cache hit");
            return Ok(transcript);
        }

        let segments = self
            .fetcher
            .fetch_transcript(video_id)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to retrieve transcript"))
            .map_err(|source| Error::CacheMiss {
                video_id: video_id.to_string(),
                source,
            })?;

        let transcript = Transcript::new(video_id.clone(), segments);
        if self
            .store
            .insert_transcript(&transcript)
            .await
            .map_err(Error::Store)?
            == InsertOutcome::AlreadyCached
        {
            // lost a race with another writer; the stored entry wins
            if let Some(cached) = self
                .store
                .get_transcript(video_id)
                .await
                .map_err(Error::Store)?
            {
                return Ok(cached);
            }
        }

        tracing::info!(segments = transcript.segments.len(), "Saved transcript");
        Ok(transcript)
    }

    /// Resolves `channel_locator` to a channel id, lists its videos and caches
    /// the transcript of every video not cached yet. Per-video failures are
    /// counted and logged; they never abort the batch.
    #[tracing::instrument(skip(self, scraper, cancel))]
    pub async fn bulk_fetch<P>(
        &self,
        scraper: &P,
        channel_locator: &str,
        cancel: &CancellationToken,
    ) -> Result<BulkFetchReport, Error>
    where
        P: ChannelScraper + Send + Sync,
    {
        let channel_id = self.resolve_channel(scraper, channel_locator).await?;

        let videos_url = channel_videos_url(&channel_id);
        let videos_page = scraper
            .scrape_page(&videos_url)
            .await
            .map_err(|source| Error::Fetch {
                locator: videos_url.clone(),
                source,
            })?;
        let json = videos_page.to_json::<Value>()?;
        let video_ids = parse_video_ids(&json)?;
        tracing::info!(%channel_id, count = video_ids.len(), "Listed channel videos");

        let id_refs = video_ids.iter().map(|id| id.as_str()).collect::<Vec<_>>();
        let existing = self
            .store
            .get_existing_video_ids(&id_refs)
            .await
            .map_err(Error::Store)?;

        let mut report = BulkFetchReport {
            channel_id,
            ..Default::default()
        };

        for video_id in &video_ids {
            if existing.contains(video_id.as_str()) {
                tracing::debug!(%video_id, "Already have transcript");
                report.skipped += 1;
                continue;
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("Bulk fetch cancelled");
                    report.cancelled = true;
                    break;
                }
                outcome = self.get_or_fetch(video_id) => outcome,
            };

            match outcome {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    tracing::warn!(%video_id, error = %e, "Failed to cache transcript");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "Bulk fetch finished"
        );

        Ok(report)
    }

    async fn resolve_channel<P>(&self, scraper: &P, channel_locator: &str) -> Result<String, Error>
    where
        P: ChannelScraper + Send + Sync,
    {
        if let Some(channel_id) = channel_id_from_url(channel_locator) {
            return Ok(channel_id);
        }

        let url = normalize_channel_locator(channel_locator);
        let page = scraper
            .scrape_page(&url)
            .await
            .map_err(|source| Error::Fetch {
                locator: url.clone(),
                source,
            })?;

        page.channel_id()
            .ok_or_else(|| Error::ChannelResolution(channel_locator.to_string()))
    }
}

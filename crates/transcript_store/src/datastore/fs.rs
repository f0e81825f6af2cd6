use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{datastore::TranscriptStore, InsertOutcome, Segment, Transcript, VideoId};

/// Transcript cache backed by a directory of `<video_id>.json` files, each
/// holding the JSON array of caption segments.
#[derive(Debug, Clone)]
pub struct FsTranscriptStore {
    root: PathBuf,
}

impl FsTranscriptStore {
    /// Opens the cache at `root`, creating the directory if needed.
    pub async fn init(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();

        tokio::fs::create_dir_all(&root)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, path = ?root, "Failed to create transcripts directory"))
            .with_context(|| format!("Failed to create transcripts directory {}", root.display()))?;

        let store = FsTranscriptStore { root };
        store.remove_stale_temp_files().await;

        Ok(store)
    }

    /// Clears half-written entries left by an interrupted insert.
    async fn remove_stale_temp_files(&self) {
        let Ok(mut entries) = tokio::fs::read_dir(&self.root).await else {
            return;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') && name.ends_with(".json.tmp") {
                tracing::debug!(file = %name, "Removing stale temp file");
                let _ = tokio::fs::remove_file(entry.path()).await;
            }
        }
    }

    fn temp_path(&self, video_id: &str) -> PathBuf {
        self.root.join(format!(".{video_id}.json.tmp"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, video_id: &str) -> PathBuf {
        self.root.join(format!("{video_id}.json"))
    }

    async fn read_entry(&self, video_id: VideoId, path: &Path) -> anyhow::Result<Transcript> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let segments = serde_json::from_str::<Vec<Segment>>(&raw)
            .with_context(|| format!("Malformed transcript file {}", path.display()))?;

        Ok(Transcript::new(video_id, segments))
    }
}

impl TranscriptStore for FsTranscriptStore {
    async fn get_existing_video_ids(&self, video_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        let mut existing = HashSet::new();

        for video_id in video_ids {
            if tokio::fs::try_exists(self.entry_path(video_id))
                .await
                .context("Failed to check transcript cache")?
            {
                existing.insert(video_id.to_string());
            }
        }

        Ok(existing)
    }

    async fn get_transcript(&self, video_id: &VideoId) -> anyhow::Result<Option<Transcript>> {
        let path = self.entry_path(video_id);

        match self.read_entry(video_id.clone(), &path).await {
            Ok(transcript) => Ok(Some(transcript)),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == ErrorKind::NotFound) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip_all, fields(video_id = %transcript.video_id))]
    async fn insert_transcript(&self, transcript: &Transcript) -> anyhow::Result<InsertOutcome> {
        let path = self.entry_path(&transcript.video_id);

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("Transcript already cached at {}", path.display());
            return Ok(InsertOutcome::AlreadyCached);
        }

        // entries only become visible once fully written
        let tmp_path = self.temp_path(&transcript.video_id);
        let body = serde_json::to_vec(&transcript.segments)?;

        let written: anyhow::Result<()> = async {
            tokio::fs::write(&tmp_path, body)
                .await
                .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
            tokio::fs::rename(&tmp_path, &path)
                .await
                .with_context(|| format!("Failed to move transcript into {}", path.display()))
        }
        .await;

        if let Err(e) = written {
            tracing::error!(error = ?e, "Failed to write transcript");
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        tracing::debug!(segments = transcript.segments.len(), "Saved transcript");

        Ok(InsertOutcome::Inserted)
    }

    async fn load_all(&self) -> anyhow::Result<Vec<Transcript>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to list transcripts directory"),
        };

        let mut transcripts = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(video_id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(VideoId::parse)
            else {
                continue;
            };

            match self.read_entry(video_id, &path).await {
                Ok(transcript) => transcripts.push(transcript),
                Err(e) => {
                    tracing::warn!(error = ?e, path = ?path, "Skipping unreadable transcript")
                }
            }
        }

        Ok(transcripts)
    }
}

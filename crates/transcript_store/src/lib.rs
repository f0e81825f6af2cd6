//! # Transcript Store
//!
//! Persistent cache of YouTube caption transcripts, one JSON file per video.
//!
//! Entries are written once and never overwritten; there is no expiry. The
//! [`TranscriptStore`] trait abstracts the cache so the fetch pipeline can be
//! exercised against in-memory doubles.

mod datastore;
mod domain;

pub use datastore::fs::FsTranscriptStore;
pub use datastore::{InsertOutcome, TranscriptStore};
pub use domain::{Segment, Transcript, VideoId};

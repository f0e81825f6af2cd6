use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch {locator}")]
    Fetch {
        locator: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("No cached transcript for {video_id} and retrieval failed")]
    CacheMiss {
        video_id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Could not resolve a channel id from {0}")]
    ChannelResolution(String),
    #[error("Completion request failed")]
    Completion(#[source] anyhow::Error),
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("Unexpected JSON structure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown source: {0}")]
    UnknownSource(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("Transcript cache error")]
    Store(#[source] anyhow::Error),
}

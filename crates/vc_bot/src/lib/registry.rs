use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const NOTION_DOC_NAME: &str = "Notion VC Doc";
pub const NOTION_DOC_URL: &str =
    "https://thevcfellowship.notion.site/Founder-Fit-and-Outreach-d044466772c340e7b9bced2c2042089d";
pub const EXAMPLE_VIDEO_NAME: &str = "YouTube: Example Startup";
pub const EXAMPLE_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
/// History label for answers drawn from every cached transcript. Reserved.
pub const LIBRARY_SOURCE_NAME: &str = "Transcript library";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[serde(alias = "notion")]
    Document,
    #[serde(alias = "youtube")]
    Transcript,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Document => f.write_str("document"),
            SourceKind::Transcript => f.write_str("transcript"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "notion" | "doc" => Ok(SourceKind::Document),
            "transcript" | "youtube" | "video" => Ok(SourceKind::Transcript),
            other => Err(RegistryError::UnknownKind(other.to_string())),
        }
    }
}

/// A named knowledge location. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(rename = "url")]
    pub locator: String,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        kind: SourceKind,
        locator: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let name = name.into().trim().to_string();
        let locator = locator.into().trim().to_string();

        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        Url::parse(&locator).map_err(|_| RegistryError::InvalidLocator(locator.clone()))?;

        Ok(Source {
            name,
            kind,
            locator,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("A source named {0:?} already exists")]
    DuplicateName(String),
    #[error("Source name must not be empty")]
    EmptyName,
    #[error("Not a valid URL: {0}")]
    InvalidLocator(String),
    #[error("Unknown source type {0:?}, expected document or transcript")]
    UnknownKind(String),
    #[error("{0:?} is reserved for the transcript library")]
    ReservedName(String),
}

/// Insertion-ordered set of sources keyed by name. There is no removal.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two sources the bot ships with.
    pub fn with_defaults() -> Self {
        let defaults = [
            (NOTION_DOC_NAME, SourceKind::Document, NOTION_DOC_URL),
            (EXAMPLE_VIDEO_NAME, SourceKind::Transcript, EXAMPLE_VIDEO_URL),
        ];

        SourceRegistry {
            sources: defaults
                .into_iter()
                .map(|(name, kind, locator)| Source {
                    name: name.to_string(),
                    kind,
                    locator: locator.to_string(),
                })
                .collect(),
        }
    }

    pub fn add(&mut self, source: Source) -> Result<&Source, RegistryError> {
        if source.name == LIBRARY_SOURCE_NAME {
            return Err(RegistryError::ReservedName(source.name));
        }
        if self.get(&source.name).is_some() {
            return Err(RegistryError::DuplicateName(source.name));
        }

        tracing::info!(name = %source.name, kind = %source.kind, "Registered source");
        self.sources.push(source);

        Ok(&self.sources[self.sources.len() - 1])
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn first(&self) -> Option<&Source> {
        self.sources.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_declaration_order() {
        let registry = SourceRegistry::with_defaults();
        let names = registry.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();

        assert_eq!(names, vec![NOTION_DOC_NAME, EXAMPLE_VIDEO_NAME]);
        assert_eq!(
            registry.get(EXAMPLE_VIDEO_NAME).unwrap().kind,
            SourceKind::Transcript
        );
    }

    #[test]
    fn test_add_rejects_duplicate_names() {
        let mut registry = SourceRegistry::with_defaults();
        let clash = Source::new(NOTION_DOC_NAME, SourceKind::Document, "https://example.com").unwrap();

        let err = registry.add(clash).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == NOTION_DOC_NAME));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(NOTION_DOC_NAME).unwrap().locator, NOTION_DOC_URL);
    }

    #[test]
    fn test_add_rejects_library_name() {
        let mut registry = SourceRegistry::with_defaults();
        let shadow = Source::new(
            LIBRARY_SOURCE_NAME,
            SourceKind::Document,
            "https://example.com/library",
        )
        .unwrap();

        assert!(matches!(
            registry.add(shadow),
            Err(RegistryError::ReservedName(name)) if name == LIBRARY_SOURCE_NAME
        ));
        assert!(registry.get(LIBRARY_SOURCE_NAME).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_add_appends_new_source() {
        let mut registry = SourceRegistry::new();
        let source = Source::new(
            "  Pitch talk ",
            SourceKind::Transcript,
            "https://youtu.be/dQw4w9WgXcQ",
        )
        .unwrap();

        let added = registry.add(source).unwrap();
        assert_eq!(added.name, "Pitch talk");
        assert_eq!(registry.first().unwrap().name, "Pitch talk");
    }

    #[test]
    fn test_source_validation() {
        assert!(matches!(
            Source::new(" ", SourceKind::Document, "https://example.com"),
            Err(RegistryError::EmptyName)
        ));
        assert!(matches!(
            Source::new("doc", SourceKind::Document, "not a url"),
            Err(RegistryError::InvalidLocator(_))
        ));
    }

    #[test]
    fn test_kind_parsing_accepts_legacy_names() {
        assert_eq!("notion".parse::<SourceKind>().unwrap(), SourceKind::Document);
        assert_eq!("YouTube".parse::<SourceKind>().unwrap(), SourceKind::Transcript);
        assert!("pdf".parse::<SourceKind>().is_err());

        let source: Source = serde_json::from_str(
            r#"{"name": "Talk", "type": "youtube", "url": "https://youtu.be/dQw4w9WgXcQ"}"#,
        )
        .unwrap();
        assert_eq!(source.kind, SourceKind::Transcript);
    }
}

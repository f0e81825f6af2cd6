use std::path::Path;

use anyhow::Context;

use crate::registry::{Source, SourceRegistry};

/// Reads a JSON array of `{"name", "type", "url"}` objects.
pub fn load_sources_file(path: &Path) -> anyhow::Result<Vec<Source>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sources file {}", path.display()))?;
    let sources = serde_json::from_str::<Vec<Source>>(&raw)
        .with_context(|| format!("Malformed sources file {}", path.display()))?;

    sources
        .into_iter()
        .map(|s| Source::new(s.name, s.kind, s.locator).map_err(anyhow::Error::from))
        .collect()
}

/// Default sources, followed by those from `sources_file` if given.
pub fn build_registry(sources_file: Option<&Path>) -> anyhow::Result<SourceRegistry> {
    let mut registry = SourceRegistry::with_defaults();

    if let Some(path) = sources_file {
        for source in load_sources_file(path)? {
            registry
                .add(source)
                .with_context(|| format!("Invalid entry in {}", path.display()))?;
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SourceKind;

    #[test]
    fn test_build_registry_appends_file_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Pitch deck guide", "type": "document", "url": "https://example.com/guide"},
                {"name": "Demo day", "type": "youtube", "url": "https://youtu.be/aaaaaaaaaaa"}
            ]"#,
        )
        .unwrap();

        let registry = build_registry(Some(&path)).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.get("Demo day").unwrap().kind,
            SourceKind::Transcript
        );
    }

    #[test]
    fn test_build_registry_rejects_duplicates_and_bad_urls() {
        let dir = tempfile::tempdir().unwrap();

        let duplicate = dir.path().join("duplicate.json");
        std::fs::write(
            &duplicate,
            r#"[{"name": "Notion VC Doc", "type": "document", "url": "https://example.com"}]"#,
        )
        .unwrap();
        assert!(build_registry(Some(&duplicate)).is_err());

        let bad_url = dir.path().join("bad_url.json");
        std::fs::write(
            &bad_url,
            r#"[{"name": "Broken", "type": "document", "url": "nope"}]"#,
        )
        .unwrap();
        assert!(build_registry(Some(&bad_url)).is_err());
    }

    #[test]
    fn test_build_registry_without_file_uses_defaults() {
        assert_eq!(build_registry(None).unwrap().len(), 2);
    }
}

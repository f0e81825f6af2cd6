use chrono::{DateTime, Utc};

use crate::registry::SourceRegistry;

/// One answered question. The answer is stored as produced; it is never
/// recomputed when sources change later in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub source_name: String,
    pub question: String,
    pub answer: String,
    pub voice: bool,
    pub asked_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        source_name: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        voice: bool,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            question: question.into(),
            answer: answer.into(),
            voice,
            asked_at: Utc::now(),
        }
    }
}

/// Append-only log of a session's questions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops everything. Only called when the session ends.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Per-user state, owned by the caller and handed to every operation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub registry: SourceRegistry,
    pub history: History,
}

impl Session {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            history: History::new(),
        }
    }

    pub fn end(&mut self) {
        self.history.clear();
    }
}

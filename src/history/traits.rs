//! History store trait and entry type

use crate::model::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of entries kept.
pub const HISTORY_CAP: usize = 5;

/// Storage key holding the serialized entry list.
pub const HISTORY_KEY: &str = "anasi.history";

const SUMMARY_CHARS: usize = 140;
const SNIPPET_CHARS: usize = 80;

/// Errors that can occur during history operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// A past analysis, as listed in the history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub doc_date: Option<String>,
    /// First 140 characters of the summary.
    #[serde(default)]
    pub summary: String,
    /// First 80 characters of the analyzed text.
    #[serde(default)]
    pub snippet: String,
    pub data: AnalysisResult,
}

impl HistoryEntry {
    /// New entry stamped with a fresh id and the current time.
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            doc_date: result.doc_date.clone(),
            summary: truncate_chars(&result.summary, SUMMARY_CHARS),
            snippet: truncate_chars(
                result.original_text.as_deref().unwrap_or_default(),
                SNIPPET_CHARS,
            ),
            data: result.clone(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Persistent, bounded list of past analyses.
///
/// Entries are kept newest first. Implementations must be thread-safe.
pub trait HistoryStore: Send + Sync {
    /// All entries, newest first. Empty if nothing was stored yet.
    ///
    /// Unreadable content is discarded rather than reported.
    fn load_all(&self) -> HistoryResult<Vec<HistoryEntry>>;

    /// Prepend an entry, evict beyond `HISTORY_CAP`, and return the new list.
    fn append(&self, entry: HistoryEntry) -> HistoryResult<Vec<HistoryEntry>>;

    /// Remove every entry.
    fn clear(&self) -> HistoryResult<()>;

    /// Look up an entry by id.
    fn get(&self, id: &Uuid) -> HistoryResult<Option<HistoryEntry>> {
        Ok(self.load_all()?.into_iter().find(|e| &e.id == id))
    }
}

/// Trait for opening/creating a store
pub trait OpenStore: HistoryStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> HistoryResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> HistoryResult<Self>;
}

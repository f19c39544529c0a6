//! Persisted history of past analyses
//!
//! A bounded, most-recent-first list kept under a single storage key.

mod sqlite;
mod traits;

pub use sqlite::SqliteHistoryStore;
pub use traits::{
    HistoryEntry, HistoryError, HistoryResult, HistoryStore, OpenStore, HISTORY_CAP, HISTORY_KEY,
};

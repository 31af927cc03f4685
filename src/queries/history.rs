//! Search history backed by the key-value store.
//!
//! The history is a JSON array of `{query, timestamp}` objects under the
//! `ebaySearchHistory` key, most recent first, capped at
//! [`HISTORY_LIMIT`](crate::config::HISTORY_LIMIT) entries and free of
//! case-insensitive duplicates.

use std::cell::RefCell;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use crate::config;
use crate::error::Result;
use crate::models::HistoryEntry;
use crate::store::KeyValueStore;

// ---------------------------------------------------------------------------
// HistoryQuery
// ---------------------------------------------------------------------------

/// Read/append/clear interface over the stored search history.
pub struct HistoryQuery<'a> {
    store: &'a RefCell<KeyValueStore>,
}

impl<'a> HistoryQuery<'a> {
    /// Create a new `HistoryQuery` bound to the given store.
    pub fn new(store: &'a RefCell<KeyValueStore>) -> Self {
        Self { store }
    }

    /// All entries, most recent first.
    ///
    /// An unreadable stored value is logged and reads as an empty history.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let store = self.store.borrow();
        let Some(raw) = store.get(config::HISTORY_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "stored search history is unreadable; ignoring it");
                Vec::new()
            }
        }
    }

    /// The latest search, if any.
    pub fn most_recent(&self) -> Option<HistoryEntry> {
        self.list().into_iter().next()
    }

    /// Record a search made now. See [`record_at`](Self::record_at).
    pub fn record(&self, query: &str) -> Result<bool> {
        self.record_at(query, Utc::now())
    }

    /// Record a search made at `at`.
    ///
    /// Blank queries are ignored and `Ok(false)` is returned. Any earlier
    /// entry with the same query (ignoring case) is replaced by the new one
    /// at the front, and the list is truncated to the history limit.
    pub fn record_at(&self, query: &str, at: DateTime<Utc>) -> Result<bool> {
        if query.trim().is_empty() {
            return Ok(false);
        }

        let needle = query.to_lowercase();
        let mut entries: Vec<HistoryEntry> = self
            .list()
            .into_iter()
            .filter(|e| e.query.to_lowercase() != needle)
            .collect();

        entries.insert(
            0,
            HistoryEntry {
                query: query.to_string(),
                timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        );
        entries.truncate(config::HISTORY_LIMIT);

        let raw = serde_json::to_string(&entries)?;
        self.store.borrow_mut().set(config::HISTORY_KEY, raw)?;
        Ok(true)
    }

    /// Forget every recorded search.
    pub fn clear(&self) -> Result<()> {
        self.store.borrow_mut().remove(config::HISTORY_KEY)?;
        Ok(())
    }
}

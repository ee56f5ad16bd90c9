//! Wallpaper history
//!
//! A capped, most-recent-first list of applied wallpapers, stored as one
//! JSON document. Re-applying a wallpaper that is already in the history
//! moves it to the front instead of adding a second entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use wallshift_util::Target;

use crate::{KvStore, StoreResult};

/// Maximum number of history entries kept.
pub const HISTORY_CAP: usize = 20;

const HISTORY_KEY: &str = "history";

/// One applied wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub path: String,
    pub target: Target,
    pub applied_at: DateTime<Utc>,
    /// Label of the slot that triggered the apply; `None` for manual picks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_label: Option<String>,
}

/// History persistence, layered over the key-value store.
pub struct HistoryStore<'a> {
    kv: &'a KvStore,
}

impl<'a> HistoryStore<'a> {
    pub fn new(kv: &'a KvStore) -> Self {
        Self { kv }
    }

    /// Entries, most recent first. A corrupt document yields an empty
    /// history rather than an error.
    pub fn list(&self) -> StoreResult<Vec<HistoryEntry>> {
        let Some(raw) = self.kv.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(error = %e, "Corrupt history document, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Record an applied wallpaper at the front of the history.
    ///
    /// An existing entry with the same path is removed first, so the list
    /// never holds a path twice; the cap then drops the oldest entries.
    pub fn record(&self, path: &str, target: Target, slot_label: Option<&str>) -> StoreResult<()> {
        let mut entries = self.list()?;
        entries.retain(|e| e.path != path);
        entries.insert(
            0,
            HistoryEntry {
                path: path.to_string(),
                target,
                applied_at: Utc::now(),
                slot_label: slot_label.map(str::to_string),
            },
        );
        entries.truncate(HISTORY_CAP);

        let doc = serde_json::to_string(&entries)?;
        self.kv.with_batch(|b| b.put(HISTORY_KEY, &doc))?;

        debug!(path, target = %target, "History entry recorded");
        Ok(())
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.kv.with_batch(|b| b.remove(HISTORY_KEY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_prepends_entries() {
        let kv = KvStore::in_memory().unwrap();
        let history = HistoryStore::new(&kv);

        history
            .record("/pics/a.png", Target::Home, Some("morning"))
            .unwrap();
        history.record("/pics/b.png", Target::Both, None).unwrap();

        let entries = history.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "/pics/b.png");
        assert_eq!(entries[0].target, Target::Both);
        assert_eq!(entries[0].slot_label, None);
        assert_eq!(entries[1].path, "/pics/a.png");
        assert_eq!(entries[1].slot_label.as_deref(), Some("morning"));
    }

    #[test]
    fn duplicate_path_moves_to_front() {
        let kv = KvStore::in_memory().unwrap();
        let history = HistoryStore::new(&kv);

        history
            .record("/pics/a.png", Target::Home, Some("morning"))
            .unwrap();
        history
            .record("/pics/b.png", Target::Home, Some("morning"))
            .unwrap();
        history
            .record("/pics/a.png", Target::Lock, Some("evening"))
            .unwrap();

        let entries = history.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "/pics/a.png");
        assert_eq!(entries[0].target, Target::Lock);
        assert_eq!(entries[0].slot_label.as_deref(), Some("evening"));
    }

    #[test]
    fn history_is_capped() {
        let kv = KvStore::in_memory().unwrap();
        let history = HistoryStore::new(&kv);

        for i in 0..HISTORY_CAP + 5 {
            history
                .record(&format!("/pics/{i}.png"), Target::Home, None)
                .unwrap();
        }

        let entries = history.list().unwrap();
        assert_eq!(entries.len(), HISTORY_CAP);
        assert_eq!(entries[0].path, format!("/pics/{}.png", HISTORY_CAP + 4));
        // The oldest entries fell off the end.
        assert!(entries.iter().all(|e| e.path != "/pics/0.png"));
    }

    #[test]
    fn entries_without_a_label_still_deserialize() {
        let kv = KvStore::in_memory().unwrap();
        kv.with_batch(|b| {
            b.put(
                "history",
                r#"[{"path":"/pics/a.png","target":"home","applied_at":"2026-01-05T08:00:00Z"}]"#,
            )
        })
        .unwrap();

        let entries = HistoryStore::new(&kv).list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slot_label, None);
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let kv = KvStore::in_memory().unwrap();
        kv.with_batch(|b| b.put("history", "{not json")).unwrap();

        let history = HistoryStore::new(&kv);
        assert!(history.list().unwrap().is_empty());

        // And a subsequent record starts a fresh document.
        history.record("/pics/a.png", Target::Home, None).unwrap();
        assert_eq!(history.list().unwrap().len(), 1);
    }

    #[test]
    fn clear_empties_history() {
        let kv = KvStore::in_memory().unwrap();
        let history = HistoryStore::new(&kv);

        history.record("/pics/a.png", Target::Home, None).unwrap();
        history.clear().unwrap();
        assert!(history.list().unwrap().is_empty());
    }
}

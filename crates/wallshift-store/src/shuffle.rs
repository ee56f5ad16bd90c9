//! Shuffle folder configuration
//!
//! A slot may point at a folder instead of fixed wallpapers; the applier
//! then picks a random image from that folder on every change. Config is
//! keyed by `(day, slot label)` so renaming a slot must rekey its shuffle
//! entry (the schedule store handles that in the same transaction).

use tracing::info;

use crate::{KvStore, StoreResult};

pub(crate) fn shuffle_key(day: u8, label: &str) -> String {
    format!("shuffle_{day}_{label}")
}

/// Shuffle folder assignments, layered over the key-value store.
pub struct ShuffleStore<'a> {
    kv: &'a KvStore,
}

impl<'a> ShuffleStore<'a> {
    pub fn new(kv: &'a KvStore) -> Self {
        Self { kv }
    }

    /// Folder configured for a slot, if any.
    pub fn folder(&self, day: u8, label: &str) -> StoreResult<Option<String>> {
        self.kv.get(&shuffle_key(day, label))
    }

    /// Point a slot at a shuffle folder.
    pub fn set_folder(&self, day: u8, label: &str, folder: &str) -> StoreResult<()> {
        self.kv.with_batch(|b| b.put(&shuffle_key(day, label), folder))?;
        info!(day, label, folder, "Shuffle folder set");
        Ok(())
    }

    /// Remove a slot's shuffle configuration.
    pub fn clear_folder(&self, day: u8, label: &str) -> StoreResult<()> {
        self.kv.with_batch(|b| b.remove(&shuffle_key(day, label)))?;
        info!(day, label, "Shuffle folder cleared");
        Ok(())
    }

    /// Every shuffle assignment in the store, as `(day, label, folder)`.
    /// Keys that do not parse back to a day number are ignored.
    pub fn all_folders(&self) -> StoreResult<Vec<(u8, String, String)>> {
        let mut out = Vec::new();

        for key in self.kv.keys_with_prefix("shuffle_")? {
            let rest = &key["shuffle_".len()..];
            let Some((day, label)) = rest.split_once('_') else {
                continue;
            };
            let Ok(day) = day.parse::<u8>() else {
                continue;
            };
            if let Some(folder) = self.kv.get(&key)? {
                out.push((day, label.to_string(), folder));
            }
        }

        Ok(out)
    }
}

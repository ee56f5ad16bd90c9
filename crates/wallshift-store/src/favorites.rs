//! Favorite wallpapers
//!
//! A capped set of bookmarked wallpaper paths, stored as one JSON document.
//! Each favorite carries a stable id so callers can address entries even
//! when paths collide after renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{KvStore, StoreResult};

/// Maximum number of favorites kept.
pub const FAVORITES_CAP: usize = 50;

const FAVORITES_KEY: &str = "favorites_list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteWallpaper {
    pub id: Uuid,
    pub path: String,
    pub added_at: DateTime<Utc>,
    /// User-chosen display name; the file name is shown when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Favorites persistence, layered over the key-value store.
pub struct FavoritesStore<'a> {
    kv: &'a KvStore,
}

impl<'a> FavoritesStore<'a> {
    pub fn new(kv: &'a KvStore) -> Self {
        Self { kv }
    }

    /// All favorites, newest first. A corrupt document yields an empty
    /// list rather than an error.
    pub fn list(&self) -> StoreResult<Vec<FavoriteWallpaper>> {
        let Some(raw) = self.kv.get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<FavoriteWallpaper>>(&raw) {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
                Ok(entries)
            }
            Err(e) => {
                warn!(error = %e, "Corrupt favorites document, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Favorites whose file still exists on disk.
    pub fn list_existing(&self) -> StoreResult<Vec<FavoriteWallpaper>> {
        let mut entries = self.list()?;
        entries.retain(|f| Path::new(&f.path).exists());
        Ok(entries)
    }

    pub fn is_favorite(&self, path: &str) -> StoreResult<bool> {
        Ok(self.list()?.iter().any(|f| f.path == path))
    }

    /// Add a path to the favorites. When the cap is reached the oldest
    /// favorite is evicted. Adding a path that is already a favorite is a
    /// no-op. Returns the entry now covering the path.
    pub fn add(&self, path: &str) -> StoreResult<FavoriteWallpaper> {
        let mut entries = self.list()?;

        if let Some(existing) = entries.iter().find(|f| f.path == path) {
            return Ok(existing.clone());
        }

        let entry = FavoriteWallpaper {
            id: Uuid::new_v4(),
            path: path.to_string(),
            added_at: Utc::now(),
            name: None,
        };
        entries.insert(0, entry.clone());

        while entries.len() > FAVORITES_CAP {
            if let Some(evicted) = entries.pop() {
                debug!(path = %evicted.path, "Favorite evicted at cap");
            }
        }

        self.write(&entries)?;
        info!(path, "Favorite added");
        Ok(entry)
    }

    /// Remove a path from the favorites. Returns whether it was present.
    pub fn remove(&self, path: &str) -> StoreResult<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|f| f.path != path);

        if entries.len() == before {
            return Ok(false);
        }

        self.write(&entries)?;
        info!(path, "Favorite removed");
        Ok(true)
    }

    /// Flip a path's favorite status. Returns whether it is a favorite
    /// afterwards.
    pub fn toggle(&self, path: &str) -> StoreResult<bool> {
        if self.remove(path)? {
            Ok(false)
        } else {
            self.add(path)?;
            Ok(true)
        }
    }

    fn write(&self, entries: &[FavoriteWallpaper]) -> StoreResult<()> {
        let doc = serde_json::to_string(entries)?;
        self.kv.with_batch(|b| b.put(FAVORITES_KEY, &doc))
    }
}

//! Persistence layer for wallshift
//!
//! Provides:
//! - A SQLite-backed key-value store with typed accessors and per-field
//!   defaults (corrupt values never abort a load)
//! - Day schedules and time slots, including the legacy two-slot migration
//! - Shuffle folder configuration, keyed by (day, slot label)
//! - Wallpaper history (capped ring, deduplicated by path)
//! - Favorite wallpapers (capped, oldest evicted)
//!
//! Nothing here caches: every read reconstructs state from storage so all
//! callers observe current truth, and every write commits in one SQLite
//! transaction.

mod favorites;
mod history;
mod kv;
mod schedule;
mod shuffle;

pub use favorites::*;
pub use history::*;
pub use kv::*;
pub use schedule::*;
pub use shuffle::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Day of week out of range (1-7): {0}")]
    InvalidDay(u8),

    #[error("Invalid time {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },

    #[error("No slot labeled '{label}' on day {day}")]
    SlotNotFound { day: u8, label: String },

    #[error("Day {day} already has a slot at {hour:02}:{minute:02}")]
    DuplicateSlotTime { day: u8, hour: u8, minute: u8 },

    #[error("Day {day} already has a slot labeled '{label}'")]
    DuplicateSlotLabel { day: u8, label: String },

    #[error("Cannot remove the last slot of day {day}")]
    LastSlot { day: u8 },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

//! Scheduling engine for wallshift
//!
//! Pure scheduling logic plus the applier that ties the store and the
//! desktop backend together:
//! - Slot resolution: which slot is active at a given wall-clock time,
//!   with carry-over across midnight
//! - Shuffle: random image selection from a configured folder
//! - Apply: put the active slot's wallpapers on the desktop and record
//!   history
//! - Next change: when the next wallpaper change is due, scanning up to a
//!   week ahead
//! - Backup: JSON export/import of the schedule structure

mod apply;
mod backup;
mod next_change;
mod resolver;
mod shuffle;

pub use apply::*;
pub use backup::*;
pub use next_change::*;
pub use resolver::*;
pub use shuffle::*;

use thiserror::Error;

use wallshift_host::HostError;
use wallshift_store::StoreError;

/// Engine errors
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No images in shuffle folder {0}")]
    NoImagesInFolder(String),

    #[error("Import rejected: {0}")]
    Import(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

//! Desktop integration for wallshift
//!
//! The engine talks to the desktop through the [`WallpaperBackend`] trait.
//! [`CommandBackend`] shells out to a user-configured setter command;
//! [`MockBackend`] records applies for tests.

mod command;
mod image_check;
mod mock;

pub use command::*;
pub use image_check::*;
pub use mock::*;

use std::path::Path;
use thiserror::Error;

use wallshift_util::Target;

/// Host errors
#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot decode image {path}: {reason}")]
    BadImage { path: String, reason: String },

    #[error("Setter command exited with {status}: {command}")]
    CommandFailed { command: String, status: String },

    #[error("Apply rejected: {0}")]
    ApplyRejected(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// A way of putting an image on a desktop surface.
///
/// Implementations are synchronous; the daemon runs applies on a blocking
/// thread.
pub trait WallpaperBackend: Send + Sync {
    /// Apply the image at `path` to the given surface.
    ///
    /// `Both` means both surfaces in one call; backends that can only set
    /// one surface at a time perform two applies.
    fn apply(&self, target: Target, path: &Path) -> HostResult<()>;
}

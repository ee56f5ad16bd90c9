//! Default paths for wallshift components
//!
//! Paths are user-writable by default (no root required):
//! - Data: `$XDG_DATA_HOME/wallshift` or `~/.local/share/wallshift`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const WALLSHIFT_DATA_DIR_ENV: &str = "WALLSHIFT_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "wallshift";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$WALLSHIFT_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/wallshift` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/wallshift` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(WALLSHIFT_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking WALLSHIFT_DATA_DIR env var.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_contains_wallshift() {
        let path = data_dir_without_env();
        assert!(path.to_string_lossy().contains("wallshift"));
    }
}

//! Mock backend for tests

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wallshift_util::Target;

use crate::{HostError, HostResult, WallpaperBackend};

/// Backend that records applies instead of touching the desktop.
#[derive(Default)]
pub struct MockBackend {
    applied: Mutex<Vec<(Target, PathBuf)>>,
    fail_next: Mutex<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every apply recorded so far, in order.
    pub fn applied(&self) -> Vec<(Target, PathBuf)> {
        self.applied.lock().unwrap().clone()
    }

    /// Make the next apply fail.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

impl WallpaperBackend for MockBackend {
    fn apply(&self, target: Target, path: &Path) -> HostResult<()> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(HostError::ApplyRejected("mock failure".into()));
        }

        self.applied
            .lock()
            .unwrap()
            .push((target, path.to_path_buf()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_applies_in_order() {
        let mock = MockBackend::new();
        mock.apply(Target::Home, Path::new("/a.png")).unwrap();
        mock.apply(Target::Both, Path::new("/b.png")).unwrap();

        let applied = mock.applied();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], (Target::Home, PathBuf::from("/a.png")));
        assert_eq!(applied[1], (Target::Both, PathBuf::from("/b.png")));
    }

    #[test]
    fn fail_next_fails_once() {
        let mock = MockBackend::new();
        mock.fail_next();
        assert!(mock.apply(Target::Home, Path::new("/a.png")).is_err());
        assert!(mock.apply(Target::Home, Path::new("/a.png")).is_ok());
    }
}

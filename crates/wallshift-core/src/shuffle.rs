//! Random image selection for shuffle slots

use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use tracing::debug;

use wallshift_host::has_image_extension;

use crate::{CoreError, CoreResult};

/// Pick one image from `folder`, uniformly at random.
///
/// Only regular files with a recognized image extension are candidates;
/// subdirectories are not descended into.
pub fn pick_random_image(folder: &Path) -> CoreResult<PathBuf> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }

    let picked = images
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| CoreError::NoImagesInFolder(folder.display().to_string()))?;

    debug!(folder = %folder.display(), picked = %picked.display(), candidates = images.len(), "Shuffle pick");
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_only_image_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        for _ in 0..10 {
            let picked = pick_random_image(dir.path()).unwrap();
            assert_eq!(picked.file_name().unwrap(), "a.png");
        }
    }

    #[test]
    fn empty_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();

        assert!(matches!(
            pick_random_image(dir.path()).unwrap_err(),
            CoreError::NoImagesInFolder(_)
        ));
    }

    #[test]
    fn missing_folder_is_io_error() {
        assert!(matches!(
            pick_random_image(Path::new("/definitely/missing")).unwrap_err(),
            CoreError::Io(_)
        ));
    }
}

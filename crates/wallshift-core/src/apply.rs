//! Wallpaper application
//!
//! Ties the store and the desktop backend together. A scheduled apply
//! resolves the active slot, honors shuffle configuration, validates each
//! image before handing it to the backend, and records what landed in the
//! history. A wallpaper that fails to decode is skipped with a warning so
//! the other surface still updates.

use chrono::{DateTime, Datelike, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use wallshift_host::{HostError, WallpaperBackend, validate_image};
use wallshift_store::{HistoryStore, KvStore, ScheduleStore, ShuffleStore, TimeSlot};
use wallshift_util::{Target, minutes_of_day, weekday_number};

use crate::{CoreError, CoreResult, resolver::resolve_active_slot, shuffle::pick_random_image};

/// What an apply actually did.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Wallpapers that landed on the desktop, in apply order.
    pub applied: Vec<(Target, PathBuf)>,
    /// Wallpapers skipped because their file was missing or undecodable.
    pub skipped: Vec<(Target, String)>,
}

/// Applies slots and manual picks through a [`WallpaperBackend`].
pub struct Applier<'a> {
    kv: &'a KvStore,
    backend: &'a dyn WallpaperBackend,
}

impl<'a> Applier<'a> {
    pub fn new(kv: &'a KvStore, backend: &'a dyn WallpaperBackend) -> Self {
        Self { kv, backend }
    }

    /// Apply whatever should be on screen right now.
    ///
    /// Returns `Ok(None)` when nothing is due: the current day is disabled
    /// or has no slots.
    pub fn apply_current(&self, now: DateTime<Local>) -> CoreResult<Option<ApplyReport>> {
        let day = weekday_number(now.weekday());
        let schedule = ScheduleStore::new(self.kv).load_day(day)?;

        if !schedule.enabled {
            debug!(day, "Day disabled, nothing to apply");
            return Ok(None);
        }

        let Some(slot) = resolve_active_slot(&schedule, minutes_of_day(&now)) else {
            debug!(day, "No slots configured");
            return Ok(None);
        };

        info!(day, slot = %slot.label, "Applying active slot");
        self.apply_slot(day, slot).map(Some)
    }

    /// Apply one slot's wallpapers.
    ///
    /// A slot with a shuffle folder applies one random image to both
    /// surfaces and records a single history entry; otherwise the home and
    /// lock assignments are applied independently.
    pub fn apply_slot(&self, day: u8, slot: &TimeSlot) -> CoreResult<ApplyReport> {
        let shuffle = ShuffleStore::new(self.kv).folder(day, &slot.label)?;

        if let Some(folder) = shuffle {
            return self.apply_shuffled(Path::new(&folder), &slot.label);
        }

        let mut report = ApplyReport::default();
        for (target, path) in [
            (Target::Home, slot.home_wallpaper.as_deref()),
            (Target::Lock, slot.lock_wallpaper.as_deref()),
        ] {
            let Some(path) = path else {
                continue;
            };
            self.apply_one(target, Path::new(path), Some(&slot.label), &mut report)?;
        }

        Ok(report)
    }

    /// An empty or unreadable shuffle folder is a skip, not a failure: the
    /// current wallpaper stays and the cycle continues.
    fn apply_shuffled(&self, folder: &Path, label: &str) -> CoreResult<ApplyReport> {
        let mut report = ApplyReport::default();

        let picked = match pick_random_image(folder) {
            Ok(picked) => picked,
            Err(e @ (CoreError::NoImagesInFolder(_) | CoreError::Io(_))) => {
                warn!(folder = %folder.display(), error = %e, "Skipping shuffle slot");
                report.skipped.push((Target::Both, e.to_string()));
                return Ok(report);
            }
            Err(e) => return Err(e),
        };

        self.apply_one(Target::Both, &picked, Some(label), &mut report)?;
        Ok(report)
    }

    /// Validate, apply, and record one wallpaper. Decode failures are
    /// downgraded to a skip; backend failures propagate so the caller can
    /// retry.
    fn apply_one(
        &self,
        target: Target,
        path: &Path,
        slot_label: Option<&str>,
        report: &mut ApplyReport,
    ) -> CoreResult<()> {
        match validate_image(path) {
            Ok(_) => {}
            Err(e @ (HostError::BadImage { .. } | HostError::Io(_))) => {
                warn!(target = %target, path = %path.display(), error = %e, "Skipping wallpaper");
                report.skipped.push((target, e.to_string()));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        self.backend.apply(target, path)?;

        let path_str = path.display().to_string();
        HistoryStore::new(self.kv).record(&path_str, target, slot_label)?;
        ScheduleStore::new(self.kv).set_last_applied(target, &path_str)?;
        report.applied.push((target, path.to_path_buf()));

        info!(target = %target, path = %path_str, "Wallpaper applied");
        Ok(())
    }

    /// Apply a user-picked wallpaper immediately. Unlike scheduled applies,
    /// a bad image is an error here so the user sees why nothing changed.
    pub fn apply_manual(&self, path: &Path, target: Target) -> CoreResult<()> {
        validate_image(path)?;
        self.backend.apply(target, path)?;

        let path_str = path.display().to_string();
        HistoryStore::new(self.kv).record(&path_str, target, None)?;
        ScheduleStore::new(self.kv).set_last_applied(target, &path_str)?;

        info!(target = %target, path = %path_str, "Wallpaper applied manually");
        Ok(())
    }
}

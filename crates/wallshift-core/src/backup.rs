//! Schedule export and import
//!
//! Backups carry the schedule *structure*: the scheduler flag plus every
//! day's enabled state, slot labels, and slot times. Wallpaper assignments
//! are machine-local paths and stay out of the file; an import keeps
//! whatever wallpapers are already assigned at the same slot positions.
//!
//! Imports validate the whole document before writing anything, so a bad
//! file never leaves the schedule half-replaced. Days absent from the
//! document are left untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use wallshift_store::{DaySchedule, KvStore, ScheduleStore};

use crate::{CoreError, CoreResult};

/// On-disk backup document.
#[derive(Debug, Serialize, Deserialize)]
pub struct Backup {
    /// Scheduler flag. Absent in a document means "leave unchanged".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub schedules: Vec<DaySchedule>,
}

/// Serialize the current schedule structure to pretty-printed JSON.
pub fn export_backup(kv: &KvStore) -> CoreResult<String> {
    let store = ScheduleStore::new(kv);

    let mut schedules = store.load_all()?;
    for day in &mut schedules {
        for slot in &mut day.slots {
            slot.home_wallpaper = None;
            slot.lock_wallpaper = None;
        }
    }

    let backup = Backup {
        enabled: Some(store.scheduler_enabled()?),
        schedules,
    };

    Ok(serde_json::to_string_pretty(&backup)?)
}

/// Replace the schedule structure from a backup document.
///
/// Returns the number of days imported.
pub fn import_backup(kv: &KvStore, json: &str) -> CoreResult<usize> {
    let backup: Backup =
        serde_json::from_str(json).map_err(|e| CoreError::Import(e.to_string()))?;

    validate_backup(&backup)?;

    let store = ScheduleStore::new(kv);
    if let Some(enabled) = backup.enabled {
        store.set_scheduler_enabled(enabled)?;
    }
    for day in &backup.schedules {
        store.import_day(day)?;
    }

    info!(days = backup.schedules.len(), "Backup imported");
    Ok(backup.schedules.len())
}

fn validate_backup(backup: &Backup) -> CoreResult<()> {
    let bad = |msg: String| Err(CoreError::Import(msg));

    let mut seen_days = HashSet::new();
    for day in &backup.schedules {
        if !(1..=7).contains(&day.day) {
            return bad(format!("day {} out of range", day.day));
        }
        if !seen_days.insert(day.day) {
            return bad(format!("day {} appears twice", day.day));
        }
        if day.slots.is_empty() {
            return bad(format!("day {} has no slots", day.day));
        }

        let mut labels = HashSet::new();
        let mut times = HashSet::new();
        for slot in &day.slots {
            if slot.hour > 23 || slot.minute > 59 {
                return bad(format!(
                    "day {} slot '{}' has invalid time {:02}:{:02}",
                    day.day, slot.label, slot.hour, slot.minute
                ));
            }
            if !labels.insert(slot.label.as_str()) {
                return bad(format!("day {} repeats label '{}'", day.day, slot.label));
            }
            if !times.insert((slot.hour, slot.minute)) {
                return bad(format!(
                    "day {} has two slots at {:02}:{:02}",
                    day.day, slot.hour, slot.minute
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallshift_store::TimeSlot;
    use wallshift_util::Target;

    fn slot(label: &str, hour: u8, minute: u8) -> TimeSlot {
        TimeSlot {
            label: label.into(),
            hour,
            minute,
            home_wallpaper: None,
            lock_wallpaper: None,
        }
    }

    #[test]
    fn export_then_import_round_trips_structure() {
        let kv = KvStore::in_memory().unwrap();
        let store = ScheduleStore::new(&kv);
        store.set_scheduler_enabled(true).unwrap();
        store.add_slot(1, 12, 30).unwrap();
        store.set_day_enabled(6, false).unwrap();

        // Wallpaper paths never leave the machine.
        store
            .set_slot_wallpaper(1, "morning", Target::Home, Some("/pics/secret.png"))
            .unwrap();
        let json = export_backup(&kv).unwrap();
        assert!(!json.contains("secret.png"));

        let other = KvStore::in_memory().unwrap();
        assert_eq!(import_backup(&other, &json).unwrap(), 7);

        let imported = ScheduleStore::new(&other);
        assert!(imported.scheduler_enabled().unwrap());
        assert!(imported.load_day(1).unwrap().slot("slot_12_30").is_some());
        assert!(!imported.load_day(6).unwrap().enabled);
    }

    #[test]
    fn import_preserves_local_wallpapers() {
        let kv = KvStore::in_memory().unwrap();
        let store = ScheduleStore::new(&kv);
        store
            .set_slot_wallpaper(3, "morning", Target::Home, Some("/pics/local.png"))
            .unwrap();

        let json = export_backup(&kv).unwrap();
        import_backup(&kv, &json).unwrap();

        let day = store.load_day(3).unwrap();
        assert_eq!(
            day.slot("morning").unwrap().home_wallpaper.as_deref(),
            Some("/pics/local.png")
        );
    }

    #[test]
    fn missing_enabled_flag_leaves_scheduler_alone() {
        let kv = KvStore::in_memory().unwrap();
        let store = ScheduleStore::new(&kv);
        store.set_scheduler_enabled(true).unwrap();

        let json = serde_json::json!({
            "schedules": [
                { "day": 2, "enabled": true, "slots": [
                    { "label": "morning", "hour": 9, "minute": 15 }
                ]}
            ]
        })
        .to_string();

        assert_eq!(import_backup(&kv, &json).unwrap(), 1);
        assert!(store.scheduler_enabled().unwrap());

        let day = store.load_day(2).unwrap();
        assert_eq!(day.slots.len(), 1);
        assert_eq!((day.slots[0].hour, day.slots[0].minute), (9, 15));
        // Day 3 was absent from the document and keeps its defaults.
        assert_eq!(store.load_day(3).unwrap().slots.len(), 2);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let kv = KvStore::in_memory().unwrap();
        assert!(matches!(
            import_backup(&kv, "{oops").unwrap_err(),
            CoreError::Import(_)
        ));
    }

    #[test]
    fn missing_schedules_field_is_rejected() {
        let kv = KvStore::in_memory().unwrap();
        assert!(matches!(
            import_backup(&kv, r#"{"enabled": true}"#).unwrap_err(),
            CoreError::Import(_)
        ));
    }

    #[test]
    fn out_of_range_time_is_rejected_without_writes() {
        let kv = KvStore::in_memory().unwrap();
        let store = ScheduleStore::new(&kv);
        store.set_scheduler_enabled(true).unwrap();

        let backup = Backup {
            enabled: Some(false),
            schedules: vec![DaySchedule {
                day: 1,
                enabled: true,
                slots: vec![slot("morning", 25, 0)],
            }],
        };
        let json = serde_json::to_string(&backup).unwrap();

        assert!(matches!(
            import_backup(&kv, &json).unwrap_err(),
            CoreError::Import(_)
        ));
        // The invalid import must not have touched the flag.
        assert!(store.scheduler_enabled().unwrap());
    }

    #[test]
    fn duplicate_days_are_rejected() {
        let kv = KvStore::in_memory().unwrap();
        let day = DaySchedule {
            day: 2,
            enabled: true,
            slots: vec![slot("morning", 8, 0)],
        };
        let backup = Backup {
            enabled: Some(false),
            schedules: vec![day.clone(), day],
        };
        let json = serde_json::to_string(&backup).unwrap();

        assert!(matches!(
            import_backup(&kv, &json).unwrap_err(),
            CoreError::Import(_)
        ));
    }
}

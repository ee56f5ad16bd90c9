//! Day schedules and time slots
//!
//! Each weekday (1 = Monday .. 7 = Sunday) carries an ordered list of time
//! slots. Every slot has a label, a start time, and optional wallpapers for
//! the home and lock surfaces. Slots are persisted under index-based keys
//! (`day_{d}_slot_{i}_*`) plus a `day_{d}_slot_count`; days written by older
//! releases only carry the fixed morning/evening keys, and those are
//! synthesized into slots on read.
//!
//! All mutations read the current day, apply the change in memory, and
//! rewrite the day inside one transaction, so a crash can never leave a day
//! with a slot count that disagrees with its slot keys.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wallshift_util::Target;

use crate::shuffle::shuffle_key;
use crate::{KvBatch, KvStore, StoreError, StoreResult};

/// One scheduled wallpaper change within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub label: String,
    pub hour: u8,
    pub minute: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_wallpaper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_wallpaper: Option<String>,
}

impl TimeSlot {
    /// Start time as minutes since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

/// All slots for one weekday, kept sorted by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: u8,
    pub enabled: bool,
    pub slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn slot(&self, label: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.label == label)
    }

    fn sort_slots(&mut self) {
        self.slots.sort_by_key(|s| s.minutes_of_day());
    }
}

const SCHEDULER_ENABLED_KEY: &str = "scheduler_enabled";
const LAST_HOME_KEY: &str = "last_home_wallpaper";
const LAST_LOCK_KEY: &str = "last_lock_wallpaper";

fn slot_key(day: u8, index: usize, field: &str) -> String {
    format!("day_{day}_slot_{index}_{field}")
}

fn validate_day(day: u8) -> StoreResult<()> {
    if (1..=7).contains(&day) {
        Ok(())
    } else {
        Err(StoreError::InvalidDay(day))
    }
}

fn validate_time(hour: u8, minute: u8) -> StoreResult<()> {
    if hour <= 23 && minute <= 59 {
        Ok(())
    } else {
        Err(StoreError::InvalidTime { hour, minute })
    }
}

/// Schedule persistence, layered over the key-value store.
pub struct ScheduleStore<'a> {
    kv: &'a KvStore,
}

impl<'a> ScheduleStore<'a> {
    pub fn new(kv: &'a KvStore) -> Self {
        Self { kv }
    }

    /// Whether automatic scheduling is on. Defaults to off until the user
    /// enables it.
    pub fn scheduler_enabled(&self) -> StoreResult<bool> {
        self.kv.get_bool(SCHEDULER_ENABLED_KEY, false)
    }

    pub fn set_scheduler_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.kv
            .with_batch(|b| b.put_bool(SCHEDULER_ENABLED_KEY, enabled))?;
        info!(enabled, "Scheduler toggled");
        Ok(())
    }

    /// Load one day's schedule. Days that predate multi-slot support are
    /// read through their legacy morning/evening keys.
    pub fn load_day(&self, day: u8) -> StoreResult<DaySchedule> {
        validate_day(day)?;

        let enabled = self.kv.get_bool(&format!("day_{day}_enabled"), true)?;
        let count = self.kv.get_int(&format!("day_{day}_slot_count"), 0)?;

        if count <= 0 {
            return self.load_legacy_day(day, enabled);
        }

        let mut slots = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            // The first two indices default to the classic morning/evening
            // pair, so a day with a count but missing fields still loads.
            let (fallback_label, fallback_hour) = match i {
                0 => ("morning".to_string(), 8),
                1 => ("evening".to_string(), 20),
                _ => (format!("slot_{i}"), 0),
            };
            let label = self
                .kv
                .get_string(&slot_key(day, i, "label"), &fallback_label)?;
            let hour = self
                .kv
                .get_int(&slot_key(day, i, "hour"), fallback_hour)?
                .clamp(0, 23) as u8;
            let minute = self.kv.get_int(&slot_key(day, i, "minute"), 0)?.clamp(0, 59) as u8;
            let home_wallpaper = self.kv.get(&slot_key(day, i, "home"))?;
            let lock_wallpaper = self.kv.get(&slot_key(day, i, "lock"))?;
            slots.push(TimeSlot {
                label,
                hour,
                minute,
                home_wallpaper,
                lock_wallpaper,
            });
        }

        let mut schedule = DaySchedule {
            day,
            enabled,
            slots,
        };
        schedule.sort_slots();
        Ok(schedule)
    }

    /// Synthesize slots from the fixed-slot key layout used before
    /// `slot_count` existed. The old format only ever assigned the home
    /// surface; the lock surface starts unassigned.
    fn load_legacy_day(&self, day: u8, enabled: bool) -> StoreResult<DaySchedule> {
        debug!(day, "No slot count, reading legacy morning/evening keys");

        let mut slots = Vec::with_capacity(2);
        for (label, default_hour) in [("morning", 8), ("evening", 20)] {
            let hour = self
                .kv
                .get_int(&format!("day_{day}_{label}_hour"), default_hour)?
                .clamp(0, 23) as u8;
            let minute = self
                .kv
                .get_int(&format!("day_{day}_{label}_minute"), 0)?
                .clamp(0, 59) as u8;
            let wallpaper = self.kv.get(&format!("day_{day}_{label}"))?;
            slots.push(TimeSlot {
                label: label.to_string(),
                hour,
                minute,
                home_wallpaper: wallpaper,
                lock_wallpaper: None,
            });
        }

        let mut schedule = DaySchedule {
            day,
            enabled,
            slots,
        };
        schedule.sort_slots();
        Ok(schedule)
    }

    /// Load all seven days, Monday first.
    pub fn load_all(&self) -> StoreResult<Vec<DaySchedule>> {
        (1..=7).map(|day| self.load_day(day)).collect()
    }

    /// Persist one day in a single transaction. Slots are sorted before
    /// writing and the first two are mirrored into the legacy keys so older
    /// readers keep working.
    pub fn save_day(&self, schedule: &DaySchedule) -> StoreResult<()> {
        validate_day(schedule.day)?;
        for slot in &schedule.slots {
            validate_time(slot.hour, slot.minute)?;
        }

        let mut schedule = schedule.clone();
        schedule.sort_slots();

        let old_count = self
            .kv
            .get_int(&format!("day_{}_slot_count", schedule.day), 0)?
            .max(0) as usize;

        self.kv.with_batch(|b| {
            write_day(b, &schedule, old_count)?;
            mirror_legacy(b, &schedule)
        })?;

        debug!(day = schedule.day, slots = schedule.slots.len(), "Day saved");
        Ok(())
    }

    pub fn set_day_enabled(&self, day: u8, enabled: bool) -> StoreResult<()> {
        validate_day(day)?;
        self.kv
            .with_batch(|b| b.put_bool(&format!("day_{day}_enabled"), enabled))?;
        info!(day, enabled, "Day toggled");
        Ok(())
    }

    /// Add a slot at the given time. The label is derived from the time
    /// (`slot_08_30`) and two slots on one day may not share a start time.
    /// Returns the new slot's label.
    pub fn add_slot(&self, day: u8, hour: u8, minute: u8) -> StoreResult<String> {
        validate_time(hour, minute)?;
        let mut schedule = self.load_day(day)?;

        if schedule
            .slots
            .iter()
            .any(|s| s.hour == hour && s.minute == minute)
        {
            return Err(StoreError::DuplicateSlotTime { day, hour, minute });
        }

        let label = format!("slot_{hour:02}_{minute:02}");
        if schedule.slot(&label).is_some() {
            return Err(StoreError::DuplicateSlotLabel { day, label });
        }

        schedule.slots.push(TimeSlot {
            label: label.clone(),
            hour,
            minute,
            home_wallpaper: None,
            lock_wallpaper: None,
        });
        self.save_day(&schedule)?;

        info!(day, label = %label, "Slot added");
        Ok(label)
    }

    /// Remove a slot. The last remaining slot of a day cannot be removed,
    /// and the slot's shuffle configuration is dropped in the same
    /// transaction.
    pub fn remove_slot(&self, day: u8, label: &str) -> StoreResult<()> {
        let mut schedule = self.load_day(day)?;

        let index = schedule
            .slots
            .iter()
            .position(|s| s.label == label)
            .ok_or_else(|| StoreError::SlotNotFound {
                day,
                label: label.to_string(),
            })?;

        if schedule.slots.len() == 1 {
            return Err(StoreError::LastSlot { day });
        }

        let old_count = schedule.slots.len();
        schedule.slots.remove(index);

        self.kv.with_batch(|b| {
            write_day(b, &schedule, old_count)?;
            mirror_legacy(b, &schedule)?;
            b.remove(&shuffle_key(day, label))
        })?;

        info!(day, label, "Slot removed");
        Ok(())
    }

    /// Rename a slot, carrying its shuffle configuration over to the new
    /// label.
    pub fn rename_slot(&self, day: u8, old_label: &str, new_label: &str) -> StoreResult<()> {
        let mut schedule = self.load_day(day)?;

        if schedule.slot(new_label).is_some() {
            return Err(StoreError::DuplicateSlotLabel {
                day,
                label: new_label.to_string(),
            });
        }

        let slot = schedule
            .slots
            .iter_mut()
            .find(|s| s.label == old_label)
            .ok_or_else(|| StoreError::SlotNotFound {
                day,
                label: old_label.to_string(),
            })?;
        slot.label = new_label.to_string();

        let shuffle_folder = self.kv.get(&shuffle_key(day, old_label))?;
        let old_count = schedule.slots.len();

        self.kv.with_batch(|b| {
            write_day(b, &schedule, old_count)?;
            mirror_legacy(b, &schedule)?;
            b.remove(&shuffle_key(day, old_label))?;
            b.put_opt(&shuffle_key(day, new_label), shuffle_folder.as_deref())
        })?;

        info!(day, old_label, new_label, "Slot renamed");
        Ok(())
    }

    /// Move a slot to a new start time.
    pub fn set_slot_time(&self, day: u8, label: &str, hour: u8, minute: u8) -> StoreResult<()> {
        validate_time(hour, minute)?;
        let mut schedule = self.load_day(day)?;

        if schedule
            .slots
            .iter()
            .any(|s| s.label != label && s.hour == hour && s.minute == minute)
        {
            return Err(StoreError::DuplicateSlotTime { day, hour, minute });
        }

        let slot = schedule
            .slots
            .iter_mut()
            .find(|s| s.label == label)
            .ok_or_else(|| StoreError::SlotNotFound {
                day,
                label: label.to_string(),
            })?;
        slot.hour = hour;
        slot.minute = minute;

        self.save_day(&schedule)?;
        info!(day, label, hour, minute, "Slot time changed");
        Ok(())
    }

    /// Assign (or with `None`, clear) a slot's wallpaper for one or both
    /// surfaces.
    pub fn set_slot_wallpaper(
        &self,
        day: u8,
        label: &str,
        target: Target,
        path: Option<&str>,
    ) -> StoreResult<()> {
        let mut schedule = self.load_day(day)?;

        let slot = schedule
            .slots
            .iter_mut()
            .find(|s| s.label == label)
            .ok_or_else(|| StoreError::SlotNotFound {
                day,
                label: label.to_string(),
            })?;

        let path = path.map(str::to_string);
        match target {
            Target::Home => slot.home_wallpaper = path,
            Target::Lock => slot.lock_wallpaper = path,
            Target::Both => {
                slot.home_wallpaper = path.clone();
                slot.lock_wallpaper = path;
            }
        }

        self.save_day(&schedule)?;
        info!(day, label, target = %target, "Slot wallpaper changed");
        Ok(())
    }

    /// Import one day's structure (labels and times) without touching the
    /// wallpaper assignments already stored at the same slot indices.
    pub fn import_day(&self, schedule: &DaySchedule) -> StoreResult<()> {
        validate_day(schedule.day)?;
        for slot in &schedule.slots {
            validate_time(slot.hour, slot.minute)?;
        }

        let mut schedule = schedule.clone();
        schedule.sort_slots();
        let day = schedule.day;

        self.kv.with_batch(|b| {
            b.put_bool(&format!("day_{day}_enabled"), schedule.enabled)?;
            b.put_int(&format!("day_{day}_slot_count"), schedule.slots.len() as i64)?;
            for (i, slot) in schedule.slots.iter().enumerate() {
                b.put(&slot_key(day, i, "label"), &slot.label)?;
                b.put_int(&slot_key(day, i, "hour"), slot.hour as i64)?;
                b.put_int(&slot_key(day, i, "minute"), slot.minute as i64)?;
            }
            Ok(())
        })?;

        debug!(day, slots = schedule.slots.len(), "Day imported");
        Ok(())
    }

    /// Record the wallpaper most recently applied to a surface.
    pub fn set_last_applied(&self, target: Target, path: &str) -> StoreResult<()> {
        self.kv.with_batch(|b| {
            match target {
                Target::Home => b.put(LAST_HOME_KEY, path)?,
                Target::Lock => b.put(LAST_LOCK_KEY, path)?,
                Target::Both => {
                    b.put(LAST_HOME_KEY, path)?;
                    b.put(LAST_LOCK_KEY, path)?;
                }
            }
            Ok(())
        })
    }

    pub fn last_home(&self) -> StoreResult<Option<String>> {
        self.kv.get(LAST_HOME_KEY)
    }

    pub fn last_lock(&self) -> StoreResult<Option<String>> {
        self.kv.get(LAST_LOCK_KEY)
    }
}

fn write_day(b: &mut KvBatch<'_>, schedule: &DaySchedule, old_count: usize) -> StoreResult<()> {
    let day = schedule.day;

    b.put_bool(&format!("day_{day}_enabled"), schedule.enabled)?;
    b.put_int(&format!("day_{day}_slot_count"), schedule.slots.len() as i64)?;

    for (i, slot) in schedule.slots.iter().enumerate() {
        b.put(&slot_key(day, i, "label"), &slot.label)?;
        b.put_int(&slot_key(day, i, "hour"), slot.hour as i64)?;
        b.put_int(&slot_key(day, i, "minute"), slot.minute as i64)?;
        b.put_opt(&slot_key(day, i, "home"), slot.home_wallpaper.as_deref())?;
        b.put_opt(&slot_key(day, i, "lock"), slot.lock_wallpaper.as_deref())?;
    }

    // Indices beyond the new count are stale from a longer previous layout.
    for i in schedule.slots.len()..old_count {
        for field in ["label", "hour", "minute", "home", "lock"] {
            b.remove(&slot_key(day, i, field))?;
        }
    }

    Ok(())
}

/// Mirror the slots labeled "morning" and "evening" into the
/// pre-multi-slot key layout. Slots under other labels have no legacy
/// counterpart and leave those keys alone (cleared when the label is gone).
fn mirror_legacy(b: &mut KvBatch<'_>, schedule: &DaySchedule) -> StoreResult<()> {
    let day = schedule.day;

    for label in ["morning", "evening"] {
        match schedule.slot(label) {
            Some(slot) => {
                b.put_int(&format!("day_{day}_{label}_hour"), slot.hour as i64)?;
                b.put_int(&format!("day_{day}_{label}_minute"), slot.minute as i64)?;
                b.put_opt(&format!("day_{day}_{label}"), slot.home_wallpaper.as_deref())?;
            }
            None => {
                b.remove(&format!("day_{day}_{label}_hour"))?;
                b.remove(&format!("day_{day}_{label}_minute"))?;
                b.remove(&format!("day_{day}_{label}"))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(kv: &KvStore) -> ScheduleStore<'_> {
        ScheduleStore::new(kv)
    }

    #[test]
    fn fresh_day_synthesizes_default_slots() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let day = store.load_day(3).unwrap();
        assert!(day.enabled);
        assert_eq!(day.slots.len(), 2);
        assert_eq!(day.slots[0].label, "morning");
        assert_eq!((day.slots[0].hour, day.slots[0].minute), (8, 0));
        assert_eq!(day.slots[1].label, "evening");
        assert_eq!((day.slots[1].hour, day.slots[1].minute), (20, 0));
    }

    #[test]
    fn legacy_keys_are_read_when_slot_count_is_absent() {
        let kv = KvStore::in_memory().unwrap();
        kv.with_batch(|b| {
            b.put("day_2_morning", "/pics/sunrise.png")?;
            b.put_int("day_2_morning_hour", 7)?;
            b.put_int("day_2_morning_minute", 30)?;
            b.put("day_2_evening", "/pics/sunset.png")
        })
        .unwrap();

        let store = store_with(&kv);
        let day = store.load_day(2).unwrap();

        assert_eq!(day.slots.len(), 2);
        let morning = day.slot("morning").unwrap();
        assert_eq!((morning.hour, morning.minute), (7, 30));
        // The legacy format only knew the home surface.
        assert_eq!(morning.home_wallpaper.as_deref(), Some("/pics/sunrise.png"));
        assert_eq!(morning.lock_wallpaper, None);
        let evening = day.slot("evening").unwrap();
        assert_eq!((evening.hour, evening.minute), (20, 0));
    }

    #[test]
    fn save_then_load_round_trips_and_sorts() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let day = DaySchedule {
            day: 1,
            enabled: true,
            slots: vec![
                TimeSlot {
                    label: "night".into(),
                    hour: 22,
                    minute: 15,
                    home_wallpaper: Some("/pics/stars.png".into()),
                    lock_wallpaper: None,
                },
                TimeSlot {
                    label: "noon".into(),
                    hour: 12,
                    minute: 0,
                    home_wallpaper: None,
                    lock_wallpaper: Some("/pics/sun.png".into()),
                },
            ],
        };
        store.save_day(&day).unwrap();

        let loaded = store.load_day(1).unwrap();
        assert_eq!(loaded.slots[0].label, "noon");
        assert_eq!(loaded.slots[1].label, "night");
        assert_eq!(
            loaded.slots[1].home_wallpaper.as_deref(),
            Some("/pics/stars.png")
        );
    }

    #[test]
    fn save_mirrors_first_slots_into_legacy_keys() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let mut day = store.load_day(4).unwrap();
        day.slots[0].home_wallpaper = Some("/pics/a.png".into());
        store.save_day(&day).unwrap();

        assert_eq!(kv.get_int("day_4_morning_hour", -1).unwrap(), 8);
        assert_eq!(kv.get("day_4_morning").unwrap().as_deref(), Some("/pics/a.png"));
        assert_eq!(kv.get_int("day_4_evening_hour", -1).unwrap(), 20);
    }

    #[test]
    fn legacy_mirror_selects_slots_by_label_not_position() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        // A day whose slots carry custom labels must not bleed into the
        // morning/evening legacy keys.
        let day = DaySchedule {
            day: 2,
            enabled: true,
            slots: vec![
                TimeSlot {
                    label: "noon".into(),
                    hour: 12,
                    minute: 0,
                    home_wallpaper: Some("/pics/sun.png".into()),
                    lock_wallpaper: None,
                },
                TimeSlot {
                    label: "night".into(),
                    hour: 23,
                    minute: 0,
                    home_wallpaper: None,
                    lock_wallpaper: None,
                },
            ],
        };
        store.save_day(&day).unwrap();

        assert_eq!(kv.get("day_2_morning_hour").unwrap(), None);
        assert_eq!(kv.get("day_2_evening_hour").unwrap(), None);
        assert_eq!(kv.get("day_2_morning").unwrap(), None);

        // Renaming a slot to "morning" makes it the mirrored one.
        store.rename_slot(2, "noon", "morning").unwrap();
        assert_eq!(kv.get_int("day_2_morning_hour", -1).unwrap(), 12);
        assert_eq!(kv.get("day_2_morning").unwrap().as_deref(), Some("/pics/sun.png"));
        assert_eq!(kv.get("day_2_evening_hour").unwrap(), None);
    }

    #[test]
    fn add_slot_derives_label_and_rejects_duplicate_time() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let label = store.add_slot(1, 12, 30).unwrap();
        assert_eq!(label, "slot_12_30");

        let err = store.add_slot(1, 12, 30).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateSlotTime {
                day: 1,
                hour: 12,
                minute: 30
            }
        ));

        let day = store.load_day(1).unwrap();
        assert_eq!(day.slots.len(), 3);
        assert_eq!(day.slots[1].label, "slot_12_30");
    }

    #[test]
    fn remove_slot_refuses_last_and_clears_shuffle() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);
        let shuffle = crate::ShuffleStore::new(&kv);

        // Materialize the default two slots first.
        let day = store.load_day(5).unwrap();
        store.save_day(&day).unwrap();
        shuffle.set_folder(5, "evening", "/pics/folder").unwrap();

        store.remove_slot(5, "evening").unwrap();
        assert_eq!(store.load_day(5).unwrap().slots.len(), 1);
        assert_eq!(shuffle.folder(5, "evening").unwrap(), None);

        let err = store.remove_slot(5, "morning").unwrap_err();
        assert!(matches!(err, StoreError::LastSlot { day: 5 }));
    }

    #[test]
    fn remove_slot_unknown_label() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let err = store.remove_slot(1, "nope").unwrap_err();
        assert!(matches!(err, StoreError::SlotNotFound { day: 1, .. }));
    }

    #[test]
    fn rename_slot_moves_shuffle_config() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);
        let shuffle = crate::ShuffleStore::new(&kv);

        let day = store.load_day(6).unwrap();
        store.save_day(&day).unwrap();
        shuffle.set_folder(6, "morning", "/pics/dawn").unwrap();

        store.rename_slot(6, "morning", "sunrise").unwrap();

        assert!(store.load_day(6).unwrap().slot("sunrise").is_some());
        assert_eq!(shuffle.folder(6, "morning").unwrap(), None);
        assert_eq!(
            shuffle.folder(6, "sunrise").unwrap().as_deref(),
            Some("/pics/dawn")
        );
    }

    #[test]
    fn rename_slot_rejects_existing_label() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let err = store.rename_slot(1, "morning", "evening").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlotLabel { day: 1, .. }));
    }

    #[test]
    fn set_slot_time_resorts_and_rejects_collision() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        store.set_slot_time(1, "morning", 21, 0).unwrap();
        let day = store.load_day(1).unwrap();
        assert_eq!(day.slots[0].label, "evening");
        assert_eq!(day.slots[1].label, "morning");

        let err = store.set_slot_time(1, "morning", 20, 0).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlotTime { .. }));
    }

    #[test]
    fn set_slot_wallpaper_per_target() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        store
            .set_slot_wallpaper(1, "morning", Target::Both, Some("/pics/b.png"))
            .unwrap();
        let slot = store.load_day(1).unwrap();
        let morning = slot.slot("morning").unwrap().clone();
        assert_eq!(morning.home_wallpaper.as_deref(), Some("/pics/b.png"));
        assert_eq!(morning.lock_wallpaper.as_deref(), Some("/pics/b.png"));

        store
            .set_slot_wallpaper(1, "morning", Target::Lock, None)
            .unwrap();
        let morning = store.load_day(1).unwrap().slot("morning").unwrap().clone();
        assert_eq!(morning.home_wallpaper.as_deref(), Some("/pics/b.png"));
        assert_eq!(morning.lock_wallpaper, None);
    }

    #[test]
    fn import_day_preserves_existing_wallpapers() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        let mut day = store.load_day(1).unwrap();
        day.slots[0].home_wallpaper = Some("/pics/keep.png".into());
        store.save_day(&day).unwrap();

        let imported = DaySchedule {
            day: 1,
            enabled: false,
            slots: vec![
                TimeSlot {
                    label: "early".into(),
                    hour: 6,
                    minute: 45,
                    home_wallpaper: Some("/elsewhere/ignored.png".into()),
                    lock_wallpaper: None,
                },
                TimeSlot {
                    label: "late".into(),
                    hour: 21,
                    minute: 0,
                    home_wallpaper: None,
                    lock_wallpaper: None,
                },
            ],
        };
        store.import_day(&imported).unwrap();

        let loaded = store.load_day(1).unwrap();
        assert!(!loaded.enabled);
        assert_eq!(loaded.slots[0].label, "early");
        assert_eq!((loaded.slots[0].hour, loaded.slots[0].minute), (6, 45));
        // Wallpaper assignments at the same indices survive an import.
        assert_eq!(
            loaded.slots[0].home_wallpaper.as_deref(),
            Some("/pics/keep.png")
        );
    }

    #[test]
    fn invalid_day_and_time_are_rejected() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        assert!(matches!(
            store.load_day(0).unwrap_err(),
            StoreError::InvalidDay(0)
        ));
        assert!(matches!(
            store.load_day(8).unwrap_err(),
            StoreError::InvalidDay(8)
        ));
        assert!(matches!(
            store.add_slot(1, 24, 0).unwrap_err(),
            StoreError::InvalidTime { hour: 24, .. }
        ));
    }

    #[test]
    fn scheduler_flag_defaults_off() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        assert!(!store.scheduler_enabled().unwrap());
        store.set_scheduler_enabled(true).unwrap();
        assert!(store.scheduler_enabled().unwrap());
    }

    #[test]
    fn last_applied_tracks_both_surfaces() {
        let kv = KvStore::in_memory().unwrap();
        let store = store_with(&kv);

        store.set_last_applied(Target::Both, "/pics/x.png").unwrap();
        assert_eq!(store.last_home().unwrap().as_deref(), Some("/pics/x.png"));
        assert_eq!(store.last_lock().unwrap().as_deref(), Some("/pics/x.png"));

        store.set_last_applied(Target::Home, "/pics/y.png").unwrap();
        assert_eq!(store.last_home().unwrap().as_deref(), Some("/pics/y.png"));
        assert_eq!(store.last_lock().unwrap().as_deref(), Some("/pics/x.png"));
    }
}

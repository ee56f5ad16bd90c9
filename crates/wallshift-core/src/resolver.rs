//! Active slot resolution
//!
//! The active slot at time T is the latest slot whose start time is at or
//! before T. Before the day's first slot, yesterday's final look is still
//! on screen, so the day's last slot carries over as the active one.

use wallshift_store::{DaySchedule, TimeSlot};

/// The slot that should be on screen at `now_minutes` (minutes since
/// midnight), or `None` when the day has no slots at all.
pub fn resolve_active_slot(schedule: &DaySchedule, now_minutes: u32) -> Option<&TimeSlot> {
    let mut slots: Vec<&TimeSlot> = schedule.slots.iter().collect();
    slots.sort_by_key(|s| s.minutes_of_day());

    slots
        .iter()
        .rev()
        .find(|s| s.minutes_of_day() <= now_minutes)
        .copied()
        .or_else(|| slots.last().copied())
}

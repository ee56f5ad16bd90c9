//! Next wallpaper change calculation
//!
//! Scans up to a week ahead for the next slot start on an enabled day.
//! Offset 0 only considers slots strictly after the current minute (a slot
//! starting right now is the *current* change, not the next one); offset 7
//! covers the case where today is the only enabled day and all of its
//! slots have already passed.

use chrono::{DateTime, Datelike, Days, Local, TimeZone};
use tracing::debug;

use wallshift_store::DaySchedule;
use wallshift_util::{format_countdown, minutes_of_day, weekday_number};

/// The next scheduled wallpaper change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextChange {
    /// Weekday the change falls on (1 = Monday).
    pub day: u8,
    /// Calendar days from now until the change (0 = today).
    pub day_offset: u8,
    pub label: String,
    pub hour: u8,
    pub minute: u8,
    /// Exact local time of the change, seconds zeroed.
    pub at: DateTime<Local>,
    pub minutes_until: u32,
}

impl NextChange {
    /// Human-readable countdown ("in 2d", "in 3h 10m", "in 45m").
    pub fn countdown(&self) -> String {
        format_countdown(self.day_offset, self.minutes_until)
    }
}

/// Find the next slot start at or after `now`, or `None` when every day is
/// disabled or empty.
pub fn next_change(schedules: &[DaySchedule], now: DateTime<Local>) -> Option<NextChange> {
    let today = weekday_number(now.weekday());
    let now_minutes = minutes_of_day(&now);

    for offset in 0u8..=7 {
        let day = (today - 1 + offset) % 7 + 1;
        let Some(schedule) = schedules.iter().find(|s| s.day == day) else {
            continue;
        };
        if !schedule.enabled {
            continue;
        }

        let mut slots: Vec<_> = schedule.slots.iter().collect();
        slots.sort_by_key(|s| s.minutes_of_day());

        let candidate = if offset == 0 {
            slots.into_iter().find(|s| s.minutes_of_day() > now_minutes)
        } else {
            slots.into_iter().next()
        };

        let Some(slot) = candidate else {
            continue;
        };

        let date = now.date_naive().checked_add_days(Days::new(offset as u64))?;
        let naive = date.and_hms_opt(slot.hour as u32, slot.minute as u32, 0)?;
        let Some(at) = Local.from_local_datetime(&naive).earliest() else {
            // Slot time does not exist on that date (DST gap); try later days.
            debug!(day, slot = %slot.label, "Slot start falls in a DST gap, skipping");
            continue;
        };

        let minutes_until = (at - now).num_minutes().max(0) as u32;
        return Some(NextChange {
            day,
            day_offset: offset,
            label: slot.label.clone(),
            hour: slot.hour,
            minute: slot.minute,
            at,
            minutes_until,
        });
    }

    None
}

//! Time utilities for wallshift
//!
//! The scheduler resolves everything against the local wall clock: weekdays
//! are numbered 1=Monday..7=Sunday and times within a day are compared as
//! minutes since midnight.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `WALLSHIFT_MOCK_TIME` environment variable can be set
//! to override the system time for all time-sensitive operations. This is
//! useful for testing slot transitions without waiting for them.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2026-01-05 07:59:00`)

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike, Weekday};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "WALLSHIFT_MOCK_TIME";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .and_then(|naive| Local.from_local_datetime(&naive).single())
                {
                    Some(mock_dt) => {
                        let offset = mock_dt.signed_duration_since(chrono::Local::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    None => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = "%Y-%m-%d %H:%M:%S",
                            "Invalid mock time, ignoring"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();
    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Weekday number used throughout the schedule model: 1=Monday..7=Sunday.
pub fn weekday_number(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
        Weekday::Sun => 7,
    }
}

/// Display name for a weekday number. Out-of-range numbers display as "?".
pub fn day_name(day: u8) -> &'static str {
    match day {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "?",
    }
}

/// Minutes since local midnight for the given instant.
pub fn minutes_of_day(dt: &DateTime<Local>) -> u32 {
    dt.hour() * 60 + dt.minute()
}

/// Format a slot time as `HH:MM`.
pub fn format_slot_time(hour: u8, minute: u8) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// Format a countdown to a future slot activation.
///
/// Once the distance reaches a full day the countdown is expressed as the
/// calendar-day offset ("in 2d" for Monday morning to Wednesday morning),
/// never as a large hour count like "in 46h".
pub fn format_countdown(day_offset: u8, minutes_until: u32) -> String {
    let hours = minutes_until / 60;
    let mins = minutes_until % 60;

    if hours >= 24 {
        format!("in {}d", day_offset)
    } else if hours > 0 {
        format!("in {}h {}m", hours, mins)
    } else {
        format!("in {}m", mins)
    }
}

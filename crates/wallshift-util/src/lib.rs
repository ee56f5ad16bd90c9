//! Shared utilities for wallshift
//!
//! This crate provides:
//! - Time helpers (weekday numbering, minutes-of-day, countdown formatting)
//! - Slot label display names
//! - The wallpaper `Target` enum (home/lock/both)
//! - Default paths for the data directory

mod label;
mod paths;
mod target;
mod time;

pub use label::*;
pub use paths::*;
pub use target::*;
pub use time::*;

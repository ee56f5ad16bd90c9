//! wallshiftd - Scheduled wallpaper changes for the desktop
//!
//! Runs as a daemon (`wallshiftd run`) that changes the wallpaper at the
//! configured slot times, and doubles as the CLI for editing schedules,
//! browsing history, managing favorites, and moving schedules between
//! machines. Daemon and CLI share one SQLite database; the daemon notices
//! CLI edits within a minute.

mod coordinator;

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use coordinator::Coordinator;
use wallshift_core::{Applier, export_backup, import_backup, next_change};
use wallshift_host::{CommandBackend, WallpaperBackend};
use wallshift_store::{FavoritesStore, HistoryStore, KvStore, ScheduleStore, ShuffleStore};
use wallshift_util::{Target, day_name, display_label, format_slot_time};

/// wallshiftd - Scheduled wallpaper changes for the desktop
#[derive(Parser, Debug)]
#[command(name = "wallshiftd")]
#[command(about = "Scheduled wallpaper changes for the desktop", long_about = None)]
struct Args {
    /// Data directory override (or set WALLSHIFT_DATA_DIR env var)
    #[arg(short, long, env = "WALLSHIFT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Setter command template; {path} and {target} are substituted
    #[arg(
        short,
        long,
        env = "WALLSHIFT_SET_COMMAND",
        default_value = "feh --bg-fill {path}"
    )]
    set_command: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the daemon (default)
    Run,
    /// Turn the scheduler on
    Enable,
    /// Turn the scheduler off
    Disable,
    /// Show the scheduler state and all day schedules
    Status,
    /// Show the next scheduled change
    Next,
    /// Apply a wallpaper right now
    Apply {
        path: PathBuf,
        #[arg(long, default_value = "both")]
        target: Target,
    },
    /// Show or clear the wallpaper history
    History {
        /// Clear the history instead of listing it
        #[arg(long)]
        clear: bool,
    },
    /// Manage favorite wallpapers
    Favorites {
        #[command(subcommand)]
        action: FavoritesCmd,
    },
    /// Write the schedule structure as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the schedule structure from a JSON export
    Import { input: PathBuf },
    /// Add a slot to a day at HH:MM
    AddSlot { day: u8, time: String },
    /// Remove a slot from a day
    RemoveSlot { day: u8, label: String },
    /// Rename a slot
    RenameSlot {
        day: u8,
        label: String,
        new_label: String,
    },
    /// Move a slot to a new HH:MM start time
    SetTime {
        day: u8,
        label: String,
        time: String,
    },
    /// Assign a wallpaper to a slot
    SetWallpaper {
        day: u8,
        label: String,
        path: PathBuf,
        #[arg(long, default_value = "both")]
        target: Target,
    },
    /// Clear a slot's wallpaper assignment
    ClearWallpaper {
        day: u8,
        label: String,
        #[arg(long, default_value = "both")]
        target: Target,
    },
    /// Point a slot at a shuffle folder
    SetShuffle {
        day: u8,
        label: String,
        folder: PathBuf,
    },
    /// Remove a slot's shuffle folder
    ClearShuffle { day: u8, label: String },
    /// Enable or disable a whole day
    SetDay {
        day: u8,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCmd {
    /// List favorites
    List {
        /// Only favorites whose file still exists
        #[arg(long)]
        existing: bool,
    },
    /// Add a favorite
    Add { path: PathBuf },
    /// Remove a favorite
    Remove { path: PathBuf },
    /// Toggle a favorite
    Toggle { path: PathBuf },
}

fn parse_time(time: &str) -> Result<(u8, u8)> {
    let Some((hour, minute)) = time.split_once(':') else {
        bail!("Time must be HH:MM, got '{time}'");
    };
    let hour: u8 = hour.parse().with_context(|| format!("Bad hour in '{time}'"))?;
    let minute: u8 = minute
        .parse()
        .with_context(|| format!("Bad minute in '{time}'"))?;
    if hour > 23 || minute > 59 {
        bail!("Time out of range: '{time}'");
    }
    Ok((hour, minute))
}

fn open_store(args: &Args) -> Result<KvStore> {
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(wallshift_util::default_data_dir);

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = data_dir.join("wallshift.db");
    let kv = KvStore::open(&db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;
    ensure!(kv.is_healthy(), "Database {:?} failed health check", db_path);

    info!(db_path = %db_path.display(), "Store opened");
    Ok(kv)
}

fn print_status(kv: &KvStore) -> Result<()> {
    let schedules = ScheduleStore::new(kv);
    let shuffle_folders: HashMap<(u8, String), String> = ShuffleStore::new(kv)
        .all_folders()?
        .into_iter()
        .map(|(day, label, folder)| ((day, label), folder))
        .collect();

    println!(
        "Scheduler: {}",
        if schedules.scheduler_enabled()? {
            "enabled"
        } else {
            "disabled"
        }
    );

    for day in schedules.load_all()? {
        println!(
            "\n{} ({})",
            day_name(day.day),
            if day.enabled { "on" } else { "off" }
        );
        for slot in &day.slots {
            let mut line = format!(
                "  {} {}",
                format_slot_time(slot.hour, slot.minute),
                display_label(&slot.label)
            );
            if let Some(folder) = shuffle_folders.get(&(day.day, slot.label.clone())) {
                line.push_str(&format!("  shuffle: {folder}"));
            } else {
                if let Some(home) = &slot.home_wallpaper {
                    line.push_str(&format!("  home: {home}"));
                }
                if let Some(lock) = &slot.lock_wallpaper {
                    line.push_str(&format!("  lock: {lock}"));
                }
            }
            println!("{line}");
        }
    }

    Ok(())
}

fn print_next(kv: &KvStore) -> Result<()> {
    let schedules = ScheduleStore::new(kv);

    if !schedules.scheduler_enabled()? {
        println!("Scheduler is disabled");
        return Ok(());
    }

    match next_change(&schedules.load_all()?, wallshift_util::now()) {
        Some(next) => println!(
            "Next change: {} {} '{}' ({})",
            day_name(next.day),
            format_slot_time(next.hour, next.minute),
            display_label(&next.label),
            next.countdown()
        ),
        None => println!("No upcoming changes (all days disabled)"),
    }

    Ok(())
}

fn run_command(kv: &KvStore, backend: &dyn WallpaperBackend, cmd: Cmd) -> Result<()> {
    let schedules = ScheduleStore::new(kv);

    match cmd {
        // Run is handled by the caller.
        Cmd::Run => unreachable!(),

        Cmd::Enable => {
            schedules.set_scheduler_enabled(true)?;
            println!("Scheduler enabled");
        }
        Cmd::Disable => {
            schedules.set_scheduler_enabled(false)?;
            println!("Scheduler disabled");
        }
        Cmd::Status => print_status(kv)?,
        Cmd::Next => print_next(kv)?,

        Cmd::Apply { path, target } => {
            Applier::new(kv, backend).apply_manual(&path, target)?;
            println!("Applied {} to {target}", path.display());
        }

        Cmd::History { clear } => {
            let history = HistoryStore::new(kv);
            if clear {
                history.clear()?;
                println!("History cleared");
            } else {
                for entry in history.list()? {
                    let label = entry
                        .slot_label
                        .as_deref()
                        .map(|l| format!("  ({})", display_label(l)))
                        .unwrap_or_default();
                    println!(
                        "{}  {:4}  {}{}",
                        entry.applied_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                        entry.target,
                        entry.path,
                        label
                    );
                }
            }
        }

        Cmd::Favorites { action } => {
            let favorites = FavoritesStore::new(kv);
            match action {
                FavoritesCmd::List { existing } => {
                    let list = if existing {
                        favorites.list_existing()?
                    } else {
                        favorites.list()?
                    };
                    for favorite in list {
                        println!("{}", favorite.path);
                    }
                }
                FavoritesCmd::Add { path } => {
                    favorites.add(&path.display().to_string())?;
                    println!("Added {}", path.display());
                }
                FavoritesCmd::Remove { path } => {
                    if favorites.remove(&path.display().to_string())? {
                        println!("Removed {}", path.display());
                    } else {
                        println!("{} was not a favorite", path.display());
                    }
                }
                FavoritesCmd::Toggle { path } => {
                    let now_favorite = favorites.toggle(&path.display().to_string())?;
                    println!(
                        "{} is {} a favorite",
                        path.display(),
                        if now_favorite { "now" } else { "no longer" }
                    );
                }
            }
        }

        Cmd::Export { output } => {
            let json = export_backup(kv)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Cmd::Import { input } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            let days = import_backup(kv, &json)?;
            println!("Imported {days} day schedules");
        }

        Cmd::AddSlot { day, time } => {
            let (hour, minute) = parse_time(&time)?;
            let label = schedules.add_slot(day, hour, minute)?;
            println!("Added slot '{label}' to {}", day_name(day));
        }
        Cmd::RemoveSlot { day, label } => {
            schedules.remove_slot(day, &label)?;
            println!("Removed slot '{label}' from {}", day_name(day));
        }
        Cmd::RenameSlot {
            day,
            label,
            new_label,
        } => {
            schedules.rename_slot(day, &label, &new_label)?;
            println!("Renamed '{label}' to '{new_label}'");
        }
        Cmd::SetTime { day, label, time } => {
            let (hour, minute) = parse_time(&time)?;
            schedules.set_slot_time(day, &label, hour, minute)?;
            println!("Moved '{label}' to {}", format_slot_time(hour, minute));
        }
        Cmd::SetWallpaper {
            day,
            label,
            path,
            target,
        } => {
            schedules.set_slot_wallpaper(day, &label, target, Some(&path.display().to_string()))?;
            println!("Set {target} wallpaper for '{label}'");
        }
        Cmd::ClearWallpaper { day, label, target } => {
            schedules.set_slot_wallpaper(day, &label, target, None)?;
            println!("Cleared {target} wallpaper for '{label}'");
        }

        Cmd::SetShuffle { day, label, folder } => {
            ShuffleStore::new(kv).set_folder(day, &label, &folder.display().to_string())?;
            println!("Slot '{label}' now shuffles {}", folder.display());
        }
        Cmd::ClearShuffle { day, label } => {
            ShuffleStore::new(kv).clear_folder(day, &label)?;
            println!("Slot '{label}' no longer shuffles");
        }

        Cmd::SetDay { day, enabled } => {
            schedules.set_day_enabled(day, enabled)?;
            println!(
                "{} {}",
                day_name(day),
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let kv = open_store(&args)?;

    match args.command {
        None | Some(Cmd::Run) => {
            info!(version = env!("CARGO_PKG_VERSION"), "wallshiftd starting");

            let backend: Arc<dyn WallpaperBackend> =
                Arc::new(CommandBackend::new(args.set_command.clone()));
            Coordinator::new(Arc::new(kv), backend).run().await
        }
        Some(cmd) => {
            let backend = CommandBackend::new(args.set_command.clone());
            run_command(&kv, &backend, cmd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_parsing() {
        assert_eq!(parse_time("08:30").unwrap(), (8, 30));
        assert_eq!(parse_time("0:5").unwrap(), (0, 5));
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("noon").is_err());
        assert!(parse_time("12").is_err());
    }

    #[test]
    fn cli_parses() {
        Args::try_parse_from(["wallshiftd", "add-slot", "3", "12:30"]).unwrap();
        Args::try_parse_from(["wallshiftd", "apply", "/pics/a.png", "--target", "lock"]).unwrap();
        Args::try_parse_from(["wallshiftd", "favorites", "toggle", "/pics/a.png"]).unwrap();
        Args::try_parse_from(["wallshiftd", "set-day", "6", "false"]).unwrap();
        assert!(Args::try_parse_from(["wallshiftd", "apply"]).is_err());
    }
}

//! Change coordinator
//!
//! Keeps the desktop in sync with the schedule using three overlapping
//! triggers:
//! - An exact alarm for the next slot start
//! - A one-minute tick that re-reads the scheduler flag and re-arms the
//!   alarm when edits from another process made it stale
//! - A fifteen-minute backstop apply that heals anything the alarm missed
//!   (suspend, clock jumps), retrying once on failure
//!
//! SIGHUP forces an immediate apply and re-arm, for session managers that
//! signal on resume or time change. SIGTERM and SIGINT shut down.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, error, info, warn};

use wallshift_core::{Applier, CoreResult, next_change};
use wallshift_host::WallpaperBackend;
use wallshift_store::{KvStore, ScheduleStore};

const TICK_INTERVAL: Duration = Duration::from_secs(60);
const BACKSTOP_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub struct Coordinator {
    kv: Arc<KvStore>,
    backend: Arc<dyn WallpaperBackend>,
}

impl Coordinator {
    pub fn new(kv: Arc<KvStore>, backend: Arc<dyn WallpaperBackend>) -> Self {
        Self { kv, backend }
    }

    pub async fn run(self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sighup = signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

        let mut tick = tokio::time::interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut backstop = tokio::time::interval(BACKSTOP_INTERVAL);
        backstop.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Apply whatever is due right now, then arm the first alarm.
        let mut enabled = self.scheduler_enabled().await;
        self.apply_current().await;
        let mut armed = self.compute_alarm().await;
        if let Some(at) = armed {
            info!(at = %at, "Alarm armed");
        }

        info!("Coordinator running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down");
                    break;
                }

                // Resume / time change: apply immediately and re-arm.
                _ = sighup.recv() => {
                    info!("Received SIGHUP, forcing apply");
                    self.apply_current().await;
                    armed = self.rearm(None).await;
                }

                _ = tick.tick() => {
                    enabled = self.observe_enabled(enabled).await;
                    armed = self.rearm(armed).await;
                }

                _ = backstop.tick() => {
                    debug!("Backstop apply");
                    if !self.apply_current().await {
                        warn!("Backstop apply failed, retrying once");
                        self.apply_current().await;
                    }
                }

                _ = wait_until(armed) => {
                    info!("Alarm fired");
                    self.apply_current().await;
                    armed = self.rearm(None).await;
                }
            }
        }

        info!("Coordinator stopped");
        Ok(())
    }

    /// Re-read the scheduler flag. Flipping from off to on applies the
    /// active slot right away, so an `enable` from the CLI takes effect on
    /// the next tick instead of waiting for an alarm or the backstop.
    async fn observe_enabled(&self, was_enabled: bool) -> bool {
        let enabled = self.scheduler_enabled().await;

        if enabled && !was_enabled {
            info!("Scheduler enabled, applying now");
            self.apply_current().await;
        }

        enabled
    }

    async fn scheduler_enabled(&self) -> bool {
        let kv = self.kv.clone();

        let result =
            tokio::task::spawn_blocking(move || ScheduleStore::new(&kv).scheduler_enabled()).await;

        match result {
            Ok(Ok(enabled)) => enabled,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to read scheduler flag");
                false
            }
            Err(e) => {
                error!(error = %e, "Scheduler flag read panicked");
                false
            }
        }
    }

    /// Apply the active slot. Returns whether the apply succeeded; a
    /// disabled scheduler counts as success.
    async fn apply_current(&self) -> bool {
        let kv = self.kv.clone();
        let backend = self.backend.clone();

        let result = tokio::task::spawn_blocking(move || -> CoreResult<()> {
            let schedules = ScheduleStore::new(&kv);
            if !schedules.scheduler_enabled()? {
                debug!("Scheduler disabled, skipping apply");
                return Ok(());
            }

            let applier = Applier::new(&kv, backend.as_ref());
            applier.apply_current(wallshift_util::now())?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!(error = %e, "Apply failed");
                false
            }
            Err(e) => {
                error!(error = %e, "Apply task panicked");
                false
            }
        }
    }

    /// Recompute the alarm and report a change. Edits made by the CLI in
    /// another process show up here within one tick.
    async fn rearm(&self, armed: Option<DateTime<Local>>) -> Option<DateTime<Local>> {
        let target = self.compute_alarm().await;

        if target != armed {
            match target {
                Some(at) => info!(at = %at, "Alarm rearmed"),
                None => info!("Alarm cleared"),
            }
        }

        target
    }

    /// When the next slot starts, or `None` when the scheduler is off or
    /// nothing is due in the coming week.
    async fn compute_alarm(&self) -> Option<DateTime<Local>> {
        let kv = self.kv.clone();

        let result = tokio::task::spawn_blocking(move || -> CoreResult<Option<DateTime<Local>>> {
            let schedules = ScheduleStore::new(&kv);
            if !schedules.scheduler_enabled()? {
                return Ok(None);
            }

            let days = schedules.load_all()?;
            Ok(next_change(&days, wallshift_util::now()).map(|n| n.at))
        })
        .await;

        match result {
            Ok(Ok(at)) => at,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to compute next change");
                None
            }
            Err(e) => {
                error!(error = %e, "Alarm computation panicked");
                None
            }
        }
    }
}

/// Sleep until the given local time; pend forever when there is none.
async fn wait_until(deadline: Option<DateTime<Local>>) {
    match deadline {
        Some(at) => {
            let delta = (at - wallshift_util::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            tokio::time::sleep(delta).await;
        }
        None => std::future::pending().await,
    }
}

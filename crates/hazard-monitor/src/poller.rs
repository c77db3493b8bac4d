//! Scheduled poller tasks.
//!
//! Three independently-cadenced tasks: a fixed fast cadence for EEW, a
//! dynamic cadence for quake/tsunami (re-read from state each cycle), and
//! the display rotation timer. All are owned by the monitor and aborted
//! together on shutdown.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use hazard_core::FeedType;

use crate::monitor::Monitor;

/// Fixed cadence of the EEW poller. Never varies: this is the
/// fastest-reacting feed and must not be slowed by anything else.
pub const EEW_CADENCE: Duration = Duration::from_secs(5);

/// Display rotation interval (Seismic ↔ Tsunami).
pub const ROTATE_INTERVAL: Duration = Duration::from_secs(10);

/// Spawn all scheduled tasks for a monitor.
pub(crate) fn spawn_all(monitor: Monitor) -> Vec<JoinHandle<()>> {
    vec![
        spawn_eew(monitor.clone()),
        spawn_quake_tsunami(monitor.clone()),
        spawn_rotation(monitor),
    ]
}

fn spawn_eew(monitor: Monitor) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EEW_CADENCE);
        // Skip missed ticks so resuming after a stall or test mode does not
        // produce a burst of back-to-back polls.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!("EEW poller started ({:?} cadence)", EEW_CADENCE);

        loop {
            interval.tick().await;
            monitor.poll_cycle(&[FeedType::Eew]).await;
        }
    })
}

fn spawn_quake_tsunami(monitor: Monitor) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("quake/tsunami poller started (dynamic cadence)");

        loop {
            // Read the cadence fresh each cycle so tightening takes effect
            // on the next tick without restarting the loop.
            let cadence = monitor.poll_cadence_ms().await;
            tokio::time::sleep(Duration::from_millis(cadence)).await;
            monitor
                .poll_cycle(&[FeedType::Quake, FeedType::Tsunami])
                .await;
        }
    })
}

fn spawn_rotation(monitor: Monitor) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ROTATE_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; consume it so the
        // initial display holds for a full rotation period.
        interval.tick().await;
        debug!("display rotation started ({:?} interval)", ROTATE_INTERVAL);

        loop {
            interval.tick().await;
            monitor.rotation_tick(Utc::now()).await;
        }
    })
}

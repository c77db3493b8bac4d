//! Headless hazard-monitor daemon.
//!
//! Wires the monitor to a log-only tone output and runs until Ctrl+C.
//! Feed configuration comes from the environment (see `quake-feed`).

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use alert_audio::ToneOutput;
use hazard_monitor::Monitor;

/// Tone output that logs instead of playing; headless stand-in for the
/// platform audio primitive.
struct LogOutput;

impl ToneOutput for LogOutput {
    fn play_tone(&self, freq_hz: f32, duration_ms: u64, gain: f32) {
        info!(freq_hz, duration_ms, gain, "tone");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let monitor = Monitor::from_env(Arc::new(LogOutput))?;
    monitor.start();
    info!("monitord {} running", hazard_monitor::version());

    // Periodic status line so a silent feed is observable.
    let status_monitor = monitor.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(30)).await;
            let snapshot = status_monitor.snapshot().await;
            info!(
                display_mode = ?snapshot.display_mode,
                cadence_ms = snapshot.poll_cadence_ms,
                quake = ?snapshot.latest_quake.as_ref().map(|e| e.headline()),
                tsunami = ?snapshot.latest_tsunami.as_ref().map(|e| e.headline()),
                eew = ?snapshot.latest_eew.as_ref().map(|e| e.headline()),
                "status"
            );
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    monitor.shutdown();
    Ok(())
}

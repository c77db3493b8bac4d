//! Alert-monitoring engine.
//!
//! Continuously polls the civil-alert feeds, arbitrates which alert class is
//! currently active, deduplicates repeated notices so each event is announced
//! exactly once, and drives a severity-dependent audible signal.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use alert_audio::NullOutput;
//! use hazard_monitor::Monitor;
//!
//! # async fn example() -> Result<(), quake_feed::FeedError> {
//! let monitor = Monitor::from_env(Arc::new(NullOutput))?;
//! monitor.start();
//!
//! // Dashboard-side projection.
//! let snapshot = monitor.snapshot().await;
//! println!("display mode: {:?}", snapshot.display_mode);
//!
//! monitor.shutdown();
//! # Ok(())
//! # }
//! ```

mod arbitrator;
mod monitor;
mod poller;
mod state;

pub use arbitrator::{ApplyOutcome, Arbitrator, EMERGENCY_MAGNITUDE};
pub use monitor::Monitor;
pub use poller::{EEW_CADENCE, ROTATE_INTERVAL};
pub use state::{DisplayMode, MonitorSnapshot, MonitorState, BASE_CADENCE_MS, TIGHT_CADENCE_MS};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

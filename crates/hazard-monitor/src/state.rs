//! Monitor state and its read-only projection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hazard_core::{FeedType, NormalizedEvent};

/// Baseline cadence of the quake/tsunami poller in milliseconds.
pub const BASE_CADENCE_MS: u64 = 30_000;

/// Tightened cadence used while any emergency condition holds.
pub const TIGHT_CADENCE_MS: u64 = 6_000;

/// Which alert class the dashboard panel currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Seismic,
    Tsunami,
    Eew,
}

/// The single process-wide monitor state.
///
/// Mutated only by the arbitrator; every other component sees it through
/// [`MonitorSnapshot`].
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub latest_quake: Option<NormalizedEvent>,
    pub latest_tsunami: Option<NormalizedEvent>,
    pub latest_eew: Option<NormalizedEvent>,
    /// Last `occurred_at` for which audio was triggered, per feed type.
    pub last_fired: HashMap<FeedType, DateTime<Utc>>,
    pub display_mode: DisplayMode,
    /// Current cadence of the quake/tsunami poller, recomputed after every
    /// update. The poller re-reads this at the start of each cycle.
    pub poll_cadence_ms: u64,
    pub test_mode: bool,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            latest_quake: None,
            latest_tsunami: None,
            latest_eew: None,
            last_fired: HashMap::new(),
            display_mode: DisplayMode::Seismic,
            poll_cadence_ms: BASE_CADENCE_MS,
            test_mode: false,
        }
    }
}

impl MonitorState {
    /// The stored latest event for a feed type.
    pub fn latest(&self, feed: FeedType) -> Option<&NormalizedEvent> {
        match feed {
            FeedType::Quake => self.latest_quake.as_ref(),
            FeedType::Tsunami => self.latest_tsunami.as_ref(),
            FeedType::Eew => self.latest_eew.as_ref(),
        }
    }

    /// Replace the stored latest event for the event's feed type.
    pub fn set_latest(&mut self, event: NormalizedEvent) {
        match event.feed_type {
            FeedType::Quake => self.latest_quake = Some(event),
            FeedType::Tsunami => self.latest_tsunami = Some(event),
            FeedType::Eew => self.latest_eew = Some(event),
        }
    }

    /// Take a read-only snapshot for the UI projection.
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            latest_quake: self.latest_quake.clone(),
            latest_tsunami: self.latest_tsunami.clone(),
            latest_eew: self.latest_eew.clone(),
            display_mode: self.display_mode,
            poll_cadence_ms: self.poll_cadence_ms,
            test_mode: self.test_mode,
        }
    }
}

/// Read-only snapshot of the monitor state exposed to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub latest_quake: Option<NormalizedEvent>,
    pub latest_tsunami: Option<NormalizedEvent>,
    pub latest_eew: Option<NormalizedEvent>,
    pub display_mode: DisplayMode,
    pub poll_cadence_ms: u64,
    pub test_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hazard_core::{normalize, QuakeEvent, RawEventRecord};

    #[test]
    fn test_default_state() {
        let state = MonitorState::default();
        assert_eq!(state.display_mode, DisplayMode::Seismic);
        assert_eq!(state.poll_cadence_ms, BASE_CADENCE_MS);
        assert!(!state.test_mode);
        assert!(state.latest_quake.is_none());
    }

    #[test]
    fn test_set_latest_routes_by_feed() {
        let now = Utc::now();
        let mut state = MonitorState::default();
        let record = RawEventRecord::Quake(QuakeEvent {
            occurred_at: now,
            epicenter_raw: "東京都".to_string(),
            magnitude: 4.2,
            max_intensity_code: 30,
            depth_km: 20.0,
        });
        state.set_latest(normalize(&record, now));
        assert!(state.latest_quake.is_some());
        assert!(state.latest(hazard_core::FeedType::Tsunami).is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = MonitorState::default().snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("Seismic"));
    }
}

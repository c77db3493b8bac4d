//! Alert arbitration state machine.
//!
//! The arbitrator is the single writer of [`MonitorState`]. Every poll
//! result, test injection, and timer tick funnels through it, so the
//! dedup/fire logic runs inside one serialized critical section.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use alert_audio::AlertSynth;
use hazard_core::{
    is_stale, normalize, AlertClass, EventDetail, NormalizedEvent, RawEventRecord, SeverityLevel,
};

use crate::state::{DisplayMode, MonitorState, BASE_CADENCE_MS, TIGHT_CADENCE_MS};

/// Quake magnitude at or above which the poll cadence tightens.
pub const EMERGENCY_MAGNITUDE: f64 = 6.0;

/// What an update did, for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Novel event; audio fired with this class.
    Fired(AlertClass),
    /// Novel event; audio suppressed (cancelled or inactive severity).
    Silent,
    /// Same `occurred_at` as already announced; display data refreshed only.
    Duplicate,
}

/// Single-writer owner of [`MonitorState`].
pub struct Arbitrator {
    state: MonitorState,
    synth: AlertSynth,
}

impl Arbitrator {
    /// Create an arbitrator with fresh state.
    pub fn new(synth: AlertSynth) -> Self {
        Self {
            state: MonitorState::default(),
            synth,
        }
    }

    /// Read access to the current state.
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Normalize a raw feed record and apply it.
    pub fn apply_raw(&mut self, record: &RawEventRecord, now: DateTime<Utc>) -> ApplyOutcome {
        self.apply(normalize(record, now), now)
    }

    /// Apply a normalized event: dedup against `last_fired`, trigger audio
    /// for novel non-cancelled active events, store the event for display,
    /// and re-resolve display mode and poll cadence.
    pub fn apply(&mut self, event: NormalizedEvent, now: DateTime<Utc>) -> ApplyOutcome {
        let feed = event.feed_type;
        let occurred_at = event.occurred_at;
        let novel = self.state.last_fired.get(&feed) != Some(&occurred_at);

        let outcome = if !novel {
            debug!(feed = %feed, %occurred_at, "duplicate event, refreshing display only");
            ApplyOutcome::Duplicate
        } else {
            // Record the timestamp even when audio is suppressed, so a later
            // duplicate of a cancellation cannot fire either.
            self.state.last_fired.insert(feed, occurred_at);

            if event.cancelled {
                info!(feed = %feed, %occurred_at, "cancellation received");
                ApplyOutcome::Silent
            } else {
                match event.severity.alert_class() {
                    Some(class) => {
                        info!(
                            feed = %feed,
                            severity = ?event.severity,
                            headline = %event.headline(),
                            "new alert"
                        );
                        self.synth.play(class);
                        ApplyOutcome::Fired(class)
                    }
                    None => {
                        debug!(feed = %feed, %occurred_at, "inactive event, no audio");
                        ApplyOutcome::Silent
                    }
                }
            }
        };

        self.state.set_latest(event);
        self.heartbeat(now);
        outcome
    }

    /// Inject a test event. Sets test mode before applying so the display
    /// resolves to EEW immediately; the event goes through the normal
    /// dedup/fire path and plays audio exactly once.
    pub fn enter_test(&mut self, record: &RawEventRecord, now: DateTime<Utc>) -> ApplyOutcome {
        self.state.test_mode = true;
        let outcome = self.apply_raw(record, now);
        info!(?outcome, "test mode entered");
        outcome
    }

    /// Clear the synthetic state and leave test mode. The caller is expected
    /// to follow up with a manual poll to resynchronize with live data.
    pub fn exit_test(&mut self, now: DateTime<Utc>) {
        self.state.test_mode = false;
        self.state.latest_eew = None;
        self.heartbeat(now);
        info!("test mode exited");
    }

    /// Rotation timer tick: flip Seismic ↔ Tsunami unless EEW or test mode
    /// is forcing the display.
    pub fn rotation_tick(&mut self, now: DateTime<Utc>) {
        self.heartbeat(now);
        if self.state.test_mode || self.state.display_mode == DisplayMode::Eew {
            return;
        }
        self.state.display_mode = match self.state.display_mode {
            DisplayMode::Seismic => DisplayMode::Tsunami,
            DisplayMode::Tsunami | DisplayMode::Eew => DisplayMode::Seismic,
        };
    }

    /// Re-resolve display mode and poll cadence against `now`.
    ///
    /// Idempotent and side-effect-free beyond the stored values; called
    /// after every update and on every timer tick so that staleness expiry
    /// releases the EEW override and relaxes the cadence without requiring
    /// a new event.
    pub fn heartbeat(&mut self, now: DateTime<Utc>) {
        if self.state.test_mode || self.eew_active(now) {
            self.state.display_mode = DisplayMode::Eew;
        } else if self.state.display_mode == DisplayMode::Eew {
            // Override released; hand control back to auto-rotation.
            self.state.display_mode = DisplayMode::Seismic;
        }

        self.state.poll_cadence_ms = if self.emergency_condition(now) {
            TIGHT_CADENCE_MS
        } else {
            BASE_CADENCE_MS
        };
    }

    /// True while a non-stale, non-cancelled EEW holds the display.
    pub fn eew_active(&self, now: DateTime<Utc>) -> bool {
        self.state.latest_eew.as_ref().is_some_and(|e| {
            !e.cancelled && e.severity != SeverityLevel::None && !is_stale(e.occurred_at, now)
        })
    }

    /// Emergency predicate for cadence tightening: EEW active, or a fresh
    /// quake at magnitude ≥ 6.0, or a fresh uncancelled tsunami advisory.
    fn emergency_condition(&self, now: DateTime<Utc>) -> bool {
        if self.eew_active(now) {
            return true;
        }

        let quake_emergency = self.state.latest_quake.as_ref().is_some_and(|q| {
            !is_stale(q.occurred_at, now)
                && matches!(
                    q.detail,
                    EventDetail::Quake { magnitude, .. } if magnitude >= EMERGENCY_MAGNITUDE
                )
        });
        if quake_emergency {
            return true;
        }

        self.state
            .latest_tsunami
            .as_ref()
            .is_some_and(|t| !t.cancelled && !is_stale(t.occurred_at, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    use alert_audio::NullOutput;
    use hazard_core::{
        EewEvent, EewIssueKind, QuakeEvent, TsunamiArea, TsunamiEvent, TsunamiGrade,
        STALENESS_SECS,
    };

    fn arbitrator() -> Arbitrator {
        Arbitrator::new(AlertSynth::new(Arc::new(NullOutput)))
    }

    fn quake(magnitude: f64, intensity: i32, occurred_at: DateTime<Utc>) -> RawEventRecord {
        RawEventRecord::Quake(QuakeEvent {
            occurred_at,
            epicenter_raw: "宮城県沖".to_string(),
            magnitude,
            max_intensity_code: intensity,
            depth_km: 40.0,
        })
    }

    fn eew(occurred_at: DateTime<Utc>, cancelled: bool) -> RawEventRecord {
        RawEventRecord::Eew(EewEvent {
            occurred_at,
            epicenter_raw: "千葉県北西部".to_string(),
            cancelled,
            issue_kind: EewIssueKind::Warning,
        })
    }

    fn tsunami(occurred_at: DateTime<Utc>, cancelled: bool) -> RawEventRecord {
        RawEventRecord::Tsunami(TsunamiEvent {
            occurred_at,
            cancelled,
            areas: vec![TsunamiArea {
                grade_raw: TsunamiGrade::Warning,
                name_raw: "宮城県".to_string(),
            }],
        })
    }

    #[tokio::test]
    async fn test_dedup_fires_exactly_once() {
        let mut arb = arbitrator();
        let now = Utc::now();
        let record = quake(5.0, 40, now);

        assert_eq!(
            arb.apply_raw(&record, now),
            ApplyOutcome::Fired(AlertClass::Standard)
        );
        assert_eq!(arb.apply_raw(&record, now), ApplyOutcome::Duplicate);
        assert_eq!(arb.apply_raw(&record, now), ApplyOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_duplicate_still_refreshes_display() {
        let mut arb = arbitrator();
        let now = Utc::now();
        let record = quake(5.0, 40, now);

        arb.apply_raw(&record, now);
        arb.state.latest_quake = None;
        arb.apply_raw(&record, now);
        assert!(arb.state().latest_quake.is_some());
    }

    #[tokio::test]
    async fn test_eew_forces_display_over_quake() {
        let mut arb = arbitrator();
        let now = Utc::now();

        arb.apply_raw(&quake(6.5, 50, now), now);
        arb.apply_raw(&eew(now, false), now);
        assert_eq!(arb.state().display_mode, DisplayMode::Eew);

        // Rotation is suspended while EEW is forcing.
        arb.rotation_tick(now);
        assert_eq!(arb.state().display_mode, DisplayMode::Eew);
    }

    #[tokio::test]
    async fn test_eew_staleness_releases_override() {
        let mut arb = arbitrator();
        let now = Utc::now();

        arb.apply_raw(&eew(now, false), now);
        assert_eq!(arb.state().display_mode, DisplayMode::Eew);

        let later = now + Duration::seconds(STALENESS_SECS + 1);
        arb.heartbeat(later);
        assert_eq!(arb.state().display_mode, DisplayMode::Seismic);
    }

    #[tokio::test]
    async fn test_eew_cancellation_releases_override_and_is_silent() {
        let mut arb = arbitrator();
        let now = Utc::now();

        arb.apply_raw(&eew(now, false), now);
        assert_eq!(arb.state().display_mode, DisplayMode::Eew);

        let cancel_at = now + Duration::seconds(5);
        let outcome = arb.apply_raw(&eew(cancel_at, true), cancel_at);
        assert_eq!(outcome, ApplyOutcome::Silent);
        assert_eq!(arb.state().display_mode, DisplayMode::Seismic);
    }

    #[tokio::test]
    async fn test_cancelled_tsunami_never_fires() {
        let mut arb = arbitrator();
        let now = Utc::now();

        let outcome = arb.apply_raw(&tsunami(now, true), now);
        assert_eq!(outcome, ApplyOutcome::Silent);

        // A later duplicate of the cancellation cannot fire either.
        assert_eq!(arb.apply_raw(&tsunami(now, true), now), ApplyOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_stale_event_is_silent() {
        let mut arb = arbitrator();
        let now = Utc::now();
        let old = now - Duration::seconds(STALENESS_SECS + 60);

        let outcome = arb.apply_raw(&eew(old, false), now);
        assert_eq!(outcome, ApplyOutcome::Silent);
        assert_eq!(arb.state().display_mode, DisplayMode::Seismic);
    }

    #[tokio::test]
    async fn test_cadence_tightens_on_strong_quake_and_relaxes_when_stale() {
        let mut arb = arbitrator();
        let now = Utc::now();

        arb.apply_raw(&quake(6.0, 50, now), now);
        assert_eq!(arb.state().poll_cadence_ms, TIGHT_CADENCE_MS);

        let later = now + Duration::seconds(STALENESS_SECS + 1);
        arb.heartbeat(later);
        assert_eq!(arb.state().poll_cadence_ms, BASE_CADENCE_MS);
    }

    #[tokio::test]
    async fn test_cadence_stays_baseline_for_weak_quake() {
        let mut arb = arbitrator();
        let now = Utc::now();

        arb.apply_raw(&quake(4.5, 30, now), now);
        assert_eq!(arb.state().poll_cadence_ms, BASE_CADENCE_MS);
    }

    #[tokio::test]
    async fn test_cadence_tightens_on_active_tsunami() {
        let mut arb = arbitrator();
        let now = Utc::now();

        arb.apply_raw(&tsunami(now, false), now);
        assert_eq!(arb.state().poll_cadence_ms, TIGHT_CADENCE_MS);

        let cancel_at = now + Duration::seconds(10);
        arb.apply_raw(&tsunami(cancel_at, true), cancel_at);
        assert_eq!(arb.state().poll_cadence_ms, BASE_CADENCE_MS);
    }

    #[tokio::test]
    async fn test_rotation_flips_between_seismic_and_tsunami() {
        let mut arb = arbitrator();
        let now = Utc::now();

        assert_eq!(arb.state().display_mode, DisplayMode::Seismic);
        arb.rotation_tick(now);
        assert_eq!(arb.state().display_mode, DisplayMode::Tsunami);
        arb.rotation_tick(now);
        assert_eq!(arb.state().display_mode, DisplayMode::Seismic);
    }

    #[tokio::test]
    async fn test_test_mode_forces_eew_and_fires_once() {
        let mut arb = arbitrator();
        let now = Utc::now();
        let record = eew(now, false);

        let outcome = arb.enter_test(&record, now);
        assert_eq!(outcome, ApplyOutcome::Fired(AlertClass::Emergency));
        assert!(arb.state().test_mode);
        assert_eq!(arb.state().display_mode, DisplayMode::Eew);

        // Rotation suspended in test mode.
        arb.rotation_tick(now);
        assert_eq!(arb.state().display_mode, DisplayMode::Eew);

        arb.exit_test(now);
        assert!(!arb.state().test_mode);
        assert!(arb.state().latest_eew.is_none());
        assert_eq!(arb.state().display_mode, DisplayMode::Seismic);
    }

    #[tokio::test]
    async fn test_heartbeat_is_idempotent() {
        let mut arb = arbitrator();
        let now = Utc::now();
        arb.apply_raw(&quake(6.2, 50, now), now);

        arb.heartbeat(now);
        let first = arb.state().snapshot();
        arb.heartbeat(now);
        let second = arb.state().snapshot();
        assert_eq!(first.display_mode, second.display_mode);
        assert_eq!(first.poll_cadence_ms, second.poll_cadence_ms);
    }
}

//! Core types for the hazard monitor.
//!
//! This crate provides the shared vocabulary for the alert-monitoring
//! engine:
//!
//! - [`RawEventRecord`] - events as retrieved from the civil-alert feeds
//! - [`NormalizedEvent`] - immutable, display-ready events
//! - [`SeverityLevel`] / [`classify`] - ranked severity classification
//! - [`translate`] - place-name normalization
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use hazard_core::{classify, normalize, QuakeEvent, RawEventRecord, SeverityLevel};
//!
//! let record = RawEventRecord::Quake(QuakeEvent {
//!     occurred_at: Utc::now(),
//!     epicenter_raw: "福島県沖".to_string(),
//!     magnitude: 6.1,
//!     max_intensity_code: 50,
//!     depth_km: 30.0,
//! });
//!
//! assert_eq!(classify(&record, Utc::now()), SeverityLevel::Major);
//! let event = normalize(&record, Utc::now());
//! assert!(event.headline().contains("FUKUSHIMA"));
//! ```

mod event;
mod placename;
mod severity;

pub use event::{
    normalize, EewEvent, EewIssueKind, EventDetail, FeedType, NormalizedEvent, QuakeEvent,
    RawEventRecord, TsunamiArea, TsunamiEvent, TsunamiGrade,
};
pub use placename::translate;
pub use severity::{
    classify, intensity_label, is_stale, worst_tsunami_grade, AlertClass, SeverityLevel,
    STALENESS_SECS,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

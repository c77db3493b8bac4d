//! Event record types for the three monitored feeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::placename::translate;
use crate::severity::{classify, intensity_label, worst_tsunami_grade, SeverityLevel};

/// The three monitored feed types, each with its own polling cadence
/// and event shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedType {
    /// Seismic intensity reports.
    Quake,
    /// Tsunami advisories.
    Tsunami,
    /// Earthquake early warnings.
    Eew,
}

impl FeedType {
    /// All feed types, in display order.
    pub const ALL: [FeedType; 3] = [FeedType::Quake, FeedType::Tsunami, FeedType::Eew];

    /// Short name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedType::Quake => "quake",
            FeedType::Tsunami => "tsunami",
            FeedType::Eew => "eew",
        }
    }
}

impl std::fmt::Display for FeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seismic intensity report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakeEvent {
    /// When the quake occurred. Sole identity for deduplication.
    pub occurred_at: DateTime<Utc>,
    /// Epicenter name in the feed's source locale.
    pub epicenter_raw: String,
    /// Magnitude; negative means the feed did not report one.
    pub magnitude: f64,
    /// Maximum observed intensity code (10/20/30/40/45/50/55/60/70).
    pub max_intensity_code: i32,
    /// Hypocenter depth in kilometers.
    pub depth_km: f64,
}

/// Tsunami forecast grade for a single coastal area.
///
/// Ordered by increasing severity so the worst grade across areas can be
/// picked with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TsunamiGrade {
    /// Grade missing or unrecognized.
    Unknown,
    /// Tsunami watch.
    Watch,
    /// Tsunami warning.
    Warning,
    /// Major tsunami warning.
    MajorWarning,
}

/// One coastal area entry in a tsunami advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsunamiArea {
    pub grade_raw: TsunamiGrade,
    /// Area name in the feed's source locale.
    pub name_raw: String,
}

/// A tsunami advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsunamiEvent {
    /// When the advisory was issued. Sole identity for deduplication.
    pub occurred_at: DateTime<Utc>,
    /// True when this notice cancels the advisory.
    pub cancelled: bool,
    pub areas: Vec<TsunamiArea>,
}

/// Issue kind of an earthquake early warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EewIssueKind {
    /// Forecast-grade notice.
    Forecast,
    /// Warning-grade notice (strong shaking expected).
    Warning,
}

/// An earthquake early warning notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EewEvent {
    /// When the warning was issued. Sole identity for deduplication.
    pub occurred_at: DateTime<Utc>,
    /// Estimated epicenter name in the feed's source locale.
    pub epicenter_raw: String,
    /// True when this notice cancels the warning.
    pub cancelled: bool,
    pub issue_kind: EewIssueKind,
}

/// An event as retrieved from one of the feeds, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawEventRecord {
    Quake(QuakeEvent),
    Tsunami(TsunamiEvent),
    Eew(EewEvent),
}

impl RawEventRecord {
    /// The feed type this record came from.
    pub fn feed_type(&self) -> FeedType {
        match self {
            RawEventRecord::Quake(_) => FeedType::Quake,
            RawEventRecord::Tsunami(_) => FeedType::Tsunami,
            RawEventRecord::Eew(_) => FeedType::Eew,
        }
    }

    /// Occurrence timestamp, the dedup identity for this feed type.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RawEventRecord::Quake(q) => q.occurred_at,
            RawEventRecord::Tsunami(t) => t.occurred_at,
            RawEventRecord::Eew(e) => e.occurred_at,
        }
    }

    /// Whether this record is a cancellation notice.
    pub fn cancelled(&self) -> bool {
        match self {
            RawEventRecord::Quake(_) => false,
            RawEventRecord::Tsunami(t) => t.cancelled,
            RawEventRecord::Eew(e) => e.cancelled,
        }
    }
}

/// Feed-specific display payload of a [`NormalizedEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventDetail {
    Quake {
        /// Translated epicenter name.
        epicenter: String,
        magnitude: f64,
        /// Rendered intensity ("1".."4", "5-", "5+", "6-", "6+", "7").
        intensity: String,
        depth_km: f64,
    },
    Tsunami {
        worst_grade: TsunamiGrade,
        /// Translated area names, feed order preserved.
        areas: Vec<String>,
    },
    Eew {
        /// Translated epicenter name.
        epicenter: String,
        issue_kind: EewIssueKind,
    },
}

/// An immutable, display-ready event.
///
/// Instances are replaced wholesale on each update and never mutated in
/// place, so concurrent readers never observe a partially-updated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub feed_type: FeedType,
    pub occurred_at: DateTime<Utc>,
    /// Severity as classified at normalization time.
    pub severity: SeverityLevel,
    pub cancelled: bool,
    pub detail: EventDetail,
}

impl NormalizedEvent {
    /// One-line summary for logs and the dashboard headline slot.
    pub fn headline(&self) -> String {
        match &self.detail {
            EventDetail::Quake {
                epicenter,
                magnitude,
                intensity,
                ..
            } => format!("{} M{:.1} INT {}", epicenter, magnitude, intensity),
            EventDetail::Tsunami { worst_grade, areas } => {
                format!("TSUNAMI {:?} ({} AREAS)", worst_grade, areas.len())
            }
            EventDetail::Eew {
                epicenter,
                issue_kind,
            } => format!("EEW {:?} {}", issue_kind, epicenter),
        }
    }
}

/// Normalize a raw feed record: translate place names and classify severity
/// against `now`.
pub fn normalize(record: &RawEventRecord, now: DateTime<Utc>) -> NormalizedEvent {
    let severity = classify(record, now);

    let detail = match record {
        RawEventRecord::Quake(q) => EventDetail::Quake {
            epicenter: translate(&q.epicenter_raw),
            magnitude: q.magnitude,
            intensity: intensity_label(q.max_intensity_code).to_string(),
            depth_km: q.depth_km,
        },
        RawEventRecord::Tsunami(t) => EventDetail::Tsunami {
            worst_grade: worst_tsunami_grade(&t.areas),
            areas: t.areas.iter().map(|a| translate(&a.name_raw)).collect(),
        },
        RawEventRecord::Eew(e) => EventDetail::Eew {
            epicenter: translate(&e.epicenter_raw),
            issue_kind: e.issue_kind,
        },
    };

    NormalizedEvent {
        feed_type: record.feed_type(),
        occurred_at: record.occurred_at(),
        severity,
        cancelled: record.cancelled(),
        detail,
    }
}

//! Severity classification for feed events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{EewIssueKind, RawEventRecord, TsunamiArea, TsunamiGrade};

/// Freshness window in seconds. An event older than this is treated as
/// inactive regardless of its raw severity fields, so a missed cancellation
/// cannot leave an emergency latched forever.
pub const STALENESS_SECS: i64 = 180;

/// Ranked severity of a normalized event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum SeverityLevel {
    /// No active hazard (including stale and cancelled events).
    #[default]
    None,
    /// Minor activity worth showing, no alert.
    Watch,
    /// Noticeable event, standard alert.
    Alert,
    /// Warning-grade advisory.
    Warning,
    /// Strong shaking observed (JMA 5-weak and above).
    Major,
    /// Earthquake early warning in effect.
    Emergency,
}

/// Audio class requested when an alert fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertClass {
    /// Slower, fewer repetitions.
    Standard,
    /// Short rapid high-pitch repetitions over a low sustained tone.
    Emergency,
}

impl SeverityLevel {
    /// Audio class for this severity, or `None` when no audio should fire.
    pub fn alert_class(&self) -> Option<AlertClass> {
        match self {
            SeverityLevel::None => None,
            SeverityLevel::Major | SeverityLevel::Emergency => Some(AlertClass::Emergency),
            _ => Some(AlertClass::Standard),
        }
    }
}

/// JMA intensity code thresholds, highest first. Codes encode the scale
/// ordinal times ten, with 45/55 marking the "weak" sub-levels of 5 and 6.
const INTENSITY_TABLE: [(i32, &str); 9] = [
    (70, "7"),
    (60, "6+"),
    (55, "6-"),
    (50, "5+"),
    (45, "5-"),
    (40, "4"),
    (30, "3"),
    (20, "2"),
    (10, "1"),
];

/// Render an intensity code as the scale label shown on the dashboard.
/// Codes below the lowest threshold render as "0".
pub fn intensity_label(code: i32) -> &'static str {
    for (threshold, label) in INTENSITY_TABLE {
        if code >= threshold {
            return label;
        }
    }
    "0"
}

/// Reduce per-area tsunami grades to the single worst grade.
pub fn worst_tsunami_grade(areas: &[TsunamiArea]) -> TsunamiGrade {
    areas
        .iter()
        .map(|a| a.grade_raw)
        .max()
        .unwrap_or(TsunamiGrade::Unknown)
}

/// Classify a raw feed record against `now`.
///
/// Staleness applies to every feed type: an event whose `occurred_at` is
/// more than [`STALENESS_SECS`] in the past classifies as
/// [`SeverityLevel::None`] whatever its raw fields say.
pub fn classify(record: &RawEventRecord, now: DateTime<Utc>) -> SeverityLevel {
    if is_stale(record.occurred_at(), now) {
        return SeverityLevel::None;
    }

    match record {
        RawEventRecord::Eew(e) => {
            if e.cancelled {
                SeverityLevel::None
            } else {
                match e.issue_kind {
                    EewIssueKind::Warning => SeverityLevel::Emergency,
                    EewIssueKind::Forecast => SeverityLevel::Alert,
                }
            }
        }
        RawEventRecord::Quake(q) => {
            if q.max_intensity_code >= 45 {
                SeverityLevel::Major
            } else if q.max_intensity_code >= 30 {
                SeverityLevel::Alert
            } else if q.max_intensity_code >= 10 {
                SeverityLevel::Watch
            } else {
                SeverityLevel::None
            }
        }
        RawEventRecord::Tsunami(t) => {
            if t.cancelled {
                return SeverityLevel::None;
            }
            match worst_tsunami_grade(&t.areas) {
                TsunamiGrade::MajorWarning => SeverityLevel::Major,
                TsunamiGrade::Warning => SeverityLevel::Warning,
                TsunamiGrade::Watch => SeverityLevel::Watch,
                TsunamiGrade::Unknown => SeverityLevel::None,
            }
        }
    }
}

/// True when `occurred_at` is outside the freshness window relative to `now`.
pub fn is_stale(occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(occurred_at).num_seconds() > STALENESS_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EewEvent, QuakeEvent, TsunamiEvent};
    use chrono::{Duration, Utc};

    fn quake(intensity: i32, occurred_at: DateTime<Utc>) -> RawEventRecord {
        RawEventRecord::Quake(QuakeEvent {
            occurred_at,
            epicenter_raw: "宮城県沖".to_string(),
            magnitude: 5.0,
            max_intensity_code: intensity,
            depth_km: 40.0,
        })
    }

    fn eew(kind: EewIssueKind, cancelled: bool, occurred_at: DateTime<Utc>) -> RawEventRecord {
        RawEventRecord::Eew(EewEvent {
            occurred_at,
            epicenter_raw: "千葉県".to_string(),
            cancelled,
            issue_kind: kind,
        })
    }

    #[test]
    fn test_severity_ordering() {
        assert!(SeverityLevel::Emergency > SeverityLevel::Major);
        assert!(SeverityLevel::Major > SeverityLevel::Warning);
        assert!(SeverityLevel::Warning > SeverityLevel::Alert);
        assert!(SeverityLevel::Alert > SeverityLevel::Watch);
        assert!(SeverityLevel::Watch > SeverityLevel::None);
    }

    #[test]
    fn test_quake_thresholds() {
        let now = Utc::now();
        assert_eq!(classify(&quake(70, now), now), SeverityLevel::Major);
        assert_eq!(classify(&quake(45, now), now), SeverityLevel::Major);
        assert_eq!(classify(&quake(40, now), now), SeverityLevel::Alert);
        assert_eq!(classify(&quake(30, now), now), SeverityLevel::Alert);
        assert_eq!(classify(&quake(20, now), now), SeverityLevel::Watch);
        assert_eq!(classify(&quake(10, now), now), SeverityLevel::Watch);
        assert_eq!(classify(&quake(0, now), now), SeverityLevel::None);
    }

    #[test]
    fn test_eew_warning_is_emergency() {
        let now = Utc::now();
        assert_eq!(
            classify(&eew(EewIssueKind::Warning, false, now), now),
            SeverityLevel::Emergency
        );
        assert_eq!(
            classify(&eew(EewIssueKind::Forecast, false, now), now),
            SeverityLevel::Alert
        );
        assert_eq!(
            classify(&eew(EewIssueKind::Warning, true, now), now),
            SeverityLevel::None
        );
    }

    #[test]
    fn test_staleness_overrides_severity() {
        let now = Utc::now();
        let old = now - Duration::seconds(STALENESS_SECS + 1);
        assert_eq!(
            classify(&eew(EewIssueKind::Warning, false, old), now),
            SeverityLevel::None
        );
        assert_eq!(classify(&quake(70, old), now), SeverityLevel::None);
    }

    #[test]
    fn test_staleness_boundary_is_inclusive() {
        let now = Utc::now();
        let edge = now - Duration::seconds(STALENESS_SECS);
        assert_eq!(
            classify(&eew(EewIssueKind::Warning, false, edge), now),
            SeverityLevel::Emergency
        );
    }

    #[test]
    fn test_tsunami_worst_grade_wins() {
        let now = Utc::now();
        let record = RawEventRecord::Tsunami(TsunamiEvent {
            occurred_at: now,
            cancelled: false,
            areas: vec![
                TsunamiArea {
                    grade_raw: TsunamiGrade::Watch,
                    name_raw: "千葉県".to_string(),
                },
                TsunamiArea {
                    grade_raw: TsunamiGrade::MajorWarning,
                    name_raw: "宮城県".to_string(),
                },
            ],
        });
        assert_eq!(classify(&record, now), SeverityLevel::Major);
    }

    #[test]
    fn test_cancelled_tsunami_is_none() {
        let now = Utc::now();
        let record = RawEventRecord::Tsunami(TsunamiEvent {
            occurred_at: now,
            cancelled: true,
            areas: vec![TsunamiArea {
                grade_raw: TsunamiGrade::MajorWarning,
                name_raw: "宮城県".to_string(),
            }],
        });
        assert_eq!(classify(&record, now), SeverityLevel::None);
    }

    #[test]
    fn test_intensity_labels() {
        assert_eq!(intensity_label(45), "5-");
        assert_eq!(intensity_label(50), "5+");
        assert_eq!(intensity_label(55), "6-");
        assert_eq!(intensity_label(60), "6+");
        assert_eq!(intensity_label(70), "7");
        assert_eq!(intensity_label(10), "1");
        assert_eq!(intensity_label(5), "0");
    }

    #[test]
    fn test_alert_class_mapping() {
        assert_eq!(SeverityLevel::None.alert_class(), None);
        assert_eq!(
            SeverityLevel::Watch.alert_class(),
            Some(AlertClass::Standard)
        );
        assert_eq!(
            SeverityLevel::Major.alert_class(),
            Some(AlertClass::Emergency)
        );
        assert_eq!(
            SeverityLevel::Emergency.alert_class(),
            Some(AlertClass::Emergency)
        );
    }
}

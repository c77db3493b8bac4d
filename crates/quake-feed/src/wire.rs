//! Wire-format structures for the aggregator's history responses.
//!
//! Each feed returns a JSON array of history entries, newest first. The
//! structs here mirror that shape loosely enough to survive missing optional
//! fields; anything that does not deserialize cleanly is a [`FeedError`],
//! never a force-cast.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use hazard_core::{
    EewEvent, EewIssueKind, QuakeEvent, RawEventRecord, TsunamiArea, TsunamiEvent, TsunamiGrade,
};

use crate::error::FeedError;

/// Feed timestamps are local-time strings in the source timezone (UTC+9).
const FEED_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Magnitude sentinel used by the feed when no magnitude was determined.
const MAGNITUDE_UNKNOWN: f64 = -1.0;

#[derive(Debug, Deserialize)]
pub struct QuakeEntry {
    pub time: String,
    #[serde(default)]
    pub earthquake: Option<QuakeBody>,
}

#[derive(Debug, Deserialize)]
pub struct QuakeBody {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub hypocenter: Option<Hypocenter>,
    #[serde(rename = "maxScale", default)]
    pub max_scale: i32,
}

#[derive(Debug, Deserialize)]
pub struct Hypocenter {
    #[serde(default)]
    pub name: String,
    #[serde(default = "magnitude_unknown")]
    pub magnitude: f64,
    #[serde(default)]
    pub depth: f64,
}

fn magnitude_unknown() -> f64 {
    MAGNITUDE_UNKNOWN
}

#[derive(Debug, Deserialize)]
pub struct TsunamiEntry {
    pub time: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub areas: Vec<TsunamiAreaEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TsunamiAreaEntry {
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct EewEntry {
    pub time: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub issue: Option<EewIssue>,
    #[serde(default)]
    pub earthquake: Option<EewBody>,
}

#[derive(Debug, Deserialize)]
pub struct EewIssue {
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct EewBody {
    #[serde(default)]
    pub hypocenter: Option<Hypocenter>,
}

/// Parse a feed timestamp string into UTC.
fn parse_time(raw: &str) -> Result<DateTime<Utc>, FeedError> {
    let offset = chrono::FixedOffset::east_opt(FEED_UTC_OFFSET_SECS)
        .ok_or_else(|| FeedError::BadTimestamp(raw.to_string()))?;

    // Entries carry millisecond precision; some older ones do not.
    let naive = NaiveDateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S%.3f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S"))
        .map_err(|_| FeedError::BadTimestamp(raw.to_string()))?;

    match offset.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        _ => Err(FeedError::BadTimestamp(raw.to_string())),
    }
}

fn parse_grade(raw: &str) -> TsunamiGrade {
    match raw {
        "MajorWarning" => TsunamiGrade::MajorWarning,
        "Warning" => TsunamiGrade::Warning,
        "Watch" => TsunamiGrade::Watch,
        _ => TsunamiGrade::Unknown,
    }
}

fn parse_issue_kind(raw: &str) -> EewIssueKind {
    // The feed only distinguishes forecast-grade notices explicitly;
    // everything else on this channel is a warning.
    if raw.eq_ignore_ascii_case("forecast") {
        EewIssueKind::Forecast
    } else {
        EewIssueKind::Warning
    }
}

/// Parse a quake history response, using entry 0 (most recent) only.
pub fn parse_quake(body: &str) -> Result<RawEventRecord, FeedError> {
    let entries: Vec<QuakeEntry> = serde_json::from_str(body)?;
    let entry = entries.into_iter().next().ok_or(FeedError::Empty)?;

    let quake = entry.earthquake;
    let occurred_raw = quake
        .as_ref()
        .and_then(|b| b.time.clone())
        .unwrap_or(entry.time);
    let occurred_at = parse_time(&occurred_raw)?;

    let (name, magnitude, depth) = quake
        .as_ref()
        .and_then(|b| b.hypocenter.as_ref())
        .map(|h| (h.name.clone(), h.magnitude, h.depth))
        .unwrap_or_else(|| (String::new(), MAGNITUDE_UNKNOWN, 0.0));

    Ok(RawEventRecord::Quake(QuakeEvent {
        occurred_at,
        epicenter_raw: name,
        magnitude,
        max_intensity_code: quake.map(|b| b.max_scale).unwrap_or(0),
        depth_km: depth,
    }))
}

/// Parse a tsunami history response, using entry 0 (most recent) only.
pub fn parse_tsunami(body: &str) -> Result<RawEventRecord, FeedError> {
    let entries: Vec<TsunamiEntry> = serde_json::from_str(body)?;
    let entry = entries.into_iter().next().ok_or(FeedError::Empty)?;

    let occurred_at = parse_time(&entry.time)?;
    let areas = entry
        .areas
        .into_iter()
        .map(|a| TsunamiArea {
            grade_raw: parse_grade(&a.grade),
            name_raw: a.name,
        })
        .collect();

    Ok(RawEventRecord::Tsunami(TsunamiEvent {
        occurred_at,
        cancelled: entry.cancelled,
        areas,
    }))
}

/// Parse an EEW history response, using entry 0 (most recent) only.
pub fn parse_eew(body: &str) -> Result<RawEventRecord, FeedError> {
    let entries: Vec<EewEntry> = serde_json::from_str(body)?;
    let entry = entries.into_iter().next().ok_or(FeedError::Empty)?;

    let occurred_at = parse_time(&entry.time)?;
    let epicenter_raw = entry
        .earthquake
        .and_then(|b| b.hypocenter)
        .map(|h| h.name)
        .unwrap_or_default();
    let issue_kind = entry
        .issue
        .map(|i| parse_issue_kind(&i.kind))
        .unwrap_or(EewIssueKind::Warning);

    Ok(RawEventRecord::Eew(EewEvent {
        occurred_at,
        epicenter_raw,
        cancelled: entry.cancelled,
        issue_kind,
    }))
}

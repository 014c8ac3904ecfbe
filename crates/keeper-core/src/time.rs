//! UTC timestamp helpers.
//!
//! Registry stamps are ISO-8601 with a literal `Z` suffix (never `+00:00`),
//! fractional seconds to microsecond precision.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Render an instant as an ISO-8601 UTC stamp ending in `Z`.
pub fn format_stamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The current instant as a registry stamp.
pub fn now_stamp() -> String {
    format_stamp(Utc::now())
}

/// Parse a registry stamp.
///
/// Accepts RFC 3339 with `Z` or an explicit offset, and falls back to a
/// naive `YYYY-MM-DDTHH:MM:SS[.f]` interpreted as UTC. Returns `None` for
/// anything else.
pub fn parse_stamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Short human form used in hook output: `2026-02-01 14:03:22 UTC`.
pub fn display_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Filesystem modification instant of `path`, or `None` if it cannot be read.
pub fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let meta = std::fs::metadata(path).ok()?;
    meta.modified().ok().map(DateTime::<Utc>::from)
}

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses the `Timestamp` column of an activity log.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Attempt to parse `s` into a UTC [`DateTime`].
    ///
    /// Handles RFC 3339 (including `Z`-suffix), RFC 2822 and a handful of
    /// naive date-time patterns, which are taken to be UTC. Returns `None`
    /// for empty or unrecognised input.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc));
        }

        // Offset without colon, e.g. "2024-01-15T10:00:00+0100".
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(dt.with_timezone(&Utc));
        }

        const FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%d",
            "%d/%m/%Y %H:%M:%S",
            "%m/%d/%Y %H:%M:%S",
        ];

        for fmt in FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
                let naive = date.and_hms_opt(0, 0, 0)?;
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        None
    }
}

// ── DurationParser ────────────────────────────────────────────────────────────

const MILLIS_PER_SECOND: f64 = 1_000.0;
const MILLIS_PER_MINUTE: f64 = 60.0 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: f64 = 60.0 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: f64 = 24.0 * MILLIS_PER_HOUR;
const MILLIS_PER_WEEK: f64 = 7.0 * MILLIS_PER_DAY;

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^P(?:(?P<w>\d+(?:[.,]\d+)?)W)?(?:(?P<d>\d+(?:[.,]\d+)?)D)?(?:T(?:(?P<h>\d+(?:[.,]\d+)?)H)?(?:(?P<m>\d+(?:[.,]\d+)?)M)?(?:(?P<s>\d+(?:[.,]\d+)?)S)?)?$",
        )
        .expect("regex is valid")
    })
}

/// Parses ISO-8601 elapsed-time strings such as `PT1H30M` or `P1DT2H`.
pub struct DurationParser;

impl DurationParser {
    /// Parse `s` into a [`chrono::Duration`] with millisecond precision.
    ///
    /// Accepts week, day, hour, minute and second components, each with an
    /// optional decimal fraction. Years and months are rejected because they
    /// have no fixed length, as are negative, empty and out-of-range
    /// (above `i64::MAX` milliseconds) durations.
    ///
    /// The error is a human-readable reason; callers attach the location.
    pub fn parse(s: &str) -> Result<chrono::Duration, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty duration".to_string());
        }
        if s.starts_with('-') {
            return Err("negative durations are not allowed".to_string());
        }
        if !s.starts_with('P') {
            return Err("missing 'P' designator".to_string());
        }

        let date_part = s.split('T').next().unwrap_or_default();
        if date_part.contains('Y') || date_part.contains('M') {
            return Err("years and months have no fixed length".to_string());
        }

        let caps = duration_regex()
            .captures(s)
            .ok_or_else(|| "not an ISO-8601 duration".to_string())?;

        let units = [
            ("w", MILLIS_PER_WEEK),
            ("d", MILLIS_PER_DAY),
            ("h", MILLIS_PER_HOUR),
            ("m", MILLIS_PER_MINUTE),
            ("s", MILLIS_PER_SECOND),
        ];

        let mut millis = 0.0;
        let mut components = 0;
        for (name, unit) in units {
            if let Some(m) = caps.name(name) {
                let value: f64 = m
                    .as_str()
                    .replace(',', ".")
                    .parse()
                    .map_err(|_| format!("invalid number {:?}", m.as_str()))?;
                millis += value * unit;
                components += 1;
            }
        }

        if components == 0 {
            return Err("duration has no components".to_string());
        }

        let millis = millis.round();
        if !millis.is_finite() || millis >= i64::MAX as f64 {
            return Err("duration exceeds the representable range".to_string());
        }
        chrono::Duration::try_milliseconds(millis as i64)
            .ok_or_else(|| "duration exceeds the representable range".to_string())
    }
}

// ── Hours ─────────────────────────────────────────────────────────────────────

/// Convert a total of milliseconds into hours rounded to two decimals.
///
/// Rounding is half-to-even and computed on integers, so `0.125 h`
/// (450 000 ms) becomes `0.12` and `0.135 h` becomes `0.14`.
pub fn round_hours(total_millis: i64) -> f64 {
    // One hundredth of an hour is 36 000 ms.
    const CENTI_HOUR: i64 = 36_000;
    let negative = total_millis < 0;
    let abs = total_millis.unsigned_abs() as i64;
    let mut centi = abs / CENTI_HOUR;
    let rem = abs % CENTI_HOUR;
    if rem * 2 > CENTI_HOUR || (rem * 2 == CENTI_HOUR && centi % 2 == 1) {
        centi += 1;
    }
    let hours = centi as f64 / 100.0;
    if negative {
        -hours
    } else {
        hours
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

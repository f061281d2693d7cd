//! Wall-clock time model.
//!
//! # Design
//!
//! Every instant is a `DateTime<Utc>`.  Durations inside the projector are
//! carried as fractional minutes (`f64`) measured from the driver's
//! observation time and only converted to a timestamp when a projection is
//! emitted:
//!
//!   projected_arrival = observed_at + elapsed_minutes
//!
//! Keeping the running total in minutes means per-leg rounding to the
//! timestamp resolution never accumulates along a long route.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::{EtaError, EtaResult};

/// An absolute instant in UTC.
pub type Timestamp = DateTime<Utc>;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Naive layouts accepted when the input carries no offset.  Interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp (`Z` or numeric offset) or a naive ISO-8601
/// date-time, which is taken to be UTC.
pub fn parse_timestamp(s: &str) -> EtaResult<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EtaError::Parse(format!("invalid timestamp {s:?}")))
}

/// `t + minutes`, rounded to the microsecond.
///
/// Saturates at the representable range instead of panicking; a NaN offset
/// leaves `t` unchanged.
pub fn add_minutes(t: Timestamp, minutes: f64) -> Timestamp {
    let micros = (minutes * MICROS_PER_MINUTE).round() as i64;
    t.checked_add_signed(TimeDelta::microseconds(micros))
        .unwrap_or(if micros > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}

/// Signed minutes from `earlier` to `later` (negative if `later` is before).
pub fn minutes_between(later: Timestamp, earlier: Timestamp) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(us) => us as f64 / MICROS_PER_MINUTE,
        None => delta.num_milliseconds() as f64 / 60_000.0,
    }
}

/// Compact `YYYYMMDD_HHMMSS` stamp for output file names.
pub fn file_stamp(t: Timestamp) -> String {
    t.format("%Y%m%d_%H%M%S").to_string()
}

// Timestamp parsing and fixed-timezone display formatting
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use super::observation::DataFormatError;

/// Display format for point labels, e.g. "Jun 1, 2024, 8:00:00 AM".
const LABEL_FORMAT: &str = "%b %-d, %Y, %-I:%M:%S %p";

/// Parse an ISO-ish timestamp as a UTC instant.
///
/// Accepts RFC 3339 strings as well as naive `YYYY-MM-DDTHH:MM:SS` variants
/// (fractional seconds dropped, `T` or space separator), which are taken to
/// already be UTC.
pub fn parse_utc(ts: &str) -> Result<DateTime<Utc>, DataFormatError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(ts) {
        return Ok(instant.with_timezone(&Utc));
    }
    let trimmed = ts.split_once('.').map_or(ts, |(head, _)| head);
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(DataFormatError::BadTimestamp(ts.to_string()))
}

/// Renders UTC instants in a fixed IANA timezone. The conversion goes
/// through the zone database, so output never depends on the host's local
/// timezone and stays correct across DST transitions.
#[derive(Debug, Clone, Copy)]
pub struct TimestampFormatter {
    zone: Tz,
}

impl TimestampFormatter {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.zone)
            .format(LABEL_FORMAT)
            .to_string()
    }
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

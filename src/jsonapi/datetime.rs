//! Wire format for date/time values.
//!
//! The API expects ISO-8601 timestamps with an explicit offset and
//! microsecond precision; UTC is written with a `Z` suffix.

use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, TimeZone};

/// Formats a timestamp the way the API expects it on the wire.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use placements_io::jsonapi::datetime::to_wire;
///
/// let ts = Utc.with_ymd_and_hms(2024, 12, 1, 13, 0, 0).unwrap();
/// assert_eq!(to_wire(&ts), "2024-12-01T13:00:00.000000Z");
/// ```
#[must_use]
pub fn to_wire<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};

    #[test]
    fn test_utc_uses_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        assert_eq!(to_wire(&ts), "2024-01-31T23:59:59.000000Z");
    }

    #[test]
    fn test_offset_is_explicit() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = eastern.with_ymd_and_hms(2024, 12, 1, 13, 0, 0).unwrap();
        assert_eq!(to_wire(&ts), "2024-12-01T13:00:00.000000-05:00");
    }

    #[test]
    fn test_microseconds_are_kept() {
        let naive = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_micro_opt(8, 30, 0, 123_456)
            .unwrap();
        let ts = Utc.from_utc_datetime(&naive);
        assert_eq!(to_wire(&ts), "2024-06-15T08:30:00.123456Z");
    }
}

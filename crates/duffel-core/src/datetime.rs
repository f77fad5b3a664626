//! Timezone-aware datetime formatting
//!
//! ISO-8601 / RFC-3339 rendering helpers on top of chrono. Naive
//! datetimes carry no offset; these helpers pin them to UTC so the
//! rendered form is unambiguous.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Returns an ISO-8601 representation of a timezone-aware datetime
///
/// Subsecond digits are included only when present; a UTC offset is
/// rendered as `Z`.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use duffel_core::datetime::to_iso8601;
///
/// let dt = Utc.with_ymd_and_hms(2014, 10, 1, 23, 21, 33).unwrap();
/// assert_eq!(to_iso8601(&dt), "2014-10-01T23:21:33Z");
/// ```
pub fn to_iso8601<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Returns an ISO-8601 representation of a naive datetime, assumed UTC
pub fn naive_to_iso8601(dt: &NaiveDateTime) -> String {
    to_iso8601(&Utc.from_utc_datetime(dt))
}

/// RFC-3339 is a profile of ISO-8601; alias of [`to_iso8601`]
pub fn to_rfc3339<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    to_iso8601(dt)
}

/// RFC-3339 alias of [`naive_to_iso8601`]
pub fn naive_to_rfc3339(dt: &NaiveDateTime) -> String {
    naive_to_iso8601(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_utc_without_subseconds() {
        let dt = Utc.with_ymd_and_hms(2014, 10, 1, 23, 21, 33).unwrap();
        assert_eq!(to_iso8601(&dt), "2014-10-01T23:21:33Z");
    }

    #[test]
    fn test_fixed_offset_keeps_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = tz.with_ymd_and_hms(2014, 5, 29, 20, 22, 17).unwrap();
        assert_eq!(to_iso8601(&dt), "2014-05-29T20:22:17+02:00");
    }

    #[test]
    fn test_naive_is_assumed_utc() {
        let dt = NaiveDate::from_ymd_opt(2014, 10, 1)
            .unwrap()
            .and_hms_micro_opt(23, 21, 33, 718_508)
            .unwrap();
        assert_eq!(naive_to_iso8601(&dt), "2014-10-01T23:21:33.718508Z");
    }

    #[test]
    fn test_rfc3339_aliases() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_rfc3339(&dt), to_iso8601(&dt));

        let naive = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(naive_to_rfc3339(&naive), "2020-01-02T03:04:05Z");
    }
}

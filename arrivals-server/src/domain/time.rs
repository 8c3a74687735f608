//! Feed time handling.
//!
//! The arrivals feed reports times in station-local wall-clock time with no
//! offset, either as a full `YYYY-MM-DDTHH:MM:SS` or as a bare `HH:MM:SS`.
//! Both are resolved into the configured time zone before any arithmetic,
//! so the arrival and "now" are always compared as instants in one zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Error returned when a feed time cannot be parsed or resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A bare time more than this many hours from "now" is taken to be on the
/// neighbouring calendar day.
const ROLLOVER_HOURS: i64 = 12;

/// A wall-clock time as written in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTime {
    /// Time of day only; the date is implied by when the feed was read.
    TimeOfDay(NaiveTime),
    /// Full local date and time.
    Local(NaiveDateTime),
}

impl FeedTime {
    /// Parse a feed timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrivals_server::domain::FeedTime;
    ///
    /// assert!(matches!(
    ///     FeedTime::parse("2024-03-15T14:03:00"),
    ///     Ok(FeedTime::Local(_))
    /// ));
    /// assert!(matches!(FeedTime::parse("14:03:00"), Ok(FeedTime::TimeOfDay(_))));
    /// assert!(FeedTime::parse("soon").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeError::new("empty timestamp"));
        }

        if s.contains('T') {
            return NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(FeedTime::Local)
                .map_err(|_| TimeError::new("expected YYYY-MM-DDTHH:MM:SS"));
        }

        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .map(FeedTime::TimeOfDay)
            .map_err(|_| TimeError::new("expected HH:MM:SS"))
    }

    /// Resolve to an instant in `now`'s time zone.
    ///
    /// A bare time of day is placed on `now`'s local calendar day, then moved
    /// to the previous or next day if that leaves it more than twelve hours
    /// away from `now`. This keeps a 00:02 arrival read at 23:58 two minutes
    /// in the future rather than a day in the past.
    pub fn resolve(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, TimeError> {
        let tz = now.timezone();
        match *self {
            FeedTime::Local(naive) => localize(&tz, naive),
            FeedTime::TimeOfDay(time) => {
                let today = now.date_naive();
                let candidate = localize(&tz, today.and_time(time))?;
                let delta = candidate.signed_duration_since(*now);
                let threshold = Duration::hours(ROLLOVER_HOURS);

                if delta < -threshold {
                    localize(&tz, shift_day(today, 1)?.and_time(time))
                } else if delta > threshold {
                    localize(&tz, shift_day(today, -1)?.and_time(time))
                } else {
                    Ok(candidate)
                }
            }
        }
    }
}

/// Whole minutes from `now` until `arrival`, rounded down.
///
/// Arrivals in the past count as due (zero) rather than negative.
pub fn minutes_until(arrival: &DateTime<Tz>, now: &DateTime<Tz>) -> u32 {
    let secs = arrival.signed_duration_since(*now).num_seconds();
    if secs <= 0 {
        return 0;
    }
    u32::try_from(secs / 60).unwrap_or(u32::MAX)
}

fn localize(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, TimeError> {
    // Ambiguous times (DST fall-back) take the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| TimeError::new("local time does not exist in time zone"))
}

fn shift_day(date: NaiveDate, days: i64) -> Result<NaiveDate, TimeError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| TimeError::new("date out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::America::Chicago;

    fn chicago(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn minutes(arr_t: &str, now: DateTime<Tz>) -> u32 {
        let arrival = FeedTime::parse(arr_t).unwrap().resolve(&now).unwrap();
        minutes_until(&arrival, &now)
    }

    #[test]
    fn parse_full_datetime() {
        let parsed = FeedTime::parse("2024-03-15T14:03:30").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 3, 30)
            .unwrap();
        assert_eq!(parsed, FeedTime::Local(expected));
    }

    #[test]
    fn parse_time_of_day() {
        let parsed = FeedTime::parse("07:45:00").unwrap();
        assert_eq!(
            parsed,
            FeedTime::TimeOfDay(NaiveTime::from_hms_opt(7, 45, 0).unwrap())
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(FeedTime::parse("").is_err());
        assert!(FeedTime::parse("   ").is_err());
        assert!(FeedTime::parse("25:00:00").is_err());
        assert!(FeedTime::parse("2024-13-01T00:00:00").is_err());
        assert!(FeedTime::parse("2024-03-15T14:03").is_err());
        assert!(FeedTime::parse("Due").is_err());
    }

    #[test]
    fn whole_minutes_rounded_down() {
        let now = chicago(2024, 3, 15, 14, 0, 0);
        assert_eq!(minutes("2024-03-15T14:03:59", now), 3);
        assert_eq!(minutes("2024-03-15T14:11:00", now), 11);
        assert_eq!(minutes("2024-03-15T14:00:59", now), 0);
    }

    #[test]
    fn past_arrivals_are_due() {
        let now = chicago(2024, 3, 15, 14, 0, 0);
        assert_eq!(minutes("2024-03-15T13:58:00", now), 0);
        assert_eq!(minutes("13:59:30", now), 0);
    }

    #[test]
    fn utc_now_is_converted_before_diffing() {
        // 19:00 UTC is 14:00 CDT on this date
        let now = Utc
            .with_ymd_and_hms(2024, 3, 15, 19, 0, 0)
            .unwrap()
            .with_timezone(&Chicago);
        assert_eq!(minutes("2024-03-15T14:05:00", now), 5);
        assert_eq!(minutes("14:05:00", now), 5);
    }

    #[test]
    fn bare_time_rolls_forward_past_midnight() {
        let now = chicago(2024, 3, 15, 23, 58, 0);
        assert_eq!(minutes("00:02:00", now), 4);
    }

    #[test]
    fn bare_time_rolls_back_before_midnight() {
        let now = chicago(2024, 3, 16, 0, 1, 0);
        let arrival = FeedTime::parse("23:59:00").unwrap().resolve(&now).unwrap();
        assert_eq!(arrival, chicago(2024, 3, 15, 23, 59, 0));
        assert_eq!(minutes_until(&arrival, &now), 0);
    }

    #[test]
    fn full_datetime_across_midnight() {
        let now = chicago(2024, 3, 15, 23, 58, 0);
        assert_eq!(minutes("2024-03-16T00:09:00", now), 11);
    }

    #[test]
    fn nonexistent_local_time_is_an_error() {
        // Clocks jump from 02:00 to 03:00 on 2024-03-10 in Chicago
        let now = chicago(2024, 3, 10, 1, 50, 0);
        let result = FeedTime::parse("2024-03-10T02:30:00")
            .unwrap()
            .resolve(&now);
        assert!(result.is_err());
    }
}

//! Calendar and clock helpers: day boundaries, week identifiers and
//! duration formatting.
//!
//! Everything here is a pure function of a `DateTime<Tz>`. The time zone
//! travels with the instant, so day ends and January 1st are resolved with
//! the offset in effect on that day rather than the offset of "now".

use super::constants::DAY_MS;
use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, ParseError, TimeZone, Timelike, Utc,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Source of "now" for the engine.
pub trait Clock {
    /// Zone used for calendar days and week identifiers.
    type Zone: TimeZone;

    fn now(&self) -> DateTime<Self::Zone>;

    /// Current time as epoch milliseconds.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Zone = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven clock. Clones share the same instant, so a test can keep
/// a handle while a [`Session`](super::session::Session) owns another.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone = FixedOffset> {
    instant: Rc<RefCell<DateTime<Tz>>>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(instant: DateTime<Tz>) -> Self {
        Self {
            instant: Rc::new(RefCell::new(instant)),
        }
    }

    pub fn set(&self, instant: DateTime<Tz>) {
        *self.instant.borrow_mut() = instant;
    }

    pub fn advance_ms(&self, ms: i64) {
        let next = self.instant.borrow().clone() + chrono::Duration::milliseconds(ms);
        self.set(next);
    }
}

impl FixedClock {
    /// Builds a clock from an RFC 3339 timestamp such as
    /// `2026-10-18T09:30:00+02:00`.
    pub fn parse(rfc3339: &str) -> Result<Self, ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Zone = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.instant.borrow().clone()
    }
}

/// Local calendar date of `now`.
pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.date_naive()
}

/// Epoch milliseconds of 23:59:59.999 on the local day of `now`.
///
/// On a day when clocks go back the later of the two 23:59:59.999 instants
/// is used.
pub fn end_of_today<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let end = now
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|local| now.timezone().from_local_datetime(&local).latest());
    match end {
        Some(end) => end.timestamp_millis(),
        // 23:59:59.999 skipped by a zone transition: fall back to now's offset
        None => {
            let since_midnight_ms = i64::from(now.num_seconds_from_midnight()) * 1000
                + i64::from(now.timestamp_subsec_millis().min(999));
            now.timestamp_millis() - since_midnight_ms + DAY_MS - 1
        }
    }
}

/// Week identifier used to key boss progress, e.g. `2026-W42`.
///
/// This is not ISO-8601. The year is taken from UTC while the day count
/// runs from local midnight on January 1st (with January's own offset), and
/// the fractional day count means the number rolls over just after Saturday
/// midnight rather than on Monday. Saved progress is keyed by these strings,
/// so the arithmetic must stay as is.
pub fn current_week<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    let year = now.with_timezone(&Utc).year();

    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|jan1| jan1.and_hms_opt(0, 0, 0))
        .and_then(|midnight| {
            let start = now.timezone().from_local_datetime(&midnight).earliest()?;
            Some((start.timestamp_millis(), midnight.weekday().num_days_from_sunday()))
        });
    let (jan1_ms, jan1_weekday) = jan1.unwrap_or((now.timestamp_millis(), 0));

    let days = (now.timestamp_millis() - jan1_ms) as f64 / DAY_MS as f64;
    let week = ((days + f64::from(jan1_weekday) + 1.0) / 7.0).ceil() as i64;
    format!("{}-W{}", year, week)
}

/// Formats a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_elapsed(ms: i64) -> String {
    let s = ms.max(0) / 1000;
    let m = s / 60;
    let h = m / 60;
    format!("{:02}:{:02}:{:02}", h, m % 60, s % 60)
}

/// Formats the remaining time bank as `<h>h <m>m`.
pub fn format_time_bank(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    format!("{}h {}m", hours, minutes)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_today_uses_local_date() {
        // 23:30 local on the 18th is already the 19th in UTC
        let now = at("2026-10-18T23:30:00-02:00");
        assert_eq!(today(&now), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_end_of_today_is_last_millisecond() {
        let now = at("2026-10-18T09:15:42.250+02:00");
        let end = end_of_today(&now);
        let expected = at("2026-10-18T23:59:59.999+02:00").timestamp_millis();
        assert_eq!(end, expected);
    }

    #[test]
    fn test_end_of_today_at_midnight() {
        let now = at("2026-10-18T00:00:00+00:00");
        assert_eq!(end_of_today(&now), now.timestamp_millis() + DAY_MS - 1);
    }

    #[test]
    fn test_current_week_stable_within_week() {
        // 2026-01-01 is a Thursday (weekday 4 from Sunday)
        let sunday = current_week(&at("2026-10-18T12:00:00+00:00"));
        let wednesday = current_week(&at("2026-10-21T12:00:00+00:00"));
        let friday = current_week(&at("2026-10-23T23:00:00+00:00"));
        assert_eq!(sunday, wednesday);
        assert_eq!(sunday, friday);
        assert_eq!(sunday, "2026-W43");
    }

    #[test]
    fn test_current_week_rolls_just_after_saturday_midnight() {
        // Non-ISO quirk: Saturday 00:00:00.000 still belongs to the old week,
        // one millisecond later it is the next one.
        let saturday_midnight = at("2026-10-24T00:00:00+00:00");
        let just_after = at("2026-10-24T00:00:00.001+00:00");
        assert_eq!(current_week(&saturday_midnight), "2026-W43");
        assert_eq!(current_week(&just_after), "2026-W44");
    }

    #[test]
    fn test_current_week_first_day_of_year() {
        assert_eq!(current_week(&at("2026-01-01T00:00:00+00:00")), "2026-W1");
        assert_eq!(current_week(&at("2026-01-01T10:00:00+00:00")), "2026-W1");
    }

    #[test]
    fn test_current_week_uses_utc_year() {
        // Local New Year's morning east of UTC is still last year in UTC,
        // so the identifier carries the old year and a large week number.
        let week = current_week(&at("2026-01-01T01:00:00+02:00"));
        assert!(week.starts_with("2025-W"), "got {}", week);
    }

    #[test]
    fn test_week_number_not_zero_padded() {
        assert_eq!(current_week(&at("2026-01-05T12:00:00+00:00")), "2026-W2");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(61_000), "00:01:01");
        assert_eq!(format_elapsed(3_723_999), "01:02:03");
        assert_eq!(format_elapsed(90_000_000), "25:00:00");
        assert_eq!(format_elapsed(-5), "00:00:00");
    }

    #[test]
    fn test_format_time_bank() {
        assert_eq!(format_time_bank(DAY_MS as u64), "24h 0m");
        assert_eq!(format_time_bank(5_400_000), "1h 30m");
        assert_eq!(format_time_bank(59_999), "0h 0m");
    }

    #[test]
    fn test_end_of_today_on_day_clocks_go_back() {
        use super::test_zone::berlin;
        // 2026-10-25 has 25 hours; the day ends at 23:59:59.999 +01:00
        let accepted = berlin(2026, 10, 25, 1, 0);
        assert_eq!(accepted.offset().local_minus_utc(), 7200);
        let expected = at("2026-10-25T23:59:59.999+01:00").timestamp_millis();
        assert_eq!(end_of_today(&accepted), expected);
    }

    #[test]
    fn test_end_of_today_on_day_clocks_go_forward() {
        use super::test_zone::berlin;
        let accepted = berlin(2026, 3, 29, 0, 30);
        assert_eq!(accepted.offset().local_minus_utc(), 3600);
        let expected = at("2026-03-29T23:59:59.999+02:00").timestamp_millis();
        assert_eq!(end_of_today(&accepted), expected);
    }

    #[test]
    fn test_current_week_counts_from_january_offset_in_summer() {
        use super::test_zone::berlin;
        // January 1st midnight is +01:00 even though July runs at +02:00
        assert_eq!(current_week(&berlin(2026, 7, 4, 0, 30)), "2026-W27");
        assert_eq!(current_week(&berlin(2026, 7, 4, 1, 30)), "2026-W28");
    }

    #[test]
    fn test_fixed_clock_keeps_its_zone() {
        use super::test_zone::{berlin, Berlin2026};
        let clock = FixedClock::new(berlin(2026, 10, 24, 23, 0));
        clock.advance_ms(4 * 3_600_000);
        let now = clock.now();
        assert_eq!(now.timezone(), Berlin2026);
        // Four hours later the wall clock shows 02:00 for the second time
        assert_eq!((now.hour(), now.offset().local_minus_utc()), (2, 3600));
    }

    #[test]
    fn test_fixed_clock_shared_between_clones() {
        let clock = FixedClock::parse("2026-10-18T09:00:00+02:00").unwrap();
        let handle = clock.clone();
        handle.advance_ms(1500);
        assert_eq!(
            clock.now_ms(),
            at("2026-10-18T09:00:01.500+02:00").timestamp_millis()
        );
    }
}

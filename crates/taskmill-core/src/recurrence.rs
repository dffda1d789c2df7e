use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::{RecurrenceFrequency, RecurrenceRule};

/// Decides whether a template's rule is due on `date`.
///
/// Pure and referentially transparent: no I/O, no clock access. The caller
/// supplies the template's `last_fired_at` so the already-fired-today guard
/// holds regardless of how many times the scheduler runs on the same day.
///
/// Evaluation order, short-circuiting:
/// 1. already fired on `date` -> false;
/// 2. outside the `[start_date, end_date]` window -> false;
/// 3. frequency-specific interval and anchor test.
///
/// An `interval` below 1 never fires.
pub fn should_fire(
    rule: &RecurrenceRule,
    last_fired_at: Option<DateTime<Utc>>,
    date: NaiveDate,
) -> bool {
    if let Some(fired_at) = last_fired_at {
        if fired_at.date_naive() == date {
            return false;
        }
    }

    if date < rule.start_date {
        return false;
    }
    if let Some(end) = rule.end_date {
        if date > end {
            return false;
        }
    }

    if rule.interval < 1 {
        return false;
    }
    let interval = i64::from(rule.interval);
    let days_since_start = (date - rule.start_date).num_days();

    match rule.frequency {
        RecurrenceFrequency::Daily => days_since_start % interval == 0,

        RecurrenceFrequency::Weekly => {
            if days_since_start % (interval * 7) != 0 {
                return false;
            }
            // The modulo above already anchors to a 7-day-aligned day from
            // start_date, so an unset day_of_week is implicitly satisfied.
            match rule.day_of_week {
                Some(dow) => weekday_index(date) == dow,
                None => true,
            }
        }

        RecurrenceFrequency::Monthly => {
            // Anchor test first. day_of_month takes priority; week_of_month
            // only applies when day_of_month is absent.
            if let Some(dom) = rule.day_of_month {
                if date.day() as i32 != dom {
                    return false;
                }
            } else if let (Some(week), Some(dow)) = (rule.week_of_month, rule.day_of_week) {
                if week_of_month(date) != week || weekday_index(date) != dow {
                    return false;
                }
            }
            months_between(rule.start_date, date) % rule.interval == 0
        }

        RecurrenceFrequency::Yearly => {
            if date.month() != rule.start_date.month() || date.day() != rule.start_date.day() {
                return false;
            }
            (date.year() - rule.start_date.year()) % rule.interval == 0
        }
    }
}

/// Weekday as Monday=0 through Sunday=6.
#[inline]
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_monday() as i32
}

/// 1-based week-of-month bucket: days 1-7 are week 1, 8-14 week 2, and so on.
#[inline]
pub fn week_of_month(date: NaiveDate) -> i32 {
    (date.day() as i32 - 1) / 7 + 1
}

/// Whole calendar months from `start` to `date`, ignoring the day component.
#[inline]
fn months_between(start: NaiveDate, date: NaiveDate) -> i32 {
    (date.year() - start.year()) * 12 + (date.month() as i32 - start.month() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(frequency: RecurrenceFrequency, interval: i32, start: NaiveDate) -> RecurrenceRule {
        RecurrenceRule {
            frequency,
            interval,
            start_date: start,
            end_date: None,
            day_of_week: None,
            day_of_month: None,
            week_of_month: None,
        }
    }

    #[test]
    fn daily_interval_one_fires_every_day() {
        // Scenario A
        let r = rule(RecurrenceFrequency::Daily, 1, date(2024, 1, 1));
        assert!(should_fire(&r, None, date(2024, 1, 5)));
    }

    #[rstest]
    #[case(date(2024, 1, 1), true)]
    #[case(date(2024, 1, 2), false)]
    #[case(date(2024, 1, 3), false)]
    #[case(date(2024, 1, 4), true)]
    #[case(date(2024, 1, 10), true)]
    #[case(date(2024, 1, 11), false)]
    fn daily_interval_three(#[case] candidate: NaiveDate, #[case] expected: bool) {
        let r = rule(RecurrenceFrequency::Daily, 3, date(2024, 1, 1));
        assert_eq!(should_fire(&r, None, candidate), expected);
    }

    #[test]
    fn no_fire_before_start_date() {
        let r = rule(RecurrenceFrequency::Daily, 1, date(2024, 6, 1));
        assert!(!should_fire(&r, None, date(2024, 5, 31)));
    }

    #[test]
    fn end_date_is_inclusive() {
        let mut r = rule(RecurrenceFrequency::Daily, 1, date(2024, 1, 1));
        r.end_date = Some(date(2024, 1, 10));
        assert!(should_fire(&r, None, date(2024, 1, 10)));
        assert!(!should_fire(&r, None, date(2024, 1, 11)));
    }

    #[test]
    fn zero_interval_never_fires() {
        let r = rule(RecurrenceFrequency::Daily, 0, date(2024, 1, 1));
        assert!(!should_fire(&r, None, date(2024, 1, 1)));
        assert!(!should_fire(&r, None, date(2024, 1, 2)));
    }

    #[rstest]
    #[case(date(2024, 1, 8), false)] // 1 week later: interval=2 needs 2-week spacing
    #[case(date(2024, 1, 15), true)] // 2 weeks later
    #[case(date(2024, 1, 16), false)] // aligned week, wrong weekday
    #[case(date(2024, 1, 29), true)]
    fn biweekly_monday(#[case] candidate: NaiveDate, #[case] expected: bool) {
        // Scenario B: 2024-01-01 is a Monday
        let mut r = rule(RecurrenceFrequency::Weekly, 2, date(2024, 1, 1));
        r.day_of_week = Some(0);
        assert_eq!(should_fire(&r, None, candidate), expected);
    }

    #[test]
    fn weekly_without_day_of_week_fires_on_aligned_days() {
        let r = rule(RecurrenceFrequency::Weekly, 1, date(2024, 1, 3));
        assert!(should_fire(&r, None, date(2024, 1, 10)));
        assert!(!should_fire(&r, None, date(2024, 1, 11)));
    }

    #[rstest]
    #[case(date(2024, 1, 31), true)]
    #[case(date(2024, 2, 29), false)] // Feb has no 31st, no rollover to month end
    #[case(date(2024, 3, 31), true)]
    #[case(date(2024, 4, 30), false)]
    fn monthly_day_31_skips_short_months(#[case] candidate: NaiveDate, #[case] expected: bool) {
        // Scenario C
        let mut r = rule(RecurrenceFrequency::Monthly, 1, date(2024, 1, 31));
        r.day_of_month = Some(31);
        assert_eq!(should_fire(&r, None, candidate), expected);
    }

    #[test]
    fn monthly_first_monday() {
        // Scenario D: 2024-02-05 is the first Monday of February 2024
        let mut r = rule(RecurrenceFrequency::Monthly, 1, date(2024, 1, 1));
        r.week_of_month = Some(1);
        r.day_of_week = Some(0);
        assert!(should_fire(&r, None, date(2024, 2, 5)));
        // Second Monday fails the week anchor
        assert!(!should_fire(&r, None, date(2024, 2, 12)));
        // First Tuesday fails the weekday anchor
        assert!(!should_fire(&r, None, date(2024, 2, 6)));
    }

    #[test]
    fn monthly_day_of_month_wins_over_week_of_month() {
        // Both anchors set: day_of_month must decide. 2024-02-05 is the first
        // Monday but not the 15th, so it must not fire.
        let mut r = rule(RecurrenceFrequency::Monthly, 1, date(2024, 1, 1));
        r.day_of_month = Some(15);
        r.week_of_month = Some(1);
        r.day_of_week = Some(0);
        assert!(!should_fire(&r, None, date(2024, 2, 5)));
        assert!(should_fire(&r, None, date(2024, 2, 15)));
    }

    #[test]
    fn monthly_without_anchor_fires_on_interval_boundary_any_day() {
        let r = rule(RecurrenceFrequency::Monthly, 2, date(2024, 1, 15));
        // January (month 0) and March (month 2) satisfy the interval; the day
        // is unconstrained when no anchor is set.
        assert!(should_fire(&r, None, date(2024, 3, 3)));
        assert!(!should_fire(&r, None, date(2024, 2, 3)));
    }

    #[test]
    fn monthly_interval_counts_calendar_months() {
        let mut r = rule(RecurrenceFrequency::Monthly, 3, date(2024, 1, 10));
        r.day_of_month = Some(10);
        assert!(should_fire(&r, None, date(2024, 4, 10)));
        assert!(!should_fire(&r, None, date(2024, 3, 10)));
        assert!(should_fire(&r, None, date(2025, 1, 10)));
    }

    #[test]
    fn yearly_fires_on_same_month_and_day() {
        let r = rule(RecurrenceFrequency::Yearly, 1, date(2024, 3, 15));
        assert!(should_fire(&r, None, date(2025, 3, 15)));
        assert!(!should_fire(&r, None, date(2025, 3, 16)));
        assert!(!should_fire(&r, None, date(2025, 4, 15)));
    }

    #[test]
    fn yearly_respects_interval() {
        let r = rule(RecurrenceFrequency::Yearly, 2, date(2024, 3, 15));
        assert!(!should_fire(&r, None, date(2025, 3, 15)));
        assert!(should_fire(&r, None, date(2026, 3, 15)));
    }

    #[test]
    fn yearly_leap_day_only_fires_in_leap_years() {
        let r = rule(RecurrenceFrequency::Yearly, 1, date(2024, 2, 29));
        // 2025-2027 have no Feb 29; nothing fires until 2028.
        assert!(should_fire(&r, None, date(2028, 2, 29)));
        assert!(!should_fire(&r, None, date(2025, 2, 28)));
        assert!(!should_fire(&r, None, date(2025, 3, 1)));
    }

    #[rstest]
    #[case(RecurrenceFrequency::Daily)]
    #[case(RecurrenceFrequency::Weekly)]
    #[case(RecurrenceFrequency::Monthly)]
    #[case(RecurrenceFrequency::Yearly)]
    fn already_fired_today_blocks_every_frequency(#[case] frequency: RecurrenceFrequency) {
        let start = date(2024, 1, 1);
        let r = rule(frequency, 1, start);
        let fired_at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        assert!(!should_fire(&r, Some(fired_at), date(2024, 1, 1)));
    }

    #[test]
    fn fired_yesterday_does_not_block_today() {
        let r = rule(RecurrenceFrequency::Daily, 1, date(2024, 1, 1));
        let fired_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert!(should_fire(&r, Some(fired_at), date(2024, 3, 2)));
    }

    #[test]
    fn week_of_month_buckets() {
        assert_eq!(week_of_month(date(2024, 2, 1)), 1);
        assert_eq!(week_of_month(date(2024, 2, 7)), 1);
        assert_eq!(week_of_month(date(2024, 2, 8)), 2);
        assert_eq!(week_of_month(date(2024, 2, 28)), 4);
        assert_eq!(week_of_month(date(2024, 2, 29)), 5);
    }

    #[test]
    fn weekday_index_is_monday_zero() {
        assert_eq!(weekday_index(date(2024, 1, 1)), 0); // Monday
        assert_eq!(weekday_index(date(2024, 1, 7)), 6); // Sunday
    }

    proptest! {
        /// Daily rules fire exactly on the dates where the whole-day distance
        /// from start is a multiple of the interval.
        #[test]
        fn daily_fires_iff_day_distance_divides(interval in 1i32..60, offset in 0i64..1000) {
            let start = date(2024, 1, 1);
            let r = rule(RecurrenceFrequency::Daily, interval, start);
            let candidate = start + chrono::Duration::days(offset);
            prop_assert_eq!(
                should_fire(&r, None, candidate),
                offset % i64::from(interval) == 0
            );
        }

        /// The already-fired-today guard wins over any frequency match.
        #[test]
        fn same_day_guard_always_blocks(interval in 1i32..30, offset in 0i64..365) {
            let start = date(2024, 1, 1);
            let r = rule(RecurrenceFrequency::Daily, interval, start);
            let candidate = start + chrono::Duration::days(offset);
            let fired_at = Utc
                .from_utc_datetime(&candidate.and_hms_opt(7, 30, 0).unwrap());
            prop_assert!(!should_fire(&r, Some(fired_at), candidate));
        }
    }
}

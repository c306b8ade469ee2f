//! Due-date classification against an injected "now".

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// True when `due` falls on a calendar day before `now`'s day. A due date on
/// the same day is never overdue, whatever the time of day.
pub fn is_overdue(due: NaiveDate, now: NaiveDateTime) -> bool {
    due < now.date()
}

pub fn is_due_today(due: NaiveDate, now: NaiveDateTime) -> bool {
    due == now.date()
}

/// Whole days until the start of `due`, rounded up. Negative for past dates.
pub fn days_until_due(due: NaiveDate, now: NaiveDateTime) -> i64 {
    let millis = (due.and_time(NaiveTime::MIN) - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Presentation label such as `1 day` or `3 days`.
pub fn days_label(days: i64) -> String {
    if days == 1 || days == -1 {
        format!("{days} day")
    } else {
        format!("{days} days")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Overdue,
    DueToday,
    Upcoming,
}

impl DueState {
    pub fn classify(due: NaiveDate, now: NaiveDateTime) -> DueState {
        if is_overdue(due, now) {
            DueState::Overdue
        } else if is_due_today(due, now) {
            DueState::DueToday
        } else {
            DueState::Upcoming
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn same_day_is_due_today_not_overdue() {
        for hour in [0, 9, 23] {
            let now = at(2024, 3, 10, hour, 30);
            assert!(!is_overdue(date(2024, 3, 10), now));
            assert!(is_due_today(date(2024, 3, 10), now));
        }
    }

    #[test]
    fn earlier_days_are_overdue() {
        let now = at(2024, 3, 10, 0, 0);
        assert!(is_overdue(date(2024, 3, 9), now));
        assert!(is_overdue(date(2023, 12, 31), now));
        assert!(!is_overdue(date(2024, 3, 11), now));
        assert!(!is_due_today(date(2024, 3, 11), now));
    }

    #[test]
    fn days_until_due_rounds_up() {
        let now = at(2024, 3, 10, 9, 0);
        assert_eq!(days_until_due(date(2024, 3, 11), now), 1);
        assert_eq!(days_until_due(date(2024, 3, 15), now), 5);
        assert_eq!(days_until_due(date(2024, 3, 10), now), 0);
        assert_eq!(days_until_due(date(2024, 3, 9), now), -1);

        let midnight = at(2024, 3, 10, 0, 0);
        assert_eq!(days_until_due(date(2024, 3, 12), midnight), 2);
        assert_eq!(days_until_due(date(2024, 3, 8), midnight), -2);
    }

    #[test]
    fn classify_and_label() {
        let now = at(2024, 3, 10, 12, 0);
        assert_eq!(DueState::classify(date(2024, 3, 1), now), DueState::Overdue);
        assert_eq!(DueState::classify(date(2024, 3, 10), now), DueState::DueToday);
        assert_eq!(DueState::classify(date(2024, 4, 1), now), DueState::Upcoming);
        assert_eq!(days_label(1), "1 day");
        assert_eq!(days_label(4), "4 days");
        assert_eq!(days_label(0), "0 days");
    }
}

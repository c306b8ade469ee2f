//! Calendar-month buckets and month arithmetic.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::Transaction;
use crate::errors::ValidationError;

/// A calendar year and month, the unit of every bucketed view.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn shift(self, months: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn previous(self) -> Self {
        self.shift(-1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidSetting(format!("`{s}` is not a YYYY-MM month"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

/// What happens when the source day-of-month does not exist in the target month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MonthOverflow {
    /// Surplus days spill into the following month: Jan 31 + 1 month is
    /// Mar 3 (Mar 2 in leap years).
    #[default]
    Rollover,
    /// Cap at the target month's last day: Jan 31 + 1 month is Feb 28/29.
    Clamp,
}

/// Adds `months` calendar months to `date`. `None` when the result leaves
/// the representable range.
pub fn add_months(date: NaiveDate, months: i32, overflow: MonthOverflow) -> Option<NaiveDate> {
    match overflow {
        MonthOverflow::Clamp => {
            let delta = Months::new(months.unsigned_abs());
            if months >= 0 {
                date.checked_add_months(delta)
            } else {
                date.checked_sub_months(delta)
            }
        }
        MonthOverflow::Rollover => {
            let first = MonthKey::of(date).shift(months).first_day()?;
            first.checked_add_signed(Duration::days(i64::from(date.day()) - 1))
        }
    }
}

/// Moves a view anchor by whole months without clamping the day-of-month.
pub fn navigate_month(anchor: NaiveDate, steps: i32) -> Option<NaiveDate> {
    add_months(anchor, steps, MonthOverflow::Rollover)
}

pub fn belongs_to_month(transaction: &Transaction, month: MonthKey) -> bool {
    month.contains(transaction.due_date)
}

/// Transactions whose due date falls inside `month`, in snapshot order.
pub fn month_bucket(snapshot: &[Transaction], month: MonthKey) -> Vec<&Transaction> {
    snapshot
        .iter()
        .filter(|txn| belongs_to_month(txn, month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_key_shifts_across_years() {
        let jan = MonthKey::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), MonthKey::new(2023, 12).unwrap());
        assert_eq!(jan.shift(13), MonthKey::new(2025, 2).unwrap());
        assert_eq!(jan.shift(-25), MonthKey::new(2021, 12).unwrap());
        assert!(MonthKey::new(2024, 13).is_none());
    }

    #[test]
    fn month_key_parses_and_displays() {
        let key: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(key, MonthKey::new(2024, 2).unwrap());
        assert_eq!(key.to_string(), "2024-02");
        assert!("2024-00".parse::<MonthKey>().is_err());
        assert!("february".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!(MonthKey::new(2024, 13).is_none());
        assert_eq!(
            serde_json::to_value(key).unwrap(),
            serde_json::json!({ "year": 2024, "month": 2 })
        );
    }

    #[test]
    fn rollover_spills_into_following_month() {
        let jan31 = date(2023, 1, 31);
        assert_eq!(add_months(jan31, 1, MonthOverflow::Rollover), Some(date(2023, 3, 3)));
        assert_eq!(
            add_months(date(2024, 1, 31), 1, MonthOverflow::Rollover),
            Some(date(2024, 3, 2))
        );
        assert_eq!(add_months(jan31, 2, MonthOverflow::Rollover), Some(date(2023, 3, 31)));
        assert_eq!(
            add_months(date(2024, 3, 31), -1, MonthOverflow::Rollover),
            Some(date(2024, 3, 2))
        );
    }

    #[test]
    fn clamp_caps_to_month_end() {
        assert_eq!(
            add_months(date(2023, 1, 31), 1, MonthOverflow::Clamp),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            add_months(date(2024, 3, 31), -1, MonthOverflow::Clamp),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn navigation_keeps_rollover_semantics() {
        assert_eq!(navigate_month(date(2023, 1, 31), 1), Some(date(2023, 3, 3)));
        assert_eq!(navigate_month(date(2023, 5, 15), -5), Some(date(2022, 12, 15)));
    }

    #[test]
    fn boundary_days_land_in_exactly_one_bucket() {
        let jan = MonthKey::new(2024, 1).unwrap();
        let feb = jan.next();
        for day in [date(2024, 1, 31), date(2024, 2, 1)] {
            let hits = [jan, feb].iter().filter(|m| m.contains(day)).count();
            assert_eq!(hits, 1, "{day} must belong to exactly one month");
        }
    }
}

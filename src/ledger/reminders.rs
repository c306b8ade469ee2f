//! Due-date reminder computation. Scheduling itself belongs to a notifier.

use chrono::{Days, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dates::days_label;
use crate::domain::Transaction;
use crate::errors::ValidationError;

pub const MAX_DAYS_BEFORE: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub days_before: u32,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days_before: 1,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl NotificationSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.days_before > MAX_DAYS_BEFORE {
            return Err(ValidationError::InvalidSetting(format!(
                "reminders can be at most {MAX_DAYS_BEFORE} days before the due date"
            )));
        }
        Ok(())
    }
}

/// Parses a `HH:MM` reminder time.
pub fn parse_time(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input.trim(), hhmm::FORMAT)
        .map_err(|_| ValidationError::InvalidSetting(format!("`{input}` is not a HH:MM time")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub transaction_id: Uuid,
    pub fire_at: NaiveDateTime,
    pub message: String,
}

/// Reminder for a pending transaction, fired `days_before` days ahead of the
/// due date at the configured time. `None` when disabled, settled, or when the
/// fire time is not in the future.
pub fn reminder_for(
    transaction: &Transaction,
    settings: &NotificationSettings,
    now: NaiveDateTime,
) -> Option<Reminder> {
    if !settings.enabled || !transaction.is_pending() {
        return None;
    }
    let fire_day = transaction
        .due_date
        .checked_sub_days(Days::new(u64::from(settings.days_before)))?;
    let fire_at = fire_day.and_time(settings.time);
    if fire_at <= now {
        return None;
    }
    let message = if settings.days_before == 0 {
        format!("{} is due today", transaction.description)
    } else {
        format!(
            "{} is due in {}",
            transaction.description,
            days_label(i64::from(settings.days_before))
        )
    };
    Some(Reminder {
        transaction_id: transaction.id,
        fire_at,
        message,
    })
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

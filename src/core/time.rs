use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time used for calendar-day decisions. Defaults to `now()` in UTC.
    fn local_now(&self) -> NaiveDateTime {
        self.now().naive_utc()
    }

    /// Returns the current calendar date. Defaults to `local_now().date()`.
    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// Reads the operating system clock; calendar days follow the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        let naive = date.and_hms_opt(hour, minute, 0)?;
        Some(Self::new(Utc.from_utc_datetime(&naive)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

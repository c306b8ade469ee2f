//! Transaction aggregation and recurrence engine.
//!
//! Every function here is a pure projection over a caller-supplied snapshot;
//! nothing is cached or persisted.

pub mod dates;
pub mod month;
pub mod recurring;
pub mod reminders;
pub mod selection;
pub mod summary;

pub use dates::{days_label, days_until_due, is_due_today, is_overdue, DueState};
pub use month::{add_months, belongs_to_month, month_bucket, navigate_month, MonthKey, MonthOverflow};
pub use recurring::{
    expand_template, find_series, group_series, RecurrencePolicy, RecurringSeries, SeriesKey,
    DEFAULT_OCCURRENCES,
};
pub use reminders::{parse_time, reminder_for, NotificationSettings, Reminder};
pub use selection::{history, upcoming_pending, HistoryFilter, HistoryScope, HOME_PENDING_LIMIT};
pub use summary::{summarize_month, MonthlySummary};

use std::sync::Arc;

use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::Reminder;

/// Schedules and cancels due-date reminders on the host platform.
pub trait Notifier: Send + Sync {
    fn schedule(&self, reminder: &Reminder) -> Result<()>;
    fn cancel(&self, transaction_id: Uuid) -> Result<()>;
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn schedule(&self, reminder: &Reminder) -> Result<()> {
        (**self).schedule(reminder)
    }

    fn cancel(&self, transaction_id: Uuid) -> Result<()> {
        (**self).cancel(transaction_id)
    }
}

/// Notifier that only records reminders in the trace log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn schedule(&self, reminder: &Reminder) -> Result<()> {
        tracing::info!(
            transaction = %reminder.transaction_id,
            fire_at = %reminder.fire_at,
            "reminder scheduled: {}",
            reminder.message
        );
        Ok(())
    }

    fn cancel(&self, transaction_id: Uuid) -> Result<()> {
        tracing::debug!(transaction = %transaction_id, "reminder cancelled");
        Ok(())
    }
}

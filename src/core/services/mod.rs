pub mod recurrence_service;
pub mod transaction_service;

pub use recurrence_service::RecurrenceService;
pub use transaction_service::TransactionService;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Transaction, TransactionDraft};
use crate::errors::{FinanceError, ValidationError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("{0}")]
    Batch(BatchFailure),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Finance(FinanceError::Validation(err))
    }
}

impl ServiceError {
    /// Partial-batch details, when the error came from a multi-item operation.
    pub fn batch(&self) -> Option<&BatchFailure> {
        match self {
            ServiceError::Batch(failure) => Some(failure),
            ServiceError::Finance(_) => None,
        }
    }
}

/// Retry budget applied to each item of a multi-call operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Tries per item, including the first one. Values below 1 count as 1.
    pub max_attempts: u32,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self { max_attempts: 1 }
    }
}

impl BatchPolicy {
    pub(crate) fn run<T, F>(&self, label: &str, mut op: F) -> Result<T, FinanceError>
    where
        F: FnMut() -> Result<T, FinanceError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                // Not-found never heals on retry.
                Err(err @ FinanceError::NotFound(_)) => return Err(err),
                Err(err) if attempt >= attempts => return Err(err),
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "{label} failed, retrying");
                    attempt += 1;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperation {
    CreateSeries,
    DeleteSeries,
    ClearAll,
}

impl fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOperation::CreateSeries => f.write_str("create series"),
            BatchOperation::DeleteSeries => f.write_str("delete series"),
            BatchOperation::ClearAll => f.write_str("clear all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemFailure {
    /// Position of the item within the batch.
    pub index: usize,
    pub transaction_id: Option<Uuid>,
    pub reason: String,
}

/// Outcome of a multi-call operation that did not fully succeed. Nothing is
/// rolled back: `created` and `deleted` already happened in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub operation: BatchOperation,
    pub total: usize,
    pub created: Vec<Transaction>,
    pub deleted: Vec<Uuid>,
    pub failures: Vec<BatchItemFailure>,
    /// Drafts never submitted, in order, so the caller can resume.
    pub remaining: Vec<TransactionDraft>,
}

impl BatchFailure {
    pub(crate) fn new(operation: BatchOperation, total: usize) -> Self {
        Self {
            operation,
            total,
            created: Vec::new(),
            deleted: Vec::new(),
            failures: Vec::new(),
            remaining: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.created.len() + self.deleted.len()
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} partially failed: {} of {} succeeded",
            self.operation,
            self.succeeded(),
            self.total
        )?;
        if let Some(first) = self.failures.first() {
            write!(f, " (item {}: {})", first.index + 1, first.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn run_retries_up_to_max_attempts() {
        let calls = Cell::new(0);
        let policy = BatchPolicy { max_attempts: 3 };
        let result = policy.run("create", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(FinanceError::Storage("offline".into()))
            } else {
                Ok(calls.get())
            }
        });
        assert_eq!(result.unwrap(), 3);

        calls.set(0);
        let once = BatchPolicy::default().run("create", || -> Result<(), FinanceError> {
            calls.set(calls.get() + 1);
            Err(FinanceError::Storage("offline".into()))
        });
        assert!(once.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn not_found_is_not_retried() {
        let calls = Cell::new(0);
        let policy = BatchPolicy { max_attempts: 5 };
        let id = Uuid::new_v4();
        let result = policy.run("delete", || -> Result<(), FinanceError> {
            calls.set(calls.get() + 1);
            Err(FinanceError::NotFound(id))
        });
        assert!(matches!(result, Err(FinanceError::NotFound(found)) if found == id));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failure_message_reports_progress() {
        let mut failure = BatchFailure::new(BatchOperation::DeleteSeries, 3);
        failure.deleted.push(Uuid::new_v4());
        failure.failures.push(BatchItemFailure {
            index: 1,
            transaction_id: None,
            reason: "timeout".into(),
        });
        assert_eq!(
            failure.to_string(),
            "delete series partially failed: 1 of 3 succeeded (item 2: timeout)"
        );
    }
}

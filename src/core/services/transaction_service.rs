//! Business logic helpers for single transactions.

use uuid::Uuid;

use super::{BatchFailure, BatchItemFailure, BatchOperation, BatchPolicy, ServiceError, ServiceResult};
use crate::domain::{Transaction, TransactionDraft};
use crate::errors::FinanceError;
use crate::storage::TransactionStore;

/// Validated wrappers around the persistence collaborator.
pub struct TransactionService;

impl TransactionService {
    /// Validates and persists a draft, returning the stored record.
    pub fn create(
        store: &dyn TransactionStore,
        draft: TransactionDraft,
    ) -> ServiceResult<Transaction> {
        draft.validate()?;
        let created = store.create(draft)?;
        tracing::debug!(id = %created.id, "transaction created");
        Ok(created)
    }

    /// Validates and persists a modified transaction.
    pub fn update(
        store: &dyn TransactionStore,
        transaction: &Transaction,
    ) -> ServiceResult<Transaction> {
        transaction.to_draft().validate()?;
        Ok(store.update(transaction)?)
    }

    /// Settles a pending transaction.
    pub fn mark_paid(
        store: &dyn TransactionStore,
        transaction: &Transaction,
    ) -> ServiceResult<Transaction> {
        let mut settled = transaction.clone();
        settled.mark_paid()?;
        Ok(store.update(&settled)?)
    }

    /// Deletes one transaction; an unknown id is `NotFound`.
    pub fn remove(store: &dyn TransactionStore, id: Uuid) -> ServiceResult<()> {
        if store.delete(id)? {
            Ok(())
        } else {
            Err(FinanceError::NotFound(id).into())
        }
    }

    /// Deletes every id in order, continuing past failures. Returns the
    /// deleted ids, or a [`BatchFailure`] listing what could not be deleted.
    pub fn remove_many(
        store: &dyn TransactionStore,
        ids: &[Uuid],
        operation: BatchOperation,
        policy: &BatchPolicy,
    ) -> ServiceResult<Vec<Uuid>> {
        let mut outcome = BatchFailure::new(operation, ids.len());
        for (index, id) in ids.iter().copied().enumerate() {
            let result = policy.run("delete", || {
                if store.delete(id)? {
                    Ok(())
                } else {
                    Err(FinanceError::NotFound(id))
                }
            });
            match result {
                Ok(()) => outcome.deleted.push(id),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "{operation}: delete failed");
                    outcome.failures.push(BatchItemFailure {
                        index,
                        transaction_id: Some(id),
                        reason: err.to_string(),
                    });
                }
            }
        }
        if outcome.failures.is_empty() {
            Ok(outcome.deleted)
        } else {
            Err(ServiceError::Batch(outcome))
        }
    }
}

//! Services that turn a recurring template into stored monthly instances.

use uuid::Uuid;

use super::{
    BatchFailure, BatchItemFailure, BatchOperation, BatchPolicy, ServiceError, ServiceResult,
    TransactionService,
};
use crate::domain::{Transaction, TransactionDraft};
use crate::ledger::{expand_template, RecurrencePolicy, RecurringSeries};
use crate::storage::TransactionStore;

pub struct RecurrenceService;

impl RecurrenceService {
    /// Expands `template` and creates every instance in order.
    pub fn create_series(
        store: &dyn TransactionStore,
        template: &TransactionDraft,
        recurrence: &RecurrencePolicy,
        batch: &BatchPolicy,
    ) -> ServiceResult<Vec<Transaction>> {
        let drafts = expand_template(template, recurrence)?;
        tracing::debug!(count = drafts.len(), "expanded recurring template");
        Self::create_drafts(store, drafts, batch)
    }

    /// Creates drafts sequentially, stopping at the first one that still
    /// fails after the retry budget. Created instances are kept and returned
    /// in the failure together with the drafts not yet submitted.
    pub fn create_drafts(
        store: &dyn TransactionStore,
        drafts: Vec<TransactionDraft>,
        batch: &BatchPolicy,
    ) -> ServiceResult<Vec<Transaction>> {
        let total = drafts.len();
        let mut created = Vec::with_capacity(total);
        let mut pending = drafts.into_iter().enumerate();

        while let Some((index, draft)) = pending.next() {
            draft.validate()?;
            match batch.run("create", || store.create(draft.clone())) {
                Ok(txn) => created.push(txn),
                Err(err) => {
                    tracing::warn!(
                        index,
                        created = created.len(),
                        total,
                        error = %err,
                        "series creation stopped"
                    );
                    let mut failure = BatchFailure::new(BatchOperation::CreateSeries, total);
                    failure.created = created;
                    failure.failures.push(BatchItemFailure {
                        index,
                        transaction_id: None,
                        reason: err.to_string(),
                    });
                    failure.remaining = std::iter::once(draft)
                        .chain(pending.by_ref().map(|(_, rest)| rest))
                        .collect();
                    return Err(ServiceError::Batch(failure));
                }
            }
        }
        Ok(created)
    }

    /// Deletes every member of `series`, reporting members that could not be removed.
    pub fn delete_series(
        store: &dyn TransactionStore,
        series: &RecurringSeries,
        batch: &BatchPolicy,
    ) -> ServiceResult<Vec<Uuid>> {
        let ids = series.member_ids();
        TransactionService::remove_many(store, &ids, BatchOperation::DeleteSeries, batch)
    }
}

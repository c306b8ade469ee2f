//! Persistence collaborators. The engine only ever sees snapshots returned by
//! [`TransactionStore::list`].

pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Transaction, TransactionDraft};
use crate::errors::Result;

pub use json_backend::{JsonStore, CURRENT_SCHEMA_VERSION};
pub use memory::MemoryStore;

/// CRUD contract of the persistence collaborator. Implementations assign ids
/// and timestamps.
pub trait TransactionStore: Send + Sync {
    /// All transactions, newest created first.
    fn list(&self) -> Result<Vec<Transaction>>;
    fn create(&self, draft: TransactionDraft) -> Result<Transaction>;
    /// Replaces the stored record with the same id. `NotFound` when absent.
    fn update(&self, transaction: &Transaction) -> Result<Transaction>;
    /// Returns `false` when no record had that id.
    fn delete(&self, id: Uuid) -> Result<bool>;
}

impl<T: TransactionStore + ?Sized> TransactionStore for Arc<T> {
    fn list(&self) -> Result<Vec<Transaction>> {
        (**self).list()
    }

    fn create(&self, draft: TransactionDraft) -> Result<Transaction> {
        (**self).create(draft)
    }

    fn update(&self, transaction: &Transaction) -> Result<Transaction> {
        (**self).update(transaction)
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        (**self).delete(id)
    }
}

/// Shared bookkeeping for stores that hold the full record set in a `Vec`,
/// kept newest-created first.
pub(crate) mod records {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use crate::domain::{Transaction, TransactionDraft};
    use crate::errors::{FinanceError, Result};

    pub fn insert(
        records: &mut Vec<Transaction>,
        draft: TransactionDraft,
        now: DateTime<Utc>,
    ) -> Transaction {
        let created = Transaction::from_draft(draft, Uuid::new_v4(), now);
        records.insert(0, created.clone());
        created
    }

    pub fn replace(
        records: &mut [Transaction],
        transaction: &Transaction,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == transaction.id)
            .ok_or(FinanceError::NotFound(transaction.id))?;
        let mut updated = transaction.clone();
        updated.created_at = slot.created_at;
        updated.updated_at = now;
        *slot = updated.clone();
        Ok(updated)
    }

    pub fn remove(records: &mut Vec<Transaction>, id: Uuid) -> bool {
        let before = records.len();
        records.retain(|existing| existing.id != id);
        records.len() != before
    }

    pub fn sorted(records: &[Transaction]) -> Vec<Transaction> {
        let mut listed = records.to_vec();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed
    }
}

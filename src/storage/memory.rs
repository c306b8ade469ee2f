use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{records, TransactionStore};
use crate::core::time::{Clock, SystemClock};
use crate::domain::{Transaction, TransactionDraft};
use crate::errors::{FinanceError, Result};

/// Process-local store, used by tests and as a scratch backend.
pub struct MemoryStore {
    records: Mutex<Vec<Transaction>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Transaction>>> {
        self.records
            .lock()
            .map_err(|_| FinanceError::Storage("memory store lock poisoned".into()))
    }
}

impl TransactionStore for MemoryStore {
    fn list(&self) -> Result<Vec<Transaction>> {
        let guard = self.lock()?;
        Ok(records::sorted(&guard))
    }

    fn create(&self, draft: TransactionDraft) -> Result<Transaction> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        Ok(records::insert(&mut guard, draft, now))
    }

    fn update(&self, transaction: &Transaction) -> Result<Transaction> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        records::replace(&mut guard, transaction, now)
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        let mut guard = self.lock()?;
        Ok(records::remove(&mut guard, id))
    }
}

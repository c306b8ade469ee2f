use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{records, TransactionStore};
use crate::core::time::{Clock, SystemClock};
use crate::domain::{Transaction, TransactionDraft};
use crate::errors::{FinanceError, Result};
use crate::utils::write_atomic;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    schema_version: u32,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
        }
    }
}

/// Single-file JSON store. Every call reads the file and every mutation
/// rewrites it atomically.
pub struct JsonStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    guard: Mutex<()>,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            clock,
            guard: Mutex::new(()),
        };
        // Surface corrupt or newer files at open time.
        store.read()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        let file: StoreFile = serde_json::from_str(&data)?;
        if file.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(FinanceError::Storage(format!(
                "{} uses schema v{}, newest supported is v{}",
                self.path.display(),
                file.schema_version,
                CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(file)
    }

    fn write(&self, file: &StoreFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        write_atomic(&self.path, &json)
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut Vec<Transaction>) -> Result<T>) -> Result<T> {
        let _lock = self
            .guard
            .lock()
            .map_err(|_| FinanceError::Storage("json store lock poisoned".into()))?;
        let mut file = self.read()?;
        let outcome = apply(&mut file.transactions)?;
        file.schema_version = CURRENT_SCHEMA_VERSION;
        self.write(&file)?;
        Ok(outcome)
    }
}

impl TransactionStore for JsonStore {
    fn list(&self) -> Result<Vec<Transaction>> {
        let file = self.read()?;
        Ok(records::sorted(&file.transactions))
    }

    fn create(&self, draft: TransactionDraft) -> Result<Transaction> {
        let now = self.clock.now();
        let created = self.mutate(|items| Ok(records::insert(items, draft, now)))?;
        tracing::debug!(id = %created.id, path = %self.path.display(), "transaction written");
        Ok(created)
    }

    fn update(&self, transaction: &Transaction) -> Result<Transaction> {
        let now = self.clock.now();
        self.mutate(|items| records::replace(items, transaction, now))
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        self.mutate(|items| Ok(records::remove(items, id)))
    }
}

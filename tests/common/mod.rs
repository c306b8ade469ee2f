#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::NaiveDate;
use finance_core::{
    core::{Clock, FinanceManager, FixedClock, Notifier},
    currency::Amount,
    domain::{Transaction, TransactionDraft, TransactionKind},
    errors::{FinanceError, Result},
    ledger::Reminder,
    storage::{MemoryStore, TransactionStore},
};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn clock_at(y: i32, m: u32, d: u32, hour: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock::at(date(y, m, d), hour, 0).expect("valid time"))
}

pub fn expense(description: &str, cents: i64, due: NaiveDate) -> TransactionDraft {
    TransactionDraft::new(
        description,
        "Housing",
        Amount::from_minor_units(cents).expect("positive amount"),
        TransactionKind::Expense,
        due,
    )
}

pub fn income(description: &str, cents: i64, due: NaiveDate) -> TransactionDraft {
    TransactionDraft::new(
        description,
        "Salary",
        Amount::from_minor_units(cents).expect("positive amount"),
        TransactionKind::Income,
        due,
    )
}

/// Records every notifier call so tests can assert on reminder traffic.
#[derive(Default)]
pub struct RecordingNotifier {
    pub scheduled: Mutex<Vec<Reminder>>,
    pub cancelled: Mutex<Vec<Uuid>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn scheduled_for(&self, id: Uuid) -> Vec<Reminder> {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .filter(|reminder| reminder.transaction_id == id)
            .cloned()
            .collect()
    }

    pub fn cancelled_count(&self, id: Uuid) -> usize {
        self.cancelled.lock().unwrap().iter().filter(|c| **c == id).count()
    }
}

impl Notifier for RecordingNotifier {
    fn schedule(&self, reminder: &Reminder) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FinanceError::Storage("notification service offline".into()));
        }
        self.scheduled.lock().unwrap().push(reminder.clone());
        Ok(())
    }

    fn cancel(&self, transaction_id: Uuid) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FinanceError::Storage("notification service offline".into()));
        }
        self.cancelled.lock().unwrap().push(transaction_id);
        Ok(())
    }
}

/// Memory-backed store that fails selected create/delete calls.
pub struct FlakyStore {
    pub inner: MemoryStore,
    creates: AtomicUsize,
    fail_create_on: Mutex<Vec<usize>>,
    fail_delete_ids: Mutex<Vec<Uuid>>,
}

impl FlakyStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: MemoryStore::with_clock(clock),
            creates: AtomicUsize::new(0),
            fail_create_on: Mutex::new(Vec::new()),
            fail_delete_ids: Mutex::new(Vec::new()),
        }
    }

    /// Fails the create call with the given zero-based call number.
    pub fn fail_create_call(&self, call: usize) {
        self.fail_create_on.lock().unwrap().push(call);
    }

    pub fn fail_delete_of(&self, id: Uuid) {
        self.fail_delete_ids.lock().unwrap().push(id);
    }

    pub fn heal(&self) {
        self.fail_create_on.lock().unwrap().clear();
        self.fail_delete_ids.lock().unwrap().clear();
    }
}

impl TransactionStore for FlakyStore {
    fn list(&self) -> Result<Vec<Transaction>> {
        self.inner.list()
    }

    fn create(&self, draft: TransactionDraft) -> Result<Transaction> {
        let call = self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_on.lock().unwrap().contains(&call) {
            return Err(FinanceError::Storage(format!("create call {call} rejected")));
        }
        self.inner.create(draft)
    }

    fn update(&self, transaction: &Transaction) -> Result<Transaction> {
        self.inner.update(transaction)
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        if self.fail_delete_ids.lock().unwrap().contains(&id) {
            return Err(FinanceError::Storage(format!("delete of {id} rejected")));
        }
        self.inner.delete(id)
    }
}

/// Manager over shared test doubles, so tests can inspect both afterwards.
pub fn manager_with(
    clock: Arc<FixedClock>,
) -> (FinanceManager, Arc<FlakyStore>, Arc<RecordingNotifier>) {
    let store = Arc::new(FlakyStore::new(clock.clone()));
    let notifier = Arc::new(RecordingNotifier::default());
    let manager = FinanceManager::new(
        Box::new(store.clone()),
        Box::new(notifier.clone()),
        clock,
    );
    (manager, store, notifier)
}

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::config::Config;
use crate::core::notifier::Notifier;
use crate::core::services::{
    BatchOperation, BatchPolicy, RecurrenceService, ServiceError, ServiceResult,
    TransactionService,
};
use crate::core::time::Clock;
use crate::domain::{Identifiable, Transaction, TransactionDraft};
use crate::errors::{FinanceError, Result};
use crate::ledger::{
    find_series, group_series, history, reminder_for, summarize_month, upcoming_pending,
    HistoryFilter, HistoryScope, MonthKey, MonthlySummary, NotificationSettings,
    RecurrencePolicy, RecurringSeries, SeriesKey, HOME_PENDING_LIMIT,
};
use crate::storage::TransactionStore;

/// Holds the cached transaction snapshot and the collaborators that change it.
///
/// The cache only ever reflects what the store confirmed; reminders follow
/// each confirmed change on a best-effort basis.
pub struct FinanceManager {
    transactions: Vec<Transaction>,
    settings: NotificationSettings,
    recurrence: RecurrencePolicy,
    batch: BatchPolicy,
    upcoming_limit: usize,
    store: Box<dyn TransactionStore>,
    notifier: Box<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl FinanceManager {
    pub fn new(
        store: Box<dyn TransactionStore>,
        notifier: Box<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactions: Vec::new(),
            settings: NotificationSettings::default(),
            recurrence: RecurrencePolicy::default(),
            batch: BatchPolicy::default(),
            upcoming_limit: HOME_PENDING_LIMIT,
            store,
            notifier,
            clock,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Box<dyn TransactionStore>,
        notifier: Box<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(store, notifier, clock)
            .with_notification_settings(config.notifications)
            .with_recurrence_policy(config.recurrence)
            .with_batch_policy(config.batch)
            .with_upcoming_limit(config.upcoming_limit)
    }

    pub fn with_notification_settings(mut self, settings: NotificationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_recurrence_policy(mut self, policy: RecurrencePolicy) -> Self {
        self.recurrence = policy;
        self
    }

    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch = policy;
        self
    }

    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit.max(1);
        self
    }

    /// Replaces the cache with the store's current contents.
    pub fn load(&mut self) -> Result<usize> {
        let mut listed = self.store.list()?;
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.transactions = listed;
        tracing::info!(count = self.transactions.len(), "transactions loaded");
        Ok(self.transactions.len())
    }

    /// Cached snapshot, newest created first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    pub fn notification_settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn recurrence_policy(&self) -> &RecurrencePolicy {
        &self.recurrence
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.local_now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn current_month(&self) -> MonthKey {
        MonthKey::of(self.today())
    }

    /// Adds a single transaction, or a full monthly series when the draft is
    /// recurring. On a partial series failure the created instances are kept
    /// in the cache and also reported in the returned failure.
    pub fn add(&mut self, draft: TransactionDraft) -> ServiceResult<Vec<Transaction>> {
        if draft.is_recurring {
            let result = RecurrenceService::create_series(
                self.store.as_ref(),
                &draft,
                &self.recurrence,
                &self.batch,
            );
            self.absorb_created(result, &draft.description)
        } else {
            let created = TransactionService::create(self.store.as_ref(), draft)?;
            tracing::info!(id = %created.id, description = %created.description, "transaction added");
            self.insert_cached(vec![created.clone()]);
            Ok(vec![created])
        }
    }

    /// Submits drafts left over from an interrupted series creation.
    pub fn resume_series(
        &mut self,
        remaining: Vec<TransactionDraft>,
    ) -> ServiceResult<Vec<Transaction>> {
        let label = remaining
            .first()
            .map(|draft| draft.description.clone())
            .unwrap_or_default();
        let result = RecurrenceService::create_drafts(self.store.as_ref(), remaining, &self.batch);
        self.absorb_created(result, &label)
    }

    /// Persists changes to an existing transaction. A paid transaction cannot
    /// be returned to pending.
    pub fn update(&mut self, transaction: Transaction) -> ServiceResult<Transaction> {
        let cached = self
            .transaction(transaction.id)
            .ok_or(FinanceError::NotFound(transaction.id))?;
        if cached.is_paid() && transaction.is_pending() {
            return Err(FinanceError::InvalidTransition(format!(
                "transaction {} is paid and cannot return to pending",
                transaction.id
            ))
            .into());
        }
        let updated = match TransactionService::update(self.store.as_ref(), &transaction) {
            Ok(updated) => updated,
            Err(err) => return Err(self.forget_if_missing(err)),
        };
        tracing::info!(id = %updated.id, "transaction updated");
        self.replace_cached(updated.clone());
        self.cancel_reminder(updated.id);
        self.schedule_reminder(&updated);
        Ok(updated)
    }

    pub fn mark_paid(&mut self, id: Uuid) -> ServiceResult<Transaction> {
        let cached = self
            .transaction(id)
            .cloned()
            .ok_or(FinanceError::NotFound(id))?;
        let paid = match TransactionService::mark_paid(self.store.as_ref(), &cached) {
            Ok(paid) => paid,
            Err(err) => return Err(self.forget_if_missing(err)),
        };
        tracing::info!(%id, "transaction marked as paid");
        self.replace_cached(paid.clone());
        self.cancel_reminder(id);
        Ok(paid)
    }

    pub fn delete(&mut self, id: Uuid) -> ServiceResult<()> {
        if let Err(err) = TransactionService::remove(self.store.as_ref(), id) {
            return Err(self.forget_if_missing(err));
        }
        tracing::info!(%id, "transaction deleted");
        self.remove_cached(&[id]);
        self.cancel_reminder(id);
        Ok(())
    }

    /// Deletes every member of the series identified by `key`.
    pub fn delete_series(&mut self, key: &SeriesKey) -> ServiceResult<Vec<Uuid>> {
        let series = find_series(&self.transactions, key)
            .ok_or_else(|| FinanceError::SeriesNotFound(key.to_string()))?;
        let result = RecurrenceService::delete_series(self.store.as_ref(), &series, &self.batch);
        let deleted = match &result {
            Ok(deleted) => deleted.clone(),
            Err(err) => err
                .batch()
                .map(|failure| failure.deleted.clone())
                .unwrap_or_default(),
        };
        self.remove_cached(&deleted);
        for id in &deleted {
            self.cancel_reminder(*id);
        }
        match &result {
            Ok(_) => tracing::info!(series = %key, count = deleted.len(), "series deleted"),
            Err(err) => tracing::warn!(series = %key, error = %err, "series partially deleted"),
        }
        result
    }

    /// Stores new reminder settings and reschedules every pending transaction.
    pub fn update_notification_settings(
        &mut self,
        settings: NotificationSettings,
    ) -> ServiceResult<usize> {
        settings.validate()?;
        self.settings = settings;
        let mut scheduled = 0;
        for txn in self.transactions.iter().filter(|txn| txn.is_pending()) {
            warn_on_error(self.notifier.cancel(txn.id), txn.id, "cancel");
            if let Some(reminder) = reminder_for(txn, &self.settings, self.clock.local_now()) {
                if warn_on_error(self.notifier.schedule(&reminder), txn.id, "schedule") {
                    scheduled += 1;
                }
            }
        }
        tracing::info!(
            enabled = settings.enabled,
            days_before = settings.days_before,
            scheduled,
            "notification settings updated"
        );
        Ok(scheduled)
    }

    /// Cancels every reminder and deletes every cached transaction.
    pub fn clear_all(&mut self) -> ServiceResult<usize> {
        let ids: Vec<Uuid> = self.transactions.iter().map(|txn| txn.id).collect();
        for id in &ids {
            self.cancel_reminder(*id);
        }
        let result = TransactionService::remove_many(
            self.store.as_ref(),
            &ids,
            BatchOperation::ClearAll,
            &self.batch,
        );
        match result {
            Ok(deleted) => {
                self.remove_cached(&deleted);
                tracing::info!(count = deleted.len(), "all transactions cleared");
                Ok(deleted.len())
            }
            Err(err) => {
                if let Some(failure) = err.batch() {
                    self.remove_cached(&failure.deleted);
                }
                tracing::warn!(error = %err, "clear all partially failed");
                Err(err)
            }
        }
    }

    pub fn summary(&self, month: MonthKey) -> MonthlySummary {
        summarize_month(&self.transactions, month, self.clock.local_now())
    }

    /// Pending transactions of the current month shown on the home view.
    pub fn upcoming(&self) -> Vec<&Transaction> {
        upcoming_pending(&self.transactions, self.current_month(), self.upcoming_limit)
    }

    pub fn history(&self, filter: HistoryFilter, scope: HistoryScope) -> Vec<&Transaction> {
        history(&self.transactions, filter, scope)
    }

    pub fn series(&self) -> Vec<RecurringSeries> {
        group_series(&self.transactions)
    }

    /// Series containing the given transaction, if it is recurring.
    pub fn find_series_of(&self, id: Uuid) -> Option<RecurringSeries> {
        let txn = self.transaction(id).filter(|txn| txn.is_recurring)?;
        find_series(&self.transactions, &SeriesKey::of(txn))
    }

    fn absorb_created(
        &mut self,
        result: ServiceResult<Vec<Transaction>>,
        label: &str,
    ) -> ServiceResult<Vec<Transaction>> {
        match result {
            Ok(created) => {
                tracing::info!(description = %label, count = created.len(), "recurring series added");
                self.insert_cached(created.clone());
                Ok(created)
            }
            Err(ServiceError::Batch(failure)) => {
                tracing::warn!(
                    description = %label,
                    created = failure.created.len(),
                    remaining = failure.remaining.len(),
                    "recurring series partially added"
                );
                self.insert_cached(failure.created.clone());
                Err(ServiceError::Batch(failure))
            }
            Err(err) => Err(err),
        }
    }

    fn insert_cached(&mut self, created: Vec<Transaction>) {
        for txn in &created {
            self.schedule_reminder(txn);
        }
        // Newest first: the last created instance leads.
        let mut merged: Vec<Transaction> = created.into_iter().rev().collect();
        merged.append(&mut self.transactions);
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.transactions = merged;
    }

    fn replace_cached(&mut self, updated: Transaction) {
        if let Some(slot) = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id() == updated.id())
        {
            *slot = updated;
        }
    }

    fn remove_cached(&mut self, ids: &[Uuid]) {
        self.transactions.retain(|txn| !ids.contains(&txn.id()));
    }

    /// A store-side not-found means the cache is stale for that id.
    fn forget_if_missing(&mut self, err: ServiceError) -> ServiceError {
        if let ServiceError::Finance(FinanceError::NotFound(id)) = &err {
            tracing::warn!(%id, "transaction vanished from the store");
            let id = *id;
            self.remove_cached(&[id]);
        }
        err
    }

    fn schedule_reminder(&self, txn: &Transaction) {
        if let Some(reminder) = reminder_for(txn, &self.settings, self.clock.local_now()) {
            warn_on_error(self.notifier.schedule(&reminder), txn.id, "schedule");
        }
    }

    fn cancel_reminder(&self, id: Uuid) {
        warn_on_error(self.notifier.cancel(id), id, "cancel");
    }
}

fn warn_on_error(result: Result<()>, id: Uuid, action: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%id, error = %err, "reminder {action} failed");
            false
        }
    }
}

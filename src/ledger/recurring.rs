use std::{collections::HashMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::{add_months, MonthOverflow};
use crate::currency::Amount;
use crate::domain::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};
use crate::errors::ValidationError;

pub const DEFAULT_OCCURRENCES: u32 = 12;
const MAX_OCCURRENCES: u32 = 240;

/// How a recurring template is expanded into monthly instances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrencePolicy {
    pub occurrences: u32,
    #[serde(default)]
    pub overflow: MonthOverflow,
}

impl Default for RecurrencePolicy {
    fn default() -> Self {
        Self {
            occurrences: DEFAULT_OCCURRENCES,
            overflow: MonthOverflow::Rollover,
        }
    }
}

impl RecurrencePolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.occurrences == 0 || self.occurrences > MAX_OCCURRENCES {
            return Err(ValidationError::InvalidOccurrences);
        }
        Ok(())
    }
}

/// Expands a template into one pending, recurring draft per month.
///
/// Instance `i` is due on `template.due_date + i` months, computed from the
/// template date each time so overflow never accumulates.
pub fn expand_template(
    template: &TransactionDraft,
    policy: &RecurrencePolicy,
) -> Result<Vec<TransactionDraft>, ValidationError> {
    template.validate()?;
    policy.validate()?;
    (0..policy.occurrences)
        .map(|index| {
            let offset = i32::try_from(index).map_err(|_| ValidationError::InvalidOccurrences)?;
            let due_date = add_months(template.due_date, offset, policy.overflow)
                .ok_or(ValidationError::DateOutOfRange)?;
            Ok(TransactionDraft {
                due_date,
                is_recurring: true,
                status: TransactionStatus::Pending,
                ..template.clone()
            })
        })
        .collect()
}

/// Grouping key shared by every member of a recurring series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub description: String,
    pub category: String,
    pub amount: Amount,
    pub kind: TransactionKind,
}

impl SeriesKey {
    pub fn of(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            amount: transaction.amount,
            kind: transaction.kind,
        }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.is_recurring
            && transaction.kind == self.kind
            && transaction.amount == self.amount
            && transaction.description == self.description
            && transaction.category == self.category
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.description, self.category, self.amount, self.kind
        )
    }
}

/// A recurring series reconstructed from the snapshot on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringSeries {
    pub key: SeriesKey,
    /// Members ordered by due date, earliest first.
    pub members: Vec<Transaction>,
    pub next_due_date: NaiveDate,
    pub pending_count: usize,
}

impl RecurringSeries {
    fn from_members(key: SeriesKey, mut members: Vec<Transaction>) -> Option<Self> {
        members.sort_by_key(|txn| (txn.due_date, txn.created_at));
        let next_due_date = members
            .iter()
            .find(|txn| txn.is_pending())
            .or_else(|| members.first())
            .map(|txn| txn.due_date)?;
        let pending_count = members.iter().filter(|txn| txn.is_pending()).count();
        Some(Self {
            key,
            members,
            next_due_date,
            pending_count,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn paid_count(&self) -> usize {
        self.members.len() - self.pending_count
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|txn| txn.id).collect()
    }
}

/// Groups recurring transactions by [`SeriesKey`], ordered by next due date.
pub fn group_series(snapshot: &[Transaction]) -> Vec<RecurringSeries> {
    let mut groups: HashMap<SeriesKey, Vec<Transaction>> = HashMap::new();
    for txn in snapshot.iter().filter(|txn| txn.is_recurring) {
        groups
            .entry(SeriesKey::of(txn))
            .or_default()
            .push(txn.clone());
    }

    let mut series: Vec<RecurringSeries> = groups
        .into_iter()
        .filter_map(|(key, members)| RecurringSeries::from_members(key, members))
        .collect();
    series.sort_by(|a, b| {
        a.next_due_date
            .cmp(&b.next_due_date)
            .then_with(|| a.key.cmp(&b.key))
    });
    series
}

pub fn find_series(snapshot: &[Transaction], key: &SeriesKey) -> Option<RecurringSeries> {
    let members: Vec<Transaction> = snapshot
        .iter()
        .filter(|txn| key.matches(txn))
        .cloned()
        .collect();
    RecurringSeries::from_members(key.clone(), members)
}

//! Ordering and selection policies for the home and history views.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::month::{belongs_to_month, MonthKey};
use crate::domain::{Transaction, TransactionKind, TransactionStatus};
use crate::errors::ValidationError;

/// Number of pending items shown on the home view.
pub const HOME_PENDING_LIMIT: usize = 5;

/// Pending transactions of `month`, earliest due first, at most `limit`.
pub fn upcoming_pending(
    snapshot: &[Transaction],
    month: MonthKey,
    limit: usize,
) -> Vec<&Transaction> {
    let mut pending: Vec<&Transaction> = snapshot
        .iter()
        .filter(|txn| txn.is_pending() && belongs_to_month(txn, month))
        .collect();
    pending.sort_by_key(|txn| (txn.due_date, txn.created_at));
    pending.truncate(limit);
    pending
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Pending,
    Paid,
    Expense,
    Income,
}

impl HistoryFilter {
    pub const ALL: [HistoryFilter; 5] = [
        HistoryFilter::All,
        HistoryFilter::Pending,
        HistoryFilter::Paid,
        HistoryFilter::Expense,
        HistoryFilter::Income,
    ];

    pub fn matches(self, transaction: &Transaction) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Pending => transaction.status == TransactionStatus::Pending,
            HistoryFilter::Paid => transaction.status == TransactionStatus::Paid,
            HistoryFilter::Expense => transaction.kind == TransactionKind::Expense,
            HistoryFilter::Income => transaction.kind == TransactionKind::Income,
        }
    }
}

impl fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HistoryFilter::All => "all",
            HistoryFilter::Pending => "pending",
            HistoryFilter::Paid => "paid",
            HistoryFilter::Expense => "expense",
            HistoryFilter::Income => "income",
        };
        f.write_str(label)
    }
}

impl FromStr for HistoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HistoryFilter::ALL
            .into_iter()
            .find(|filter| filter.to_string() == wanted)
            .ok_or_else(|| ValidationError::InvalidSetting(format!("unknown history filter `{s}`")))
    }
}

/// Which transactions the history view considers before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    Month(MonthKey),
    AllTime,
}

/// History listing: scoped, filtered, latest due date first. Ties fall back
/// to the most recently created transaction.
pub fn history(
    snapshot: &[Transaction],
    filter: HistoryFilter,
    scope: HistoryScope,
) -> Vec<&Transaction> {
    let mut listed: Vec<&Transaction> = snapshot
        .iter()
        .filter(|txn| match scope {
            HistoryScope::Month(month) => belongs_to_month(txn, month),
            HistoryScope::AllTime => true,
        })
        .filter(|txn| filter.matches(txn))
        .collect();
    listed.sort_by(|a, b| {
        b.due_date
            .cmp(&a.due_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    listed
}

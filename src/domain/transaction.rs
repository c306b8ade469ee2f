use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Amount;
use crate::domain::common::{Displayable, Identifiable};
use crate::errors::{FinanceError, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Direction of the amount relative to the user's balance.
    pub fn sign(self) -> Decimal {
        match self {
            TransactionKind::Expense => Decimal::NEGATIVE_ONE,
            TransactionKind::Income => Decimal::ONE,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(ValidationError::InvalidSetting(format!(
                "unknown transaction type `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Paid,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => f.write_str("pending"),
            TransactionStatus::Paid => f.write_str("paid"),
        }
    }
}

/// Creation request handed to the persistence collaborator, which assigns the
/// identifier and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionDraft {
    pub amount: Amount,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub status: TransactionStatus,
}

impl TransactionDraft {
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Amount,
        kind: TransactionKind,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            description: description.into(),
            category: category.into(),
            kind,
            due_date,
            is_recurring: false,
            status: TransactionStatus::Pending,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Amount,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn from_draft(draft: TransactionDraft, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: draft.amount,
            description: draft.description,
            category: draft.category,
            kind: draft.kind,
            due_date: draft.due_date,
            is_recurring: draft.is_recurring,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    pub fn is_paid(&self) -> bool {
        self.status == TransactionStatus::Paid
    }

    /// Settles a pending transaction. Paid transactions never return to pending.
    pub fn mark_paid(&mut self) -> Result<(), FinanceError> {
        if self.is_paid() {
            return Err(FinanceError::InvalidTransition(format!(
                "transaction {} is already paid",
                self.id
            )));
        }
        self.status = TransactionStatus::Paid;
        Ok(())
    }

    /// Amount with income positive and expense negative.
    pub fn signed_amount(&self) -> Decimal {
        self.amount.value() * self.kind.sign()
    }

    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            amount: self.amount,
            description: self.description.clone(),
            category: self.category.clone(),
            kind: self.kind,
            due_date: self.due_date,
            is_recurring: self.is_recurring,
            status: self.status,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} ({}) {} due {} [{}]",
            self.description, self.category, self.kind, self.due_date, self.status
        )
    }
}

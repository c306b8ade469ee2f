//! Built-in category catalogue offered when recording transactions.
//!
//! Categories stay free text on drafts; the catalogue only seeds pickers.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::transaction::TransactionKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn accepts(self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (CategoryKind::Expense, TransactionKind::Expense)
                | (CategoryKind::Income, TransactionKind::Income)
        )
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "Expense",
            CategoryKind::Income => "Income",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

const EXPENSE_CATEGORIES: [&str; 9] = [
    "Food",
    "Transport",
    "Housing",
    "Health",
    "Education",
    "Leisure",
    "Clothing",
    "Technology",
    "Other Expenses",
];

const INCOME_CATEGORIES: [&str; 5] = [
    "Salary",
    "Freelance",
    "Investments",
    "Sales",
    "Other Income",
];

static DEFAULT_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    EXPENSE_CATEGORIES
        .iter()
        .map(|name| Category::new(*name, CategoryKind::Expense))
        .chain(
            INCOME_CATEGORIES
                .iter()
                .map(|name| Category::new(*name, CategoryKind::Income)),
        )
        .collect()
});

/// Default categories applicable to the given transaction kind, in display order.
pub fn categories_for(kind: TransactionKind) -> Vec<&'static Category> {
    DEFAULT_CATEGORIES
        .iter()
        .filter(|category| category.kind.accepts(kind))
        .collect()
}

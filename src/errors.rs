use thiserror::Error;
use uuid::Uuid;

/// Error type that captures persistence and domain failures.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),
    #[error("Recurring series not found: {0}")]
    SeriesNotFound(String),
    #[error("Invalid status change: {0}")]
    InvalidTransition(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FinanceError>;

/// Rejections raised before a draft or setting reaches a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount must not exceed {}", crate::currency::MAX_AMOUNT)]
    AmountTooLarge,
    #[error("`{0}` is not a valid amount")]
    InvalidAmount(String),
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("a recurring series needs at least one occurrence")]
    InvalidOccurrences,
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
    #[error("date is outside the supported range")]
    DateOutOfRange,
}

pub mod category;
pub mod common;
pub mod transaction;

pub use category::{categories_for, Category, CategoryKind};
pub use common::{Displayable, Identifiable};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};

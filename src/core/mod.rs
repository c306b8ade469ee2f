//! Orchestration around the pure engine: collaborator traits, services, and the
//! explicit state holder used by front ends.

pub mod manager;
pub mod notifier;
pub mod services;
pub mod time;

pub use manager::FinanceManager;
pub use notifier::{Notifier, TracingNotifier};
pub use services::{
    BatchFailure, BatchOperation, BatchPolicy, RecurrenceService, ServiceError, ServiceResult,
    TransactionService,
};
pub use time::{Clock, FixedClock, SystemClock};

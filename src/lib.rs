#![doc(test(attr(deny(warnings))))]

//! Finance Core provides the transaction aggregation and recurrence engine behind
//! a personal bill and income tracker: due-date classification, monthly buckets,
//! recurring series management, and monthly summaries.
//!
//! The engine (`ledger`) is pure and operates on transaction snapshots. The
//! `core` module wires it to the persistence and notification collaborators.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}

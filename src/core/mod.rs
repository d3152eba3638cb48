//! Core business logic module
//!
//! This module contains the points ledger components:
//! - `traits` - Store abstraction shared by the sync and concurrent ledgers
//! - `engine` - Points request orchestration
//! - `account_manager` - Account records
//! - `ledger_log` - Append-only ledger entries
//! - `unit_of_work` - Staged writes committed together or not at all
//! - `async` - Concurrent implementations

pub mod account_manager;
pub mod r#async;
pub mod engine;
pub mod ledger_log;
pub mod traits;
pub mod unit_of_work;

pub use account_manager::AccountManager;
pub use engine::PointsLedger;
pub use ledger_log::LedgerLog;
pub use r#async::{AsyncAccountManager, AsyncPointsLedger, BatchProcessor};
pub use traits::LedgerStore;
pub use unit_of_work::UnitOfWork;

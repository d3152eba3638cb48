//! Concurrent implementations of core components
//!
//! This module provides thread-safe versions of the ledger components using
//! DashMap for per-account locking.
//!
//! # Architecture
//!
//! - **AsyncAccountManager**: accounts and their ledger entries, one map entry per account
//! - **AsyncPointsLedger**: applies points requests against the shared store
//! - **BatchProcessor**: runs batches concurrently, partitioned by account
//!
//! # Thread Safety
//!
//! - Requests for different accounts proceed in parallel
//! - Requests for the same account are serialized by the entry lock
//! - No global locks

pub mod account_manager;
pub mod batch_processor;
pub mod engine;

pub use account_manager::{AccountRecord, AsyncAccountManager};
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::AsyncPointsLedger;

//! Points Ledger Library
//! # Overview
//!
//! A per-account points balance with an append-only ledger of every change,
//! plus access/refresh token issuance that embeds the account's permission
//! level. Points requests are processed from CSV with either a sync or an
//! async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, LedgerEntry, PointsRequest, LedgerError)
//! - [`cli`] - CLI arguments parsing
//! - [`config`] - Environment settings and the secrets file
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Points request orchestration
//!   - [`core::account_manager`] - Account records
//!   - [`core::ledger_log`] - Append-only ledger entries
//!   - [`core::unit_of_work`] - All-or-nothing writes
//! - [`auth`] - Token pairs carrying `user_level`
//! - [`io`] - CSV input and output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Points Requests
//!
//! A request carries `points_spent` or `points_added`, never both:
//!
//! - **Spend**: Debit points (rejected with "Not enough points." if the
//!   balance is too low)
//! - **Add**: Credit points
//!
//! Amounts may be integers or integer strings. Zero counts as absent. The
//! balance can only change through a request, and every applied request
//! leaves exactly one ledger entry.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use auth::{TokenIssuer, TokenPair, UserLevel};
pub use config::{Config, Secrets};
pub use core::{AccountManager, LedgerLog, LedgerStore, PointsLedger};
pub use io::{write_accounts_csv, write_history_csv};
pub use types::{
    Account, AccountId, AccountView, LedgerEntry, LedgerEntryView, LedgerError, PointsRequest,
    PointsResponse, ProfileUpdate,
};

//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record, its read-only view, and profile edits
//! - `ledger`: Ledger entries and their history view
//! - `request`: Points request parsing and the validated adjustment
//! - `error`: Error types for the points ledger

pub mod account;
pub mod error;
pub mod ledger;
pub mod request;

pub use account::{Account, AccountId, AccountView, ProfileUpdate};
pub use error::{LedgerError, PointsField};
pub use ledger::{LedgerEntry, LedgerEntryView};
pub use request::{coerce_integer, LedgerRecord, PointsAdjustment, PointsRequest, PointsResponse};

//! Core trait for points ledger stores
//!
//! This module defines the trait abstraction that allows both the synchronous
//! and the concurrent ledger to be driven through one interface.

use crate::types::{
    Account, AccountId, AccountView, LedgerEntry, LedgerEntryView, LedgerError, PointsRequest,
    PointsResponse, ProfileUpdate,
};

/// Trait for a store holding accounts and their ledger entries
///
/// Implementations must apply a points request as a single unit: either the
/// balance change and its ledger entry are both recorded, or neither is.
pub trait LedgerStore {
    /// Add or replace an account record
    fn register(&mut self, account: Account);

    /// Validate and apply a points request to an account
    fn apply_points(
        &mut self,
        account: AccountId,
        request: &PointsRequest,
    ) -> Result<PointsResponse, LedgerError>;

    /// Read-only view of an account
    fn account_view(&self, account: AccountId) -> Result<AccountView, LedgerError>;

    /// Ledger entries of an account in creation order
    fn history(&self, account: AccountId) -> Result<Vec<LedgerEntryView>, LedgerError>;

    /// Edit the username and email of an account
    fn update_profile(
        &mut self,
        account: AccountId,
        update: ProfileUpdate,
    ) -> Result<AccountView, LedgerError>;

    /// All accounts, sorted by ID
    fn accounts(&self) -> Vec<Account>;

    /// All ledger entries, grouped by account ID and in creation order within each account
    fn entries(&self) -> Vec<LedgerEntry>;
}

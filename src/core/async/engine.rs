//! Points ledger for concurrent processing
//!
//! This module provides the `AsyncPointsLedger`, which applies points requests
//! against the thread-safe `AsyncAccountManager`.
//!
//! # Architecture
//!
//! ```text
//! AsyncPointsLedger
//!     └── Arc<AsyncAccountManager>  (accounts + ledger entries, locked per account)
//! ```
//!
//! # Thread Safety
//!
//! The ledger is cheap to clone and every method takes `&self`. Validation
//! happens outside any lock; the balance computation, the balance write and
//! the ledger append happen inside one per-account lock.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::AsyncAccountManager;
use crate::core::traits::LedgerStore;
use crate::types::{
    Account, AccountId, AccountView, LedgerEntry, LedgerEntryView, LedgerError, PointsRequest,
    PointsResponse, ProfileUpdate,
};

/// Thread-safe points ledger
#[derive(Debug, Clone, Default)]
pub struct AsyncPointsLedger {
    /// Shared account store
    account_manager: Arc<AsyncAccountManager>,
}

impl AsyncPointsLedger {
    /// Create a ledger over a shared account store
    pub fn new(account_manager: Arc<AsyncAccountManager>) -> Self {
        Self { account_manager }
    }

    /// Apply a points request to an account
    ///
    /// Same rules and errors as [`crate::core::PointsLedger::process`]. Safe to
    /// call concurrently for the same account.
    pub fn process_request(
        &self,
        account_id: AccountId,
        request: &PointsRequest,
    ) -> Result<PointsResponse, LedgerError> {
        let adjustment = request.validate()?;

        let account = self.account_manager.transact(account_id, |current| {
            let points = adjustment.apply_to(account_id, current.points)?;

            let mut updated = current.clone();
            updated.points = points;

            let entry = LedgerEntry {
                account: account_id,
                points_spent: adjustment.points_spent(),
                points_added: adjustment.points_added(),
                created_at: Utc::now(),
            };
            Ok((updated, entry))
        })?;

        info!(
            account = %account_id,
            points_spent = adjustment.points_spent(),
            points_added = adjustment.points_added(),
            points = account.points,
            "Applied points request"
        );

        Ok(PointsResponse {
            points: account.points,
        })
    }
}

impl LedgerStore for AsyncPointsLedger {
    fn register(&mut self, account: Account) {
        self.account_manager.register(account);
    }

    fn apply_points(
        &mut self,
        account: AccountId,
        request: &PointsRequest,
    ) -> Result<PointsResponse, LedgerError> {
        self.process_request(account, request)
    }

    fn account_view(&self, account: AccountId) -> Result<AccountView, LedgerError> {
        self.account_manager
            .get(account)
            .map(|account| AccountView::from(&account))
    }

    fn history(&self, account: AccountId) -> Result<Vec<LedgerEntryView>, LedgerError> {
        Ok(self
            .account_manager
            .entries(account)?
            .iter()
            .map(LedgerEntryView::from)
            .collect())
    }

    fn update_profile(
        &mut self,
        account: AccountId,
        update: ProfileUpdate,
    ) -> Result<AccountView, LedgerError> {
        self.account_manager
            .update(account, |stored| update.apply(stored))
            .map(|account| AccountView::from(&account))
    }

    fn accounts(&self) -> Vec<Account> {
        self.account_manager.get_all_accounts()
    }

    fn entries(&self) -> Vec<LedgerEntry> {
        self.account_manager.get_all_entries()
    }
}

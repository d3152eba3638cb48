//! Points ledger engine
//!
//! This module provides the `PointsLedger` that applies points requests by
//! coordinating between the `AccountManager` and the `LedgerLog`.
//!
//! The engine enforces the ledger's business rules:
//! - Requests are validated before any store is touched
//! - Spending never takes a balance below zero
//! - The balance update and its ledger entry are written in one unit of work

use crate::core::account_manager::AccountManager;
use crate::core::ledger_log::LedgerLog;
use crate::core::traits::LedgerStore;
use crate::core::unit_of_work::UnitOfWork;
use crate::types::{
    Account, AccountId, AccountView, LedgerEntry, LedgerEntryView, LedgerError, PointsRequest,
    PointsResponse, ProfileUpdate,
};
use chrono::Utc;
use tracing::info;

/// Points ledger over in-memory stores
///
/// Single-threaded: exclusive access through `&mut self` serializes every
/// read-modify-write of a balance.
#[derive(Debug, Default)]
pub struct PointsLedger {
    account_manager: AccountManager,
    ledger_log: LedgerLog,
}

impl PointsLedger {
    /// Create a ledger with no accounts
    pub fn new() -> Self {
        PointsLedger {
            account_manager: AccountManager::new(),
            ledger_log: LedgerLog::new(),
        }
    }

    /// Create a ledger pre-loaded with account records
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut ledger = Self::new();
        for account in accounts {
            ledger.account_manager.register(account);
        }
        ledger
    }

    /// Apply a points request to an account
    ///
    /// Validation runs first; on success the new balance is computed from the
    /// stored one and saved together with a ledger entry recording exactly the
    /// applied amounts.
    ///
    /// # Returns
    ///
    /// The resulting balance only; the raw amounts are not echoed back.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request fails validation (see [`PointsRequest::validate`])
    /// - The account does not exist
    /// - The spend exceeds the balance (`InsufficientBalance`)
    /// - The credit would overflow the balance
    ///
    /// No state changes on error.
    pub fn process(
        &mut self,
        account_id: AccountId,
        request: &PointsRequest,
    ) -> Result<PointsResponse, LedgerError> {
        let adjustment = request.validate()?;

        let points = UnitOfWork::run(
            &mut self.account_manager,
            &mut self.ledger_log,
            |unit| {
                let mut account = unit.account(account_id)?;
                let points = adjustment.apply_to(account_id, account.points)?;
                account.points = points;

                unit.save_account(account);
                unit.append_entry(LedgerEntry {
                    account: account_id,
                    points_spent: adjustment.points_spent(),
                    points_added: adjustment.points_added(),
                    created_at: Utc::now(),
                });
                Ok(points)
            },
        )?;

        info!(
            account = %account_id,
            points_spent = adjustment.points_spent(),
            points_added = adjustment.points_added(),
            points,
            "Applied points request"
        );

        Ok(PointsResponse { points })
    }

    /// Get all accounts sorted by ID
    pub fn get_accounts(&self) -> Vec<&Account> {
        self.account_manager.get_all_accounts()
    }

    /// Get all ledger entries grouped by account ID
    pub fn get_entries(&self) -> Vec<&LedgerEntry> {
        self.ledger_log.all_entries()
    }
}

impl LedgerStore for PointsLedger {
    fn register(&mut self, account: Account) {
        self.account_manager.register(account);
    }

    fn apply_points(
        &mut self,
        account: AccountId,
        request: &PointsRequest,
    ) -> Result<PointsResponse, LedgerError> {
        self.process(account, request)
    }

    fn account_view(&self, account: AccountId) -> Result<AccountView, LedgerError> {
        self.account_manager.get(account).map(AccountView::from)
    }

    fn history(&self, account: AccountId) -> Result<Vec<LedgerEntryView>, LedgerError> {
        self.account_manager.get(account)?;
        Ok(self
            .ledger_log
            .history(account)
            .iter()
            .map(LedgerEntryView::from)
            .collect())
    }

    fn update_profile(
        &mut self,
        account: AccountId,
        update: ProfileUpdate,
    ) -> Result<AccountView, LedgerError> {
        let stored = self.account_manager.get_mut(account)?;
        update.apply(stored);
        Ok(AccountView::from(&*stored))
    }

    fn accounts(&self) -> Vec<Account> {
        self.get_accounts().into_iter().cloned().collect()
    }

    fn entries(&self) -> Vec<LedgerEntry> {
        self.get_entries().into_iter().cloned().collect()
    }
}

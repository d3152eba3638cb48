//! Account management module
//!
//! This module provides the `AccountManager` struct which holds the account
//! records the ledger operates on.
//!
//! The AccountManager is responsible for:
//! - Registering account records loaded from the identity store
//! - Looking accounts up by ID
//! - Persisting updated account records
//! - Providing sorted account listings for output

use crate::types::{Account, AccountId, LedgerError};
use std::collections::HashMap;

/// Holds all account records
///
/// Accounts are owned by the identity store and are only registered here,
/// never created on demand: a request for an unknown account fails.
#[derive(Debug, Default)]
pub struct AccountManager {
    /// Map of account IDs to account records
    accounts: HashMap<AccountId, Account>,
}

impl AccountManager {
    /// Create a new AccountManager with no accounts
    pub fn new() -> Self {
        AccountManager {
            accounts: HashMap::new(),
        }
    }

    /// Add or replace an account record
    pub fn register(&mut self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Look up an account
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no record exists for `id`.
    pub fn get(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Look up an account for modification
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no record exists for `id`.
    pub fn get_mut(&mut self, id: AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Persist an account record, replacing the stored one
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account was never registered.
    pub fn save(&mut self, account: Account) -> Result<(), LedgerError> {
        let stored = self.get_mut(account.id)?;
        *stored = account;
        Ok(())
    }

    /// Get all accounts sorted by ID
    ///
    /// Sorting gives deterministic output for CSV generation.
    pub fn get_all_accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: u64, points: u64) -> Account {
        Account::new(AccountId(id), format!("user{id}"), format!("user{id}@example.com"))
            .with_points(points)
    }

    #[test]
    fn test_register_and_get() {
        let mut manager = AccountManager::new();
        manager.register(account(1, 100));

        let stored = manager.get(AccountId(1)).unwrap();
        assert_eq!(stored.points, 100);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_get_unknown_account() {
        let manager = AccountManager::new();
        assert_eq!(
            manager.get(AccountId(9)).unwrap_err(),
            LedgerError::account_not_found(AccountId(9))
        );
        assert!(manager.is_empty());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut manager = AccountManager::new();
        manager.register(account(1, 100));
        manager.register(account(1, 5));

        assert_eq!(manager.get(AccountId(1)).unwrap().points, 5);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_save_updates_record() {
        let mut manager = AccountManager::new();
        manager.register(account(1, 100));

        let mut updated = manager.get(AccountId(1)).unwrap().clone();
        updated.points = 70;
        manager.save(updated).unwrap();

        assert_eq!(manager.get(AccountId(1)).unwrap().points, 70);
    }

    #[test]
    fn test_save_unregistered_account_fails() {
        let mut manager = AccountManager::new();
        let result = manager.save(account(3, 10));
        assert!(matches!(result, Err(LedgerError::AccountNotFound { .. })));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_get_all_accounts_sorted() {
        let mut manager = AccountManager::new();
        manager.register(account(3, 0));
        manager.register(account(1, 0));
        manager.register(account(2, 0));

        let ids: Vec<u64> = manager
            .get_all_accounts()
            .iter()
            .map(|account| account.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

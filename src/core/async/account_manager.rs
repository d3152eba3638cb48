//! Thread-safe account management for concurrent ledger processing
//!
//! This module provides the `AsyncAccountManager` struct, which keeps each
//! account together with its ledger entries in one concurrent map entry.
//!
//! # Design
//!
//! `DashMap` locks per entry. Because an account's balance and its ledger
//! entries live in the same entry, a points request's read-modify-write and
//! its log append run under a single lock: two concurrent requests against
//! the same account are serialized and neither update is lost.

use crate::types::{Account, AccountId, LedgerEntry, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// An account and its ledger entries in creation order
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: Account,
    pub entries: Vec<LedgerEntry>,
}

/// Thread-safe account store
///
/// All methods take `&self` and can be called from many tasks at once.
#[derive(Debug, Default)]
pub struct AsyncAccountManager {
    /// Concurrent map of account records by ID
    accounts: DashMap<AccountId, AccountRecord>,
}

impl AsyncAccountManager {
    /// Create a new empty AsyncAccountManager
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Add or replace an account record
    ///
    /// Replacing an account keeps its existing ledger entries.
    pub fn register(&self, account: Account) {
        match self.accounts.entry(account.id) {
            Entry::Occupied(mut occupied) => occupied.get_mut().account = account,
            Entry::Vacant(vacant) => {
                vacant.insert(AccountRecord {
                    account,
                    entries: Vec::new(),
                });
            }
        }
    }

    /// Snapshot of an account
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no record exists for `id`.
    pub fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.accounts
            .get(&id)
            .map(|record| record.account.clone())
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Snapshot of an account's ledger entries
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no record exists for `id`.
    pub fn entries(&self, id: AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.accounts
            .get(&id)
            .map(|record| record.entries.clone())
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Apply a change to one account as a single unit
    ///
    /// The closure sees the current account while the entry is locked and
    /// returns the updated account plus the ledger entry to record. Both are
    /// written before the lock is released. If the closure fails, nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no record exists for `id`, or whatever
    /// the closure returns.
    pub fn transact<F>(&self, id: AccountId, f: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&Account) -> Result<(Account, LedgerEntry), LedgerError>,
    {
        let mut record = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        let (account, entry) = f(&record.account)?;

        record.account = account.clone();
        record.entries.push(entry);
        Ok(account)
    }

    /// Update an account in place, without a ledger entry
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no record exists for `id`.
    pub fn update<F>(&self, id: AccountId, f: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account),
    {
        let mut record = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;
        f(&mut record.account);
        Ok(record.account.clone())
    }

    /// All accounts sorted by ID
    pub fn get_all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|record| record.account.clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }

    /// All ledger entries grouped by account ID ascending
    pub fn get_all_entries(&self) -> Vec<LedgerEntry> {
        let mut records: Vec<(AccountId, Vec<LedgerEntry>)> = self
            .accounts
            .iter()
            .map(|record| (*record.key(), record.entries.clone()))
            .collect();
        records.sort_by_key(|(id, _)| *id);
        records.into_iter().flat_map(|(_, entries)| entries).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn account(id: u64, points: u64) -> Account {
        Account::new(AccountId(id), format!("user{id}"), format!("user{id}@example.com"))
            .with_points(points)
    }

    fn spend(account: &Account, amount: u64) -> Result<(Account, LedgerEntry), LedgerError> {
        let mut updated = account.clone();
        updated.points = account
            .points
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::insufficient_balance(account.id, account.points, amount))?;
        let entry = LedgerEntry {
            account: account.id,
            points_spent: amount,
            points_added: 0,
            created_at: Utc::now(),
        };
        Ok((updated, entry))
    }

    #[test]
    fn test_register_and_get() {
        let manager = AsyncAccountManager::new();
        manager.register(account(1, 50));
        assert_eq!(manager.get(AccountId(1)).unwrap().points, 50);
    }

    #[test]
    fn test_register_keeps_entries() {
        let manager = AsyncAccountManager::new();
        manager.register(account(1, 50));
        manager.transact(AccountId(1), |a| spend(a, 10)).unwrap();

        manager.register(account(1, 500));

        assert_eq!(manager.get(AccountId(1)).unwrap().points, 500);
        assert_eq!(manager.entries(AccountId(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_transact_writes_account_and_entry() {
        let manager = AsyncAccountManager::new();
        manager.register(account(1, 50));

        let updated = manager.transact(AccountId(1), |a| spend(a, 20)).unwrap();

        assert_eq!(updated.points, 30);
        assert_eq!(manager.get(AccountId(1)).unwrap().points, 30);
        assert_eq!(manager.entries(AccountId(1)).unwrap()[0].points_spent, 20);
    }

    #[test]
    fn test_failed_transact_writes_nothing() {
        let manager = AsyncAccountManager::new();
        manager.register(account(1, 5));

        let result = manager.transact(AccountId(1), |a| spend(a, 20));

        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(manager.get(AccountId(1)).unwrap().points, 5);
        assert!(manager.entries(AccountId(1)).unwrap().is_empty());
    }

    #[test]
    fn test_transact_unknown_account() {
        let manager = AsyncAccountManager::new();
        let result = manager.transact(AccountId(4), |a| spend(a, 1));
        assert_eq!(result.unwrap_err(), LedgerError::account_not_found(AccountId(4)));
    }

    #[test]
    fn test_concurrent_spends_are_serialized() {
        let manager = Arc::new(AsyncAccountManager::new());
        manager.register(account(1, 1000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..25 {
                        manager.transact(AccountId(1), |a| spend(a, 1)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(manager.get(AccountId(1)).unwrap().points, 800);
        assert_eq!(manager.entries(AccountId(1)).unwrap().len(), 200);
    }

    #[test]
    fn test_get_all_sorted() {
        let manager = AsyncAccountManager::new();
        manager.register(account(3, 0));
        manager.register(account(1, 0));

        let ids: Vec<u64> = manager.get_all_accounts().iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}

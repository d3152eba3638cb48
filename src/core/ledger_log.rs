//! Append-only ledger log
//!
//! This module provides the `LedgerLog` component that keeps every ledger
//! entry per account, in the order the entries were appended. Entries are
//! never modified or removed.

use crate::types::{AccountId, LedgerEntry};
use std::collections::HashMap;

/// Ledger entries grouped by account
#[derive(Debug, Default)]
pub struct LedgerLog {
    /// Map of account ID to that account's entries in creation order
    entries: HashMap<AccountId, Vec<LedgerEntry>>,
}

impl LedgerLog {
    /// Create a new empty log
    pub fn new() -> Self {
        LedgerLog {
            entries: HashMap::new(),
        }
    }

    /// Append an entry to its account's history
    pub fn append(&mut self, entry: LedgerEntry) {
        self.entries.entry(entry.account).or_default().push(entry);
    }

    /// Entries of one account in creation order
    ///
    /// Returns an empty slice for an account with no entries.
    pub fn history(&self, account: AccountId) -> &[LedgerEntry] {
        self.entries
            .get(&account)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All entries, grouped by account ID ascending
    pub fn all_entries(&self) -> Vec<&LedgerEntry> {
        let mut accounts: Vec<&AccountId> = self.entries.keys().collect();
        accounts.sort();
        accounts
            .into_iter()
            .flat_map(|account| self.entries[account].iter())
            .collect()
    }

    /// Total number of entries across all accounts
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Scoped unit of work over the account manager and ledger log
//!
//! Writes are staged on the unit and only reach the stores on [`UnitOfWork::commit`].
//! A unit dropped without committing discards everything it staged, so a
//! failure anywhere inside the scope leaves both stores untouched.

use crate::core::account_manager::AccountManager;
use crate::core::ledger_log::LedgerLog;
use crate::types::{Account, AccountId, LedgerEntry, LedgerError};
use tracing::debug;

/// Staged writes against the account manager and ledger log
pub struct UnitOfWork<'a> {
    accounts: &'a mut AccountManager,
    log: &'a mut LedgerLog,
    staged_accounts: Vec<Account>,
    staged_entries: Vec<LedgerEntry>,
    committed: bool,
}

impl<'a> UnitOfWork<'a> {
    /// Open a unit of work over the two stores
    pub fn begin(accounts: &'a mut AccountManager, log: &'a mut LedgerLog) -> Self {
        UnitOfWork {
            accounts,
            log,
            staged_accounts: Vec::new(),
            staged_entries: Vec::new(),
            committed: false,
        }
    }

    /// Run `f` inside a unit of work
    ///
    /// Commits if `f` succeeds, rolls back otherwise.
    pub fn run<F, T>(
        accounts: &'a mut AccountManager,
        log: &'a mut LedgerLog,
        f: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut UnitOfWork<'a>) -> Result<T, LedgerError>,
    {
        let mut unit = UnitOfWork::begin(accounts, log);
        let value = f(&mut unit)?;
        unit.commit()?;
        Ok(value)
    }

    /// Read an account as it will look once this unit commits
    pub fn account(&self, id: AccountId) -> Result<Account, LedgerError> {
        if let Some(staged) = self.staged_accounts.iter().rev().find(|a| a.id == id) {
            return Ok(staged.clone());
        }
        self.accounts.get(id).cloned()
    }

    /// Stage an account record for saving
    pub fn save_account(&mut self, account: Account) {
        self.staged_accounts.push(account);
    }

    /// Stage a ledger entry for appending
    pub fn append_entry(&mut self, entry: LedgerEntry) {
        self.staged_entries.push(entry);
    }

    /// Apply all staged writes
    ///
    /// Every staged account is checked against the manager before anything
    /// is written, so an unknown account aborts the whole unit.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if a staged account was never registered.
    pub fn commit(mut self) -> Result<(), LedgerError> {
        for account in &self.staged_accounts {
            self.accounts.get(account.id)?;
        }

        for account in std::mem::take(&mut self.staged_accounts) {
            self.accounts.save(account)?;
        }
        for entry in std::mem::take(&mut self.staged_entries) {
            self.log.append(entry);
        }

        self.committed = true;
        Ok(())
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if !self.committed && (!self.staged_accounts.is_empty() || !self.staged_entries.is_empty())
        {
            debug!(
                accounts = self.staged_accounts.len(),
                entries = self.staged_entries.len(),
                "Rolling back uncommitted unit of work"
            );
        }
    }
}

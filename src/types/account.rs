//! Account-related types for the points ledger
//!
//! This module defines the Account record, its read-only projection, and the
//! profile edit payload accepted for it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier
///
/// Opaque to the ledger; only used as a lookup key and as the owning
/// reference of ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        AccountId(id)
    }
}

/// User account record
///
/// Owned by the identity store. The ledger only reads it and, for the point
/// balance, conditionally mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account ID
    pub id: AccountId,

    /// Display name
    pub username: String,

    /// Contact address
    pub email: String,

    /// Current point balance
    ///
    /// Unsigned, so the non-negative balance invariant holds by construction.
    /// Only the points ledger operation changes it.
    pub points: u64,

    /// Full administrative privileges
    pub is_superuser: bool,

    /// Staff privileges
    pub is_staff: bool,

    /// Whether the account may log in
    pub is_active: bool,
}

impl Account {
    /// Create an active account with no privileges and a zero balance
    pub fn new(id: AccountId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Account {
            id,
            username: username.into(),
            email: email.into(),
            points: 0,
            is_superuser: false,
            is_staff: false,
            is_active: true,
        }
    }

    /// Set the starting balance
    pub fn with_points(mut self, points: u64) -> Self {
        self.points = points;
        self
    }

    /// Set the three privilege flags
    pub fn with_flags(mut self, is_superuser: bool, is_staff: bool, is_active: bool) -> Self {
        self.is_superuser = is_superuser;
        self.is_staff = is_staff;
        self.is_active = is_active;
        self
    }
}

/// Read-only projection of an account
///
/// Exposes identity, contact, and the current balance. There is no way to
/// turn a view back into a balance change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub points: u64,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        AccountView {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            points: account.points,
        }
    }
}

/// Profile edit payload
///
/// Only the username and email are writable. Any `points` key in the
/// incoming document is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// Apply the edit to an account, leaving the balance and flags untouched
    pub fn apply(self, account: &mut Account) {
        if let Some(username) = self.username {
            account.username = username;
        }
        if let Some(email) = self.email {
            account.email = email;
        }
    }
}

//! Ledger entry types
//!
//! A ledger entry is the immutable audit record of one balance change. Entries
//! are appended by the points ledger operation and never updated or removed.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable record of one balance change
///
/// Exactly one of `points_spent` / `points_added` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The account this entry applies to
    pub account: AccountId,

    /// Points taken from the balance
    pub points_spent: u64,

    /// Points credited to the balance
    pub points_added: u64,

    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Signed effect of this entry on the balance
    pub fn delta(&self) -> i128 {
        i128::from(self.points_added) - i128::from(self.points_spent)
    }
}

/// Read-only projection of a ledger entry, as listed in an account's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntryView {
    pub points_spent: u64,
    pub points_added: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&LedgerEntry> for LedgerEntryView {
    fn from(entry: &LedgerEntry) -> Self {
        LedgerEntryView {
            points_spent: entry.points_spent,
            points_added: entry.points_added,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_delta() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let spend = LedgerEntry {
            account: AccountId(1),
            points_spent: 30,
            points_added: 0,
            created_at,
        };
        let add = LedgerEntry {
            points_spent: 0,
            points_added: 50,
            ..spend.clone()
        };

        assert_eq!(spend.delta(), -30);
        assert_eq!(add.delta(), 50);
    }

    #[test]
    fn test_view_serialization() {
        let entry = LedgerEntry {
            account: AccountId(1),
            points_spent: 0,
            points_added: 50,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(LedgerEntryView::from(&entry)).unwrap();
        assert_eq!(json["points_spent"], 0);
        assert_eq!(json["points_added"], 50);
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }
}

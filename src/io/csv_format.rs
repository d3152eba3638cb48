//! CSV format handling for accounts, points requests and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Raw record structures for deserialization
//! - Conversion from raw records to domain types ([`CsvInput`])
//! - Account and ledger history serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Account, AccountId, AccountView, LedgerEntry, LedgerError, LedgerRecord, PointsRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

/// A domain type that can be read from CSV rows
pub trait CsvInput: Sized {
    /// Row shape as deserialized by the csv reader
    type Raw: DeserializeOwned;

    /// Convert a raw row, describing the problem on failure
    fn from_raw(raw: Self::Raw) -> Result<Self, String>;
}

/// Account row: `id,username,email,points,is_superuser,is_staff,is_active`
///
/// Flags are kept as strings so that `1`/`0` and `yes`/`no` are accepted
/// alongside `true`/`false`; an empty flag means `false`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub points: u64,
    pub is_superuser: Option<String>,
    pub is_staff: Option<String>,
    pub is_active: Option<String>,
}

/// Points request row: `account,points_spent,points_added`
///
/// Amounts stay as text; conversion and validation belong to the ledger.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RequestCsvRecord {
    pub account: u64,
    pub points_spent: Option<String>,
    pub points_added: Option<String>,
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool, String> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        other => Err(format!("Invalid value '{}' for {}", other, name)),
    }
}

fn amount_cell(value: Option<String>) -> Option<Value> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(Value::String)
}

impl CsvInput for Account {
    type Raw = AccountCsvRecord;

    fn from_raw(raw: AccountCsvRecord) -> Result<Self, String> {
        let is_superuser = parse_flag("is_superuser", raw.is_superuser)?;
        let is_staff = parse_flag("is_staff", raw.is_staff)?;
        let is_active = parse_flag("is_active", raw.is_active)?;

        Ok(Account::new(AccountId(raw.id), raw.username, raw.email)
            .with_points(raw.points)
            .with_flags(is_superuser, is_staff, is_active))
    }
}

impl CsvInput for LedgerRecord {
    type Raw = RequestCsvRecord;

    fn from_raw(raw: RequestCsvRecord) -> Result<Self, String> {
        Ok(LedgerRecord {
            account: AccountId(raw.account),
            request: PointsRequest {
                points_spent: amount_cell(raw.points_spent),
                points_added: amount_cell(raw.points_added),
            },
        })
    }
}

/// Write account views as CSV: `id,username,email,points`
///
/// Accounts are sorted by ID for deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "username", "email", "points"])?;

    let mut views: Vec<AccountView> = accounts.iter().map(AccountView::from).collect();
    views.sort_by_key(|view| view.id);

    for view in views {
        writer.write_record(&[
            view.id.to_string(),
            view.username,
            view.email,
            view.points.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write ledger entries as CSV: `account,points_spent,points_added,created_at`
///
/// Entries are written in the order given; timestamps are RFC 3339.
pub fn write_history_csv(entries: &[LedgerEntry], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "points_spent", "points_added", "created_at"])?;

    for entry in entries {
        writer.write_record(&[
            entry.account.to_string(),
            entry.points_spent.to_string(),
            entry.points_added.to_string(),
            entry.created_at.to_rfc3339(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

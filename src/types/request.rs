//! Points request parsing and validation
//!
//! Incoming requests carry `points_spent` / `points_added` as loosely typed
//! values (numbers or numeric strings). [`PointsRequest::validate`] turns them
//! into a typed [`PointsAdjustment`] or a field-tagged [`LedgerError`].

use super::account::AccountId;
use super::error::{LedgerError, PointsField};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw points request, as received
///
/// A key that is present with a `null` value is kept as `Some(Value::Null)`
/// so it fails conversion instead of being treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PointsRequest {
    #[serde(default, deserialize_with = "present")]
    pub points_spent: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub points_added: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A validated balance change
///
/// Spending and adding are mutually exclusive, so the type carries exactly
/// one non-zero amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsAdjustment {
    Spend(u64),
    Add(u64),
}

/// One points request addressed to an account, as read from batch input
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    /// The account the request applies to
    pub account: AccountId,

    /// The raw request
    pub request: PointsRequest,
}

/// Response body of a successful points request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsResponse {
    pub points: u64,
}

/// Convert a loosely typed value to an integer
///
/// Accepts JSON integers, integral floats (`5.0`), and strings holding an
/// integer with optional surrounding whitespace and a trailing `.0…`.
/// Booleans, null, containers and anything fractional are rejected.
///
/// The result is wide enough to hold every `u64` and every negative `i64`
/// exactly; floats are only accepted below 2^64 in magnitude, where the
/// conversion is exact.
pub fn coerce_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(i128::from(int));
            }
            if let Some(int) = number.as_u64() {
                return Some(i128::from(int));
            }
            let float = number.as_f64()?;
            if float.fract() == 0.0 && float.abs() < TWO_POW_64 {
                Some(float as i128)
            } else {
                None
            }
        }
        Value::String(raw) => {
            let trimmed = raw.trim();
            let digits = match trimmed.split_once('.') {
                Some((int_part, decimals)) if decimals.chars().all(|c| c == '0') => int_part,
                Some(_) => return None,
                None => trimmed,
            };
            digits.parse::<i128>().ok()
        }
        _ => None,
    }
}

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

impl PointsRequest {
    /// Build a request from numeric amounts
    pub fn new(points_spent: Option<i64>, points_added: Option<i64>) -> Self {
        PointsRequest {
            points_spent: points_spent.map(Value::from),
            points_added: points_added.map(Value::from),
        }
    }

    /// Validate the request
    ///
    /// Checks run in a fixed order: each field's conversion and sign, then
    /// the "nothing to do" check, then the "both at once" check.
    ///
    /// # Errors
    ///
    /// - `TypeConversion` if a present field is not an integer
    /// - `NegativeValue` if a present field is below zero
    /// - `NoOperationRequested` if both amounts resolve to zero
    /// - `ConflictingOperation` if both amounts are non-zero
    pub fn validate(&self) -> Result<PointsAdjustment, LedgerError> {
        let points_spent = resolve_field(self.points_spent.as_ref(), PointsField::Spent)?;
        let points_added = resolve_field(self.points_added.as_ref(), PointsField::Added)?;

        match (points_spent, points_added) {
            (0, 0) => Err(LedgerError::NoOperationRequested),
            (spent, 0) => Ok(PointsAdjustment::Spend(spent)),
            (0, added) => Ok(PointsAdjustment::Add(added)),
            _ => Err(LedgerError::ConflictingOperation),
        }
    }
}

fn resolve_field(value: Option<&Value>, field: PointsField) -> Result<u64, LedgerError> {
    let Some(value) = value else {
        return Ok(0);
    };

    let int = coerce_integer(value).ok_or_else(|| LedgerError::type_conversion(field))?;
    if int < 0 {
        return Err(LedgerError::negative_value(field));
    }
    // Larger than any balance can hold
    u64::try_from(int).map_err(|_| LedgerError::type_conversion(field))
}

impl PointsAdjustment {
    pub fn points_spent(&self) -> u64 {
        match self {
            PointsAdjustment::Spend(amount) => *amount,
            PointsAdjustment::Add(_) => 0,
        }
    }

    pub fn points_added(&self) -> u64 {
        match self {
            PointsAdjustment::Spend(_) => 0,
            PointsAdjustment::Add(amount) => *amount,
        }
    }

    /// Compute the balance after this adjustment
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance` if a spend exceeds `points`
    /// - `ArithmeticOverflow` if an add would overflow the balance
    pub fn apply_to(&self, account: AccountId, points: u64) -> Result<u64, LedgerError> {
        match *self {
            PointsAdjustment::Spend(amount) => points
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::insufficient_balance(account, points, amount)),
            PointsAdjustment::Add(amount) => points
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow(account, amount)),
        }
    }
}

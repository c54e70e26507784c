use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

/// Surrogate row id assigned by the store.
pub type AccountId = i64;

/// A named ledger account. `balance_cents` is kept equal to the sum of
/// `debit - credit` over the account's transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance_cents: Cents,
}

/// An account together with the date of its most recent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOverview {
    pub account: Account,
    pub last_activity: Option<NaiveDate>,
}

/// Validate an account name before it reaches the store.
/// Returns the name unchanged if it contains anything besides whitespace.
pub fn validate_account_name(name: &str) -> Option<&str> {
    if name.trim().is_empty() {
        None
    } else {
        Some(name)
    }
}

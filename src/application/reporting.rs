use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Account, AccountId, Transaction};

/// Selection for the journal report. Both date bounds are inclusive and
/// independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalFilter {
    pub account_ids: Vec<AccountId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl JournalFilter {
    pub fn new(account_ids: Vec<AccountId>) -> Self {
        Self {
            account_ids,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// An account and its transactions, ordered by date.
#[derive(Debug, Clone, Serialize)]
pub struct AccountDetail {
    pub account: Account,
    pub transactions: Vec<Transaction>,
}

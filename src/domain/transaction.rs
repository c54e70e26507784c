use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AccountId, Cents};

pub type TransactionId = i64;

/// Calendar date format accepted on input and used in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One debit-or-credit line on a single account.
/// Transactions are never updated; they disappear only with their account.
/// A row without an account reference is kept as an orphan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub account_id: Option<AccountId>,
    pub description: String,
    pub debit_cents: Cents,
    pub credit_cents: Cents,
}

/// A stored transaction joined with the name of its account, as it appears
/// in the journal report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    pub transaction: Transaction,
    pub account_name: String,
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub account_id: Option<AccountId>,
    pub description: String,
    pub debit_cents: Cents,
    pub credit_cents: Cents,
}

impl NewTransaction {
    /// Signed change applied to the account balance.
    pub fn balance_delta(&self) -> Cents {
        self.debit_cents - self.credit_cents
    }
}

/// Which column of the journal a line is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Debit => "Debit",
            Side::Credit => "Credit",
        }
    }

    /// Labels are matched exactly, including case.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Debit" => Some(Side::Debit),
            "Credit" => Some(Side::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    pub account_id: Option<AccountId>,
    pub side: Side,
    pub amount_cents: Cents,
    pub description: String,
}

impl EntryLine {
    pub fn new(
        account_id: impl Into<Option<AccountId>>,
        side: Side,
        amount_cents: Cents,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            side,
            amount_cents,
            description: description.into(),
        }
    }

    /// Expand the line into a transaction row on the given date.
    pub fn to_transaction(&self, date: NaiveDate) -> NewTransaction {
        let (debit_cents, credit_cents) = match self.side {
            Side::Debit => (self.amount_cents, 0),
            Side::Credit => (0, self.amount_cents),
        };
        NewTransaction {
            date,
            account_id: self.account_id,
            description: self.description.clone(),
            debit_cents,
            credit_cents,
        }
    }
}

/// A batch of lines sharing one date. Debits and credits are not required
/// to balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub lines: Vec<EntryLine>,
}

impl JournalEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: EntryLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn push(&mut self, line: EntryLine) {
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn transactions(&self) -> Vec<NewTransaction> {
        self.lines
            .iter()
            .map(|line| line.to_transaction(self.date))
            .collect()
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Format a date the way it is stored and reported.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

//! Multi-line journal entry routes.

use axum::{Json, Router, extract::State, response::Redirect, routing::get};
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{optional_account_ref, redirect_to_index};
use crate::application::AppError;
use crate::domain::{AccountId, EntryLine, JournalEntry, Side, parse_cents, parse_date};
use crate::http::AppState;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/journal_entry", get(journal_entry_form).post(submit_journal_entry))
}

#[derive(Debug, Serialize)]
pub struct AccountChoice {
    pub id: AccountId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct JournalEntryFormResponse {
    pub accounts: Vec<AccountChoice>,
}

/// Submitted journal entry. Each side is three parallel lists; lines are
/// paired up position by position and the shortest list decides the count.
#[derive(Debug, Default, Deserialize)]
pub struct JournalEntryForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub debit_account: Vec<String>,
    #[serde(default)]
    pub debit_amount: Vec<String>,
    #[serde(default)]
    pub debit_description: Vec<String>,
    #[serde(default)]
    pub credit_account: Vec<String>,
    #[serde(default)]
    pub credit_amount: Vec<String>,
    #[serde(default)]
    pub credit_description: Vec<String>,
}

impl JournalEntryForm {
    /// Build the journal entry. Lines whose amount does not parse are skipped;
    /// lines without a usable account are kept as orphans.
    pub fn into_entry(self) -> Result<JournalEntry, AppError> {
        let date = parse_date(&self.date).ok_or_else(AppError::invalid_date)?;
        let mut entry = JournalEntry::new(date);

        collect_lines(
            &mut entry,
            Side::Debit,
            &self.debit_account,
            &self.debit_amount,
            &self.debit_description,
        );
        collect_lines(
            &mut entry,
            Side::Credit,
            &self.credit_account,
            &self.credit_amount,
            &self.credit_description,
        );

        Ok(entry)
    }
}

fn collect_lines(
    entry: &mut JournalEntry,
    side: Side,
    accounts: &[String],
    amounts: &[String],
    descriptions: &[String],
) {
    for ((account, amount), description) in accounts.iter().zip(amounts).zip(descriptions) {
        let Ok(amount_cents) = parse_cents(amount) else {
            debug!(%side, %account, %amount, "Skipping line with unparseable amount");
            continue;
        };
        entry.push(EntryLine::new(
            optional_account_ref(account),
            side,
            amount_cents,
            description.as_str(),
        ));
    }
}

/// GET `/journal_entry` - Accounts available for the entry lines.
async fn journal_entry_form(
    State(state): State<AppState>,
) -> Result<Json<JournalEntryFormResponse>, AppError> {
    let accounts = state.ledger.list_accounts().await?;
    Ok(Json(JournalEntryFormResponse {
        accounts: accounts
            .into_iter()
            .map(|overview| AccountChoice {
                id: overview.account.id,
                name: overview.account.name,
            })
            .collect(),
    }))
}

/// POST `/journal_entry` - Record all lines of the entry atomically.
async fn submit_journal_entry(
    State(state): State<AppState>,
    Form(form): Form<JournalEntryForm>,
) -> Result<Redirect, AppError> {
    let entry = form.into_entry()?;
    state.ledger.record_journal_entry(&entry).await?;
    Ok(redirect_to_index())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_form_pairs_lines_and_skips_bad_amounts() {
        let form = JournalEntryForm {
            date: "2024-03-01".into(),
            debit_account: strings(&["1", "2"]),
            debit_amount: strings(&["100", "n/a"]),
            debit_description: strings(&["rent", "ignored"]),
            credit_account: strings(&["3", "4"]),
            credit_amount: strings(&["100"]),
            credit_description: strings(&["rent", "extra"]),
        };

        let entry = form.into_entry().unwrap();
        assert_eq!(
            entry.lines,
            vec![
                EntryLine::new(1, Side::Debit, 10000, "rent"),
                EntryLine::new(3, Side::Credit, 10000, "rent"),
            ]
        );
    }

    #[test]
    fn test_form_rejects_bad_date() {
        let form = JournalEntryForm {
            date: "03/01/2024".into(),
            ..Default::default()
        };
        assert!(matches!(form.into_entry(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_form_keeps_lines_without_account() {
        let form = JournalEntryForm {
            date: "2024-03-01".into(),
            debit_account: strings(&["", "cash"]),
            debit_amount: strings(&["5", "6"]),
            debit_description: strings(&["", ""]),
            ..Default::default()
        };

        let entry = form.into_entry().unwrap();
        assert_eq!(
            entry.lines,
            vec![
                EntryLine::new(None, Side::Debit, 500, ""),
                EntryLine::new(None, Side::Debit, 600, ""),
            ]
        );
    }
}

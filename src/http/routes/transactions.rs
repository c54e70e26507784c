//! Single transaction routes.

use axum::{Json, Router, extract::State, response::Redirect, routing::get};
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};

use super::{optional_account_ref, redirect_to_index};
use crate::application::AppError;
use crate::domain::{
    AccountId, EntryLine, NewTransaction, Side, format_cents, parse_amount, parse_date,
};
use crate::http::AppState;

/// Creates the single transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/add_transaction_page",
        get(add_transaction_form).post(add_transaction),
    )
}

#[derive(Debug, Serialize)]
pub struct AccountBalanceChoice {
    pub id: AccountId,
    pub name: String,
    pub balance: String,
}

#[derive(Debug, Serialize)]
pub struct AddTransactionFormResponse {
    pub accounts: Vec<AccountBalanceChoice>,
    pub categories: [&'static str; 2],
}

#[derive(Debug, Default, Deserialize)]
pub struct AddTransactionForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub account: String,
}

impl AddTransactionForm {
    /// Validate in order: date, amount, category. The account reference is
    /// taken as given; without one the row is stored as an orphan.
    pub fn into_transaction(self) -> Result<NewTransaction, AppError> {
        let date = parse_date(&self.date).ok_or_else(AppError::invalid_date)?;
        let amount_cents = parse_amount(&self.amount).map_err(|_| AppError::invalid_amount())?;
        let side = Side::from_label(&self.category).ok_or_else(AppError::invalid_category)?;
        let account_id = optional_account_ref(&self.account);

        Ok(EntryLine::new(account_id, side, amount_cents, self.description).to_transaction(date))
    }
}

/// GET `/add_transaction_page` - Accounts with balances and the category labels.
async fn add_transaction_form(
    State(state): State<AppState>,
) -> Result<Json<AddTransactionFormResponse>, AppError> {
    let accounts = state.ledger.list_accounts().await?;
    Ok(Json(AddTransactionFormResponse {
        accounts: accounts
            .into_iter()
            .map(|overview| AccountBalanceChoice {
                id: overview.account.id,
                name: overview.account.name,
                balance: format_cents(overview.account.balance_cents),
            })
            .collect(),
        categories: [Side::Debit.as_str(), Side::Credit.as_str()],
    }))
}

/// POST `/add_transaction_page` - Record one debit or credit.
async fn add_transaction(
    State(state): State<AppState>,
    Form(form): Form<AddTransactionForm>,
) -> Result<Redirect, AppError> {
    let transaction = form.into_transaction()?;
    state.ledger.record_transaction(transaction).await?;
    Ok(redirect_to_index())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(date: &str, amount: &str, category: &str, account: &str) -> AddTransactionForm {
        AddTransactionForm {
            date: date.into(),
            description: "coffee".into(),
            amount: amount.into(),
            category: category.into(),
            account: account.into(),
        }
    }

    #[test]
    fn test_credit_form_becomes_credit_row() {
        let t = form("2024-05-02", "3.50", "Credit", "4")
            .into_transaction()
            .unwrap();
        assert_eq!(t.account_id, Some(4));
        assert_eq!((t.debit_cents, t.credit_cents), (0, 350));
        assert_eq!(t.description, "coffee");
    }

    #[test]
    fn test_validation_messages() {
        let message = |f: AddTransactionForm| f.into_transaction().unwrap_err().public_message();

        assert_eq!(
            message(form("2024/05/02", "3", "Debit", "1")),
            "Invalid date format. Use YYYY-MM-DD."
        );
        assert_eq!(message(form("2024-05-02", "abc", "Debit", "1")), "Invalid amount.");
        assert_eq!(message(form("2024-05-02", "-3", "Debit", "1")), "Invalid amount.");
        assert_eq!(
            message(form("2024-05-02", "3", "Transfer", "1")),
            "Invalid transaction category."
        );
        assert_eq!(message(form("2024-05-02", "3.001", "Debit", "1")), "Invalid amount.");
    }

    #[test]
    fn test_missing_account_is_accepted() {
        let t = form("2024-05-02", "5", "Debit", "").into_transaction().unwrap();
        assert_eq!(t.account_id, None);
        assert_eq!(t.debit_cents, 500);
    }
}

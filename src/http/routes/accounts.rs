//! Account routes: list, summary, create, delete and detail.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::redirect_to_index;
use crate::application::{AccountDetail, AppError};
use crate::domain::{AccountId, AccountOverview, Transaction, format_cents, format_date};
use crate::http::AppState;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/home", get(summary))
        .route("/create_account", get(create_account_form).post(create_account))
        .route("/delete_account/{account_id}", post(delete_account))
        .route("/account/{account_id}", get(account_details))
}

/// One row of the accounts table.
#[derive(Debug, Serialize)]
pub struct AccountRow {
    pub id: AccountId,
    pub name: String,
    pub balance: String,
    pub last_activity: Option<String>,
}

impl From<AccountOverview> for AccountRow {
    fn from(overview: AccountOverview) -> Self {
        Self {
            id: overview.account.id,
            name: overview.account.name,
            balance: format_cents(overview.account.balance_cents),
            last_activity: overview.last_activity.map(format_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_accounts: i64,
    pub total_transactions: i64,
    pub total_balance: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub debit: String,
    pub credit: String,
}

impl From<Transaction> for TransactionRow {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            date: format_date(t.date),
            description: t.description,
            debit: format_cents(t.debit_cents),
            credit: format_cents(t.credit_cents),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountDetailResponse {
    pub id: AccountId,
    pub name: String,
    pub balance: String,
    pub transactions: Vec<TransactionRow>,
}

impl From<AccountDetail> for AccountDetailResponse {
    fn from(detail: AccountDetail) -> Self {
        Self {
            id: detail.account.id,
            name: detail.account.name,
            balance: format_cents(detail.account.balance_cents),
            transactions: detail.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountForm {
    #[serde(default)]
    pub name: String,
}

/// GET `/` - Accounts with balance and last activity date.
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<AccountRow>>, AppError> {
    let accounts = state.ledger.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// GET `/home` - Aggregate counts and total balance.
async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let stats = state.ledger.summary().await?;
    Ok(Json(SummaryResponse {
        total_accounts: stats.account_count,
        total_transactions: stats.transaction_count,
        total_balance: format_cents(stats.total_balance),
    }))
}

/// GET `/create_account` - Fields of the account form.
async fn create_account_form() -> Json<Value> {
    Json(json!({ "fields": ["name"] }))
}

/// POST `/create_account` - Create an account and go back to the list.
async fn create_account(
    State(state): State<AppState>,
    Form(form): Form<CreateAccountForm>,
) -> Result<Redirect, AppError> {
    state.ledger.create_account(&form.name).await?;
    Ok(redirect_to_index())
}

/// POST `/delete_account/{account_id}` - Delete an account and its transactions.
async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<Redirect, AppError> {
    state.ledger.delete_account(account_id).await?;
    Ok(redirect_to_index())
}

/// GET `/account/{account_id}` - Account with its transactions.
async fn account_details(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<AccountDetailResponse>, AppError> {
    let detail = state.ledger.get_account_detail(account_id).await?;
    Ok(Json(detail.into()))
}

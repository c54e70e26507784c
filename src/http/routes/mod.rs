//! Route definitions.

use axum::Router;
use axum::response::Redirect;
use tracing::debug;

use crate::application::AppError;
use crate::domain::AccountId;
use crate::http::AppState;

pub mod accounts;
pub mod journal;
pub mod reports;
pub mod transactions;

/// Creates the router with every ledger route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(journal::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
}

/// Redirect issued after every successful write.
pub(crate) fn redirect_to_index() -> Redirect {
    Redirect::to("/")
}

/// Parse an account id selected for a report. Existence is not checked.
pub(crate) fn parse_account_ref(input: &str) -> Result<AccountId, AppError> {
    input
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_account())
}

/// Account reference of a submitted transaction line. A blank or
/// non-numeric reference leaves the row without an account.
pub(crate) fn optional_account_ref(input: &str) -> Option<AccountId> {
    let input = input.trim();
    let parsed = input.parse().ok();
    if parsed.is_none() && !input.is_empty() {
        debug!(reference = %input, "Storing transaction without account");
    }
    parsed
}

/// Treat an empty or blank optional field as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

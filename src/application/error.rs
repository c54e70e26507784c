use thiserror::Error;

use crate::domain::AccountId;

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input: date, amount, category, report selection or name.
    #[error("{0}")]
    Validation(String),

    #[error("Account name already exists: {0}")]
    DuplicateName(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Database error: {0:#}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn invalid_date() -> Self {
        AppError::validation("Invalid date format. Use YYYY-MM-DD.")
    }

    pub fn invalid_amount() -> Self {
        AppError::validation("Invalid amount.")
    }

    pub fn invalid_category() -> Self {
        AppError::validation("Invalid transaction category.")
    }

    /// A report selection entry that is not an account id.
    pub fn invalid_account() -> Self {
        AppError::validation("Invalid account reference.")
    }

    pub fn balance_overflow() -> Self {
        AppError::validation("Amount exceeds the account balance limit.")
    }

    /// HTTP status code this error maps to.
    pub const fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::DuplicateName(_) => 400,
            AppError::AccountNotFound(_) => 404,
            AppError::Database(_) => 500,
        }
    }

    /// Message shown to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::DuplicateName(_) => "Account name already exists.".to_string(),
            AppError::AccountNotFound(_) => "Account not found.".to_string(),
            AppError::Database(err) => format!("An error occurred: {:#}", err),
        }
    }
}

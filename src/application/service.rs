use tracing::{debug, info};

use crate::domain::{
    Account, AccountId, AccountOverview, JournalEntry, JournalLine, NewTransaction, Transaction,
    TransactionId, validate_account_name,
};
use crate::storage::{LedgerStats, Repository, is_balance_overflow, is_unique_violation};

use super::{AccountDetail, AppError, JournalFilter};

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (HTTP, CLI).
#[derive(Clone)]
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database at the given path, creating the file and schema if
    /// needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Account operations
    // ========================

    /// Create a new account with a zero balance.
    pub async fn create_account(&self, name: &str) -> Result<AccountId, AppError> {
        let name = validate_account_name(name)
            .ok_or_else(|| AppError::validation("Account name cannot be empty."))?;

        if self.repo.get_account_by_name(name).await?.is_some() {
            return Err(AppError::DuplicateName(name.to_string()));
        }

        // The unique constraint still decides when two requests race past the check
        let id = self.repo.save_account(name).await.map_err(|err| {
            if is_unique_violation(&err) {
                AppError::DuplicateName(name.to_string())
            } else {
                AppError::Database(err)
            }
        })?;

        info!(account_id = id, account_name = name, "Account created");
        Ok(id)
    }

    /// Delete an account and its transactions. Unknown ids are accepted.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), AppError> {
        let removed = self.repo.delete_account(id).await?;
        info!(account_id = id, transactions_removed = removed, "Account deleted");
        Ok(())
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.repo
            .get_account(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Get an account together with its transactions.
    pub async fn get_account_detail(&self, id: AccountId) -> Result<AccountDetail, AppError> {
        let account = self.get_account(id).await?;
        let transactions = self.list_transactions(id).await?;
        Ok(AccountDetail {
            account,
            transactions,
        })
    }

    /// List all accounts with their last activity date.
    pub async fn list_accounts(&self) -> Result<Vec<AccountOverview>, AppError> {
        Ok(self.repo.list_accounts().await?)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record one transaction and apply it to the account balance.
    /// The account is not required to exist, or to be given at all.
    pub async fn record_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<TransactionId, AppError> {
        validate_amounts(&transaction)?;
        let id = self
            .repo
            .save_transaction(&transaction)
            .await
            .map_err(write_error)?;

        debug!(
            transaction_id = id,
            account_id = ?transaction.account_id,
            delta = transaction.balance_delta(),
            "Transaction recorded"
        );
        Ok(id)
    }

    /// Record every line of a journal entry as one atomic unit.
    /// Debits and credits are not required to balance.
    pub async fn record_journal_entry(
        &self,
        entry: &JournalEntry,
    ) -> Result<Vec<TransactionId>, AppError> {
        let transactions = entry.transactions();
        for transaction in &transactions {
            validate_amounts(transaction)?;
        }

        if transactions.is_empty() {
            debug!(date = %entry.date, "Journal entry has no lines");
            return Ok(Vec::new());
        }

        let ids = self
            .repo
            .save_transactions(&transactions)
            .await
            .map_err(write_error)?;
        info!(date = %entry.date, lines = ids.len(), "Journal entry recorded");
        Ok(ids)
    }

    /// List transactions for an account, oldest first.
    pub async fn list_transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions_for_account(account_id).await?)
    }

    // ========================
    // Reporting
    // ========================

    /// Count accounts and transactions and total all balances.
    pub async fn summary(&self) -> Result<LedgerStats, AppError> {
        Ok(self.repo.get_stats().await?)
    }

    /// Fetch the journal lines selected by the filter, ordered by date.
    pub async fn query_journal(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalLine>, AppError> {
        if filter.account_ids.is_empty() {
            return Err(AppError::validation("No accounts selected for the report."));
        }

        Ok(self
            .repo
            .query_journal(&filter.account_ids, filter.start_date, filter.end_date)
            .await?)
    }
}

fn validate_amounts(transaction: &NewTransaction) -> Result<(), AppError> {
    if transaction.debit_cents < 0 || transaction.credit_cents < 0 {
        return Err(AppError::invalid_amount());
    }
    Ok(())
}

fn write_error(err: anyhow::Error) -> AppError {
    if is_balance_overflow(&err) {
        AppError::balance_overflow()
    } else {
        AppError::Database(err)
    }
}

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::domain::{
    Account, AccountId, AccountOverview, Cents, DATE_FORMAT, JournalLine, NewTransaction,
    Transaction, TransactionId, format_date,
};

use super::MIGRATION_001_INITIAL;

/// Upper bound on pooled SQLite connections.
const MAX_CONNECTIONS: u32 = 5;

/// How long a writer waits for the database lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Aggregate counters over the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub account_count: i64,
    pub transaction_count: i64,
    pub total_balance: Cents,
}

/// A balance update that would leave the range of [`Cents`].
#[derive(Debug, thiserror::Error)]
#[error("Balance of account {account_id} would overflow")]
pub struct BalanceOverflow {
    pub account_id: AccountId,
}

/// Repository for persisting and querying accounts and transactions.
///
/// Every method acquires its connection (or database transaction) from the
/// pool for the duration of the call only.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL such as `sqlite:ledger.db?mode=rwc`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account with a zero balance and return its id.
    /// Fails with the underlying unique-constraint error on a duplicate name.
    pub async fn save_account(&self, name: &str) -> Result<AccountId> {
        let result = sqlx::query("INSERT INTO accounts (name, balance_cents) VALUES (?, 0)")
            .bind(name)
            .execute(&self.pool)
            .await
            .context("Failed to save account")?;
        Ok(result.last_insert_rowid())
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT id, name, balance_cents FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch account")?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    /// Get an account by name.
    pub async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT id, name, balance_cents FROM accounts WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch account by name")?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    /// List every account with its latest transaction date, in insertion order.
    pub async fn list_accounts(&self) -> Result<Vec<AccountOverview>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, a.balance_cents, MAX(t.date) AS last_activity
            FROM accounts a
            LEFT JOIN transactions t ON t.account_id = a.id
            GROUP BY a.id, a.name, a.balance_cents
            ORDER BY a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter()
            .map(|row| -> Result<AccountOverview> {
                let last_activity: Option<String> = row.get("last_activity");
                Ok(AccountOverview {
                    account: Self::row_to_account(row),
                    last_activity: last_activity
                        .map(|s| parse_stored_date(&s))
                        .transpose()?,
                })
            })
            .collect()
    }

    /// Delete an account and all its transactions in one database transaction.
    /// Returns the number of transactions removed. Unknown ids are a no-op.
    pub async fn delete_account(&self, id: AccountId) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin delete")?;

        let removed = sqlx::query("DELETE FROM transactions WHERE account_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete account transactions")?
            .rows_affected();

        sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete account")?;

        tx.commit().await.context("Failed to commit delete")?;
        Ok(removed)
    }

    fn row_to_account(row: &SqliteRow) -> Account {
        Account {
            id: row.get("id"),
            name: row.get("name"),
            balance_cents: row.get("balance_cents"),
        }
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a single transaction and apply it to the account balance atomically.
    pub async fn save_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        let ids = self.save_transactions(std::slice::from_ref(transaction)).await?;
        ids.into_iter()
            .next()
            .context("Transaction insert returned no id")
    }

    /// Save a batch of transactions in one database transaction.
    /// Either every row and balance update is committed, or none is.
    pub async fn save_transactions(
        &self,
        transactions: &[NewTransaction],
    ) -> Result<Vec<TransactionId>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let mut ids = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            ids.push(Self::insert_transaction(&mut *tx, transaction).await?);
        }

        tx.commit().await.context("Failed to commit transactions")?;
        Ok(ids)
    }

    /// Insert one row and bump the account balance on the given connection.
    /// The balance is incremented in SQL, never read-modified-written, and the
    /// update is refused when the result would leave the `i64` range.
    async fn insert_transaction(
        conn: &mut SqliteConnection,
        transaction: &NewTransaction,
    ) -> Result<TransactionId> {
        let id = sqlx::query(
            r#"
            INSERT INTO transactions (date, account_id, description, debit_cents, credit_cents)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(format_date(transaction.date))
        .bind(transaction.account_id)
        .bind(&transaction.description)
        .bind(transaction.debit_cents)
        .bind(transaction.credit_cents)
        .execute(&mut *conn)
        .await
        .context("Failed to save transaction")?
        .last_insert_rowid();

        let Some(account_id) = transaction.account_id else {
            return Ok(id);
        };

        let delta = transaction.balance_delta();
        let updated = sqlx::query(
            r#"
            UPDATE accounts SET balance_cents = balance_cents + ?
            WHERE id = ?
              AND CASE WHEN ? >= 0 THEN balance_cents <= ? - ? ELSE balance_cents >= ? - ? END
            "#,
        )
        .bind(delta)
        .bind(account_id)
        .bind(delta)
        .bind(Cents::MAX)
        .bind(delta)
        .bind(Cents::MIN)
        .bind(delta)
        .execute(&mut *conn)
        .await
        .context("Failed to update account balance")?
        .rows_affected();

        if updated == 0 {
            let exists = sqlx::query("SELECT 1 FROM accounts WHERE id = ?")
                .bind(account_id)
                .fetch_optional(&mut *conn)
                .await
                .context("Failed to check account")?
                .is_some();
            if exists {
                return Err(BalanceOverflow { account_id }.into());
            }
        }

        Ok(id)
    }

    /// List transactions for an account, ordered by date then insertion order.
    pub async fn list_transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, account_id, description, debit_cents, credit_cents
            FROM transactions
            WHERE account_id = ?
            ORDER BY date, id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions for account")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Query transactions of the given accounts joined with the account name,
    /// with optional inclusive date bounds, ordered by date then insertion order.
    pub async fn query_journal(
        &self,
        account_ids: &[AccountId],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<JournalLine>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; account_ids.len()].join(", ");
        let mut query = format!(
            "SELECT t.id, t.date, t.account_id, t.description, t.debit_cents, t.credit_cents, \
             a.name AS account_name \
             FROM transactions t \
             JOIN accounts a ON a.id = t.account_id \
             WHERE t.account_id IN ({})",
            placeholders
        );

        if start_date.is_some() {
            query.push_str(" AND t.date >= ?");
        }
        if end_date.is_some() {
            query.push_str(" AND t.date <= ?");
        }
        query.push_str(" ORDER BY t.date, t.id");

        let mut sql_query = sqlx::query(&query);
        for id in account_ids {
            sql_query = sql_query.bind(*id);
        }
        if let Some(start) = start_date {
            sql_query = sql_query.bind(format_date(start));
        }
        if let Some(end) = end_date {
            sql_query = sql_query.bind(format_date(end));
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to query journal")?;

        rows.iter()
            .map(|row| -> Result<JournalLine> {
                Ok(JournalLine {
                    transaction: Self::row_to_transaction(row)?,
                    account_name: row.get("account_name"),
                })
            })
            .collect()
    }

    /// Count accounts and transactions, and sum all balances.
    /// The total saturates at the `i64` bounds instead of failing.
    pub async fn get_stats(&self) -> Result<LedgerStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM accounts) AS account_count,
                (SELECT COUNT(*) FROM transactions) AS transaction_count
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute ledger stats")?;

        let total_balance = sqlx::query_scalar::<_, Cents>("SELECT balance_cents FROM accounts")
            .fetch(&self.pool)
            .try_fold(0, |total: Cents, balance| async move {
                Ok(total.saturating_add(balance))
            })
            .await
            .context("Failed to total account balances")?;

        Ok(LedgerStats {
            account_count: row.get("account_count"),
            transaction_count: row.get("transaction_count"),
            total_balance,
        })
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let date_str: String = row.get("date");

        Ok(Transaction {
            id: row.get("id"),
            date: parse_stored_date(&date_str)?,
            account_id: row.get("account_id"),
            description: row.get("description"),
            debit_cents: row.get("debit_cents"),
            credit_cents: row.get("credit_cents"),
        })
    }
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("Invalid stored date: {}", s))
}

/// True when the error chain carries a refused balance update.
pub fn is_balance_overflow(err: &anyhow::Error) -> bool {
    err.downcast_ref::<BalanceOverflow>().is_some()
}

/// True when the error chain carries a SQLite unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
    )
}

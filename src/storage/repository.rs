use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Budget, Cents, DATE_FORMAT, PasswordHash, Transaction, TransactionKind, User, UserId,
};

use super::MIGRATION_001_INITIAL;

/// Income and expense totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTotals {
    pub income: Cents,
    pub expense: Cents,
}

/// Repository for persisting and querying users, transactions and budgets.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create the schema if it does not exist yet. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        tracing::debug!("schema ready");
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user. Fails on a duplicate username; see [`is_unique_violation`].
    pub async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(user.password_hash.as_str())
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;
        Ok(())
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by username")?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(User {
            id: Uuid::parse_str(&id_str).context("Invalid user ID")?,
            username: row.get("username"),
            password_hash: PasswordHash::from_stored(row.get("password_hash")),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a new transaction.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, kind, category, amount_cents, date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.user_id.to_string())
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.amount_cents)
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    /// List a user's transactions in insertion order.
    pub async fn list_transactions_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, kind, category, amount_cents, date
            FROM transactions
            WHERE user_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Sum a user's income and expense amounts in one pass.
    pub async fn sum_by_kind_for_user(&self, user_id: UserId) -> Result<KindTotals> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE 0 END), 0) as income,
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_cents ELSE 0 END), 0) as expense
            FROM transactions
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum transactions by kind")?;

        Ok(KindTotals {
            income: row.get("income"),
            expense: row.get("expense"),
        })
    }

    /// Sum a user's expense amounts in one category.
    pub async fn sum_expenses_by_category(&self, user_id: UserId, category: &str) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0) as total
            FROM transactions
            WHERE user_id = ? AND category = ? AND kind = 'expense'
            "#,
        )
        .bind(user_id.to_string())
        .bind(category)
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum expenses by category")?;

        Ok(row.get("total"))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let user_id_str: String = row.get("user_id");
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            user_id: Uuid::parse_str(&user_id_str).context("Invalid user ID")?,
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            category: row.get("category"),
            amount_cents: row.get("amount_cents"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid transaction date: {}", date_str))?,
        })
    }

    // ========================
    // Budget operations
    // ========================

    /// Save a new budget. Existing budgets for the same category are left alone.
    pub async fn save_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, user_id, category, limit_cents, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(budget.id.to_string())
        .bind(budget.user_id.to_string())
        .bind(&budget.category)
        .bind(budget.limit_cents)
        .bind(budget.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save budget")?;
        Ok(())
    }

    /// List a user's budgets in insertion order.
    pub async fn list_budgets_for_user(&self, user_id: UserId) -> Result<Vec<Budget>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, category, limit_cents, created_at
            FROM budgets
            WHERE user_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list budgets")?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    fn row_to_budget(row: &sqlx::sqlite::SqliteRow) -> Result<Budget> {
        let id_str: String = row.get("id");
        let user_id_str: String = row.get("user_id");
        let created_at_str: String = row.get("created_at");

        Ok(Budget {
            id: Uuid::parse_str(&id_str).context("Invalid budget ID")?,
            user_id: Uuid::parse_str(&user_id_str).context("Invalid user ID")?,
            category: row.get("category"),
            limit_cents: row.get("limit_cents"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

/// Returns true if `err` wraps a SQLite UNIQUE constraint failure.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db_err| db_err.is_unique_violation())
}

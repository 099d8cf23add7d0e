// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use finman::application::FinanceManager;
use finman::domain::{TransactionKind, UserId};
use tempfile::TempDir;

/// Helper to create a manager over a temporary database
pub async fn test_app() -> Result<(FinanceManager, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let app = FinanceManager::open(db_path.to_str().unwrap()).await?;
    Ok((app, temp_dir))
}

/// Helper to build a date from a YYYY-MM-DD string
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Register a user and log in, returning the user id
pub async fn register_and_login(app: &FinanceManager, username: &str) -> Result<UserId> {
    app.accounts.register(username, "password").await?;
    Ok(app.accounts.login(username, "password").await?)
}

/// Record a transaction dated today
pub async fn record(
    app: &FinanceManager,
    user_id: UserId,
    kind: TransactionKind,
    category: &str,
    amount_cents: i64,
) -> Result<()> {
    app.ledger
        .add_transaction(user_id, kind, category.to_string(), amount_cents, None)
        .await?;
    Ok(())
}

mod common;

use anyhow::Result;
use clap::Parser;
use common::{date, test_app};
use finman::application::{AppError, BudgetCheck, FinanceManager, FinancialReport};
use finman::cli::{Cli, execute};
use finman::domain::{TransactionKind, today};

/// Parse `args` as if typed after `finman` and run the command, returning its output.
async fn run_cli(app: &FinanceManager, args: &[&str]) -> Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("finman").chain(args.iter().copied()))?;
    let command = cli.command.expect("test invocations always name a command");

    let mut output = Vec::new();
    execute(app, command, &mut output).await?;
    Ok(String::from_utf8(output)?)
}

const ALICE: [&str; 4] = ["-u", "alice", "--password", "secret"];

fn with_alice<'a>(args: &[&'a str]) -> Vec<&'a str> {
    args.iter().copied().chain(ALICE).collect()
}

#[tokio::test]
async fn test_register_then_record_entries() -> Result<()> {
    let (app, _temp) = test_app().await?;

    let output = run_cli(&app, &["register", "alice", "--password", "secret"]).await?;
    assert_eq!(output, "Registered user: alice\n");

    let output = run_cli(
        &app,
        &with_alice(&["income", "1000", "-c", "Salary", "--date", "2024-01-31"]),
    )
    .await?;
    assert!(output.starts_with("Income added: 1000.00 Salary on 2024-01-31"));

    // A negative amount is a value, not a flag
    let output = run_cli(&app, &with_alice(&["expense", "-12.50", "-c", "Refund"])).await?;
    assert!(output.starts_with("Expense added: -12.50 Refund"));

    let user_id = app.accounts.login("alice", "secret").await?;
    let transactions = app.ledger.list_transactions(user_id).await?;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].kind, TransactionKind::Income);
    assert_eq!(transactions[0].date, date("2024-01-31"));
    assert_eq!(transactions[1].amount_cents, -1250);

    Ok(())
}

#[tokio::test]
async fn test_blank_date_means_today() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;

    let before = today();
    run_cli(&app, &with_alice(&["expense", "5", "-c", "Food", "--date", ""])).await?;
    let after = today();

    let user_id = app.accounts.login("alice", "secret").await?;
    let stored = &app.ledger.list_transactions(user_id).await?[0];
    assert!(stored.date == before || stored.date == after);

    Ok(())
}

#[tokio::test]
async fn test_every_command_authenticates() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;

    let attempts: [&[&str]; 4] = [
        &["transactions", "-u", "alice", "--password", "wrong"],
        &["report", "-u", "alice", "--password", "wrong"],
        &["budget", "list", "-u", "nobody", "--password", "secret"],
        &["expense", "5", "-c", "Food", "-u", "alice", "--password", "wrong"],
    ];
    for args in attempts {
        let err = run_cli(&app, args).await.unwrap_err();
        assert!(
            matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidCredentials)),
            "unexpected error for {:?}: {}",
            args,
            err
        );
    }

    let user_id = app.accounts.login("alice", "secret").await?;
    assert!(app.ledger.list_transactions(user_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_malformed_amount_is_rejected() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;

    let err = run_cli(&app, &with_alice(&["income", "ten", "-c", "Salary"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::InvalidAmount { .. })
    ));

    let err = run_cli(&app, &with_alice(&["income", "10", "-c", "Salary", "--date", "31/01"]))
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidDate(_))));

    Ok(())
}

#[tokio::test]
async fn test_budget_set_and_list() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;

    let output = run_cli(&app, &with_alice(&["budget", "list"])).await?;
    assert_eq!(output, "No budgets found.\n");

    let output = run_cli(&app, &with_alice(&["budget", "set", "Food", "100"])).await?;
    assert_eq!(output, "Budget set: Food (100.00)\n");
    run_cli(&app, &with_alice(&["budget", "set", "Food", "150.5"])).await?;

    let output = run_cli(&app, &with_alice(&["budget", "list"])).await?;
    let rows: Vec<&str> = output.lines().filter(|l| l.starts_with("Food")).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("100.00"));
    assert!(rows[1].contains("150.50"));

    Ok(())
}

#[tokio::test]
async fn test_report_table_and_json() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;
    run_cli(&app, &with_alice(&["income", "1000", "-c", "Salary"])).await?;
    run_cli(&app, &with_alice(&["expense", "300", "-c", "Rent"])).await?;

    let table = run_cli(&app, &with_alice(&["report"])).await?;
    assert!(table.starts_with("Financial Report:"));
    assert!(table.contains("Savings:              700.00"));

    let json = run_cli(&app, &with_alice(&["report", "--format", "json"])).await?;
    let report: FinancialReport = serde_json::from_str(&json)?;
    assert_eq!(report.total_income, 100000);
    assert_eq!(report.total_expense, 30000);
    assert_eq!(report.savings, 70000);

    Ok(())
}

#[tokio::test]
async fn test_budget_check_table_and_json() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;
    run_cli(&app, &with_alice(&["budget", "set", "Food", "100"])).await?;
    run_cli(&app, &with_alice(&["budget", "set", "Rent", "800"])).await?;
    run_cli(&app, &with_alice(&["expense", "150", "-c", "Food"])).await?;

    let table = run_cli(&app, &with_alice(&["budget", "check"])).await?;
    assert!(table.contains("EXCEEDED"));
    assert!(table.contains("Warning: You have exceeded your budget for Food!"));
    assert!(!table.contains("budget for Rent"));

    let json = run_cli(&app, &with_alice(&["budget", "check", "--format", "json"])).await?;
    let checks: Vec<BudgetCheck> = serde_json::from_str(&json)?;
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].category, "Food");
    assert_eq!(checks[0].spent, 15000);
    assert!(checks[0].exceeded);
    assert_eq!(checks[1].category, "Rent");
    assert!(!checks[1].exceeded);

    Ok(())
}

#[tokio::test]
async fn test_transactions_listing() -> Result<()> {
    let (app, _temp) = test_app().await?;
    app.accounts.register("alice", "secret").await?;

    let output = run_cli(&app, &with_alice(&["transactions"])).await?;
    assert_eq!(output, "No transactions found.\n");

    run_cli(
        &app,
        &with_alice(&["expense", "42", "-c", "Books", "--date", "2024-05-01"]),
    )
    .await?;
    let output = run_cli(&app, &with_alice(&["transactions"])).await?;
    assert!(output.contains("2024-05-01"));
    assert!(output.contains("expense"));
    assert!(output.contains("42.00"));
    assert!(output.contains("Books"));

    Ok(())
}

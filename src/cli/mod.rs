mod menu;

pub use menu::Menu;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::{BudgetCheck, FinanceManager, FinancialReport, parse_amount, parse_date};
use crate::domain::{Budget, DATE_FORMAT, Transaction, TransactionKind, UserId, format_cents};

/// finman - Personal Finance Manager
#[derive(Parser)]
#[command(name = "finman")]
#[command(about = "Track income, expenses and per-category budgets")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(
        short,
        long,
        env = "FINMAN_DATABASE",
        default_value = "finance_manager.db"
    )]
    pub database: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and its tables
    Init,

    /// Start the interactive menu
    Menu,

    /// Register a new user
    Register {
        /// Username (must be unique)
        username: String,

        /// Password for the new user
        #[arg(long, env = "FINMAN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Record an income
    Income(EntryArgs),

    /// Record an expense
    Expense(EntryArgs),

    /// List your transactions
    Transactions {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Show total income, total expenses and savings
    Report {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        auth: Credentials,
    },

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Add a spending limit for a category
    Set {
        /// Category to track
        category: String,

        /// Limit (e.g., "400" or "400.00")
        #[arg(allow_hyphen_values = true)]
        limit: String,

        #[command(flatten)]
        auth: Credentials,
    },

    /// List budgets
    List {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Compare spending with every budget
    Check {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        auth: Credentials,
    },
}

#[derive(Args)]
pub struct EntryArgs {
    /// Amount (e.g., "50.00" or "50")
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Category (e.g., "Food", "Rent")
    #[arg(short, long)]
    pub category: String,

    /// Date of the transaction (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    #[command(flatten)]
    pub auth: Credentials,
}

#[derive(Args)]
pub struct Credentials {
    /// Username to act as
    #[arg(short, long)]
    pub user: String,

    /// Password for --user
    #[arg(long, env = "FINMAN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "finman=debug" } else { "finman=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let app = FinanceManager::open(&self.database)
            .await
            .with_context(|| format!("Failed to open database: {}", self.database))?;

        match self.command.unwrap_or(Commands::Menu) {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Menu => {
                let stdin = io::stdin();
                Menu::new(&app, stdin.lock(), io::stdout()).run().await?;
            }

            command => execute(&app, command, &mut io::stdout().lock()).await?,
        }

        Ok(())
    }
}

/// Run one scripted subcommand against `app`, writing its output to `out`.
///
/// Every command authenticates on its own; nothing is remembered between calls.
/// `Init` and `Menu` need no output of their own here and are no-ops.
pub async fn execute<W: Write>(app: &FinanceManager, command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Init | Commands::Menu => {}

        Commands::Register { username, password } => {
            let user = app.accounts.register(&username, &password).await?;
            writeln!(out, "Registered user: {}", user.username)?;
        }

        Commands::Income(args) => {
            record_entry(app, TransactionKind::Income, args, out).await?;
        }

        Commands::Expense(args) => {
            record_entry(app, TransactionKind::Expense, args, out).await?;
        }

        Commands::Transactions { auth } => {
            let user_id = authenticate(app, &auth).await?;
            let transactions = app.ledger.list_transactions(user_id).await?;
            write_transactions(out, &transactions)?;
        }

        Commands::Report { format, auth } => {
            let user_id = authenticate(app, &auth).await?;
            let report = app.ledger.generate_report(user_id).await?;
            match format {
                OutputFormat::Table => write_report(out, &report)?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
            }
        }

        Commands::Budget(budget_cmd) => {
            run_budget_command(app, budget_cmd, out).await?;
        }
    }

    Ok(())
}

async fn authenticate(app: &FinanceManager, auth: &Credentials) -> Result<UserId> {
    Ok(app.accounts.login(&auth.user, &auth.password).await?)
}

async fn record_entry<W: Write>(
    app: &FinanceManager,
    kind: TransactionKind,
    args: EntryArgs,
    out: &mut W,
) -> Result<()> {
    let user_id = authenticate(app, &args.auth).await?;
    let amount_cents = parse_amount(&args.amount)?;
    let date = args.date.as_deref().map(parse_date).transpose()?.flatten();

    let transaction = app
        .ledger
        .add_transaction(user_id, kind, args.category, amount_cents, date)
        .await?;

    writeln!(
        out,
        "{} added: {} {} on {} ({})",
        kind.label(),
        format_cents(transaction.amount_cents),
        transaction.category,
        transaction.date,
        transaction.id
    )?;
    Ok(())
}

async fn run_budget_command<W: Write>(
    app: &FinanceManager,
    cmd: BudgetCommands,
    out: &mut W,
) -> Result<()> {
    match cmd {
        BudgetCommands::Set {
            category,
            limit,
            auth,
        } => {
            let user_id = authenticate(app, &auth).await?;
            let limit_cents = parse_amount(&limit)?;
            let budget = app.ledger.set_budget(user_id, category, limit_cents).await?;
            writeln!(
                out,
                "Budget set: {} ({})",
                budget.category,
                format_cents(budget.limit_cents)
            )?;
        }

        BudgetCommands::List { auth } => {
            let user_id = authenticate(app, &auth).await?;
            let budgets = app.ledger.list_budgets(user_id).await?;
            write_budgets(out, &budgets)?;
        }

        BudgetCommands::Check { format, auth } => {
            let user_id = authenticate(app, &auth).await?;
            let checks = app.ledger.check_budgets(user_id).await?;
            match format {
                OutputFormat::Table => write_budget_checks(out, &checks)?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&checks)?)?,
            }
        }
    }

    Ok(())
}

fn write_transactions<W: Write>(out: &mut W, transactions: &[Transaction]) -> io::Result<()> {
    if transactions.is_empty() {
        return writeln!(out, "No transactions found.");
    }

    writeln!(out, "{:<12} {:<8} {:>12} CATEGORY", "DATE", "TYPE", "AMOUNT")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for transaction in transactions {
        writeln!(
            out,
            "{:<12} {:<8} {:>12} {}",
            transaction.date.format(DATE_FORMAT).to_string(),
            transaction.kind.as_str(),
            format_cents(transaction.amount_cents),
            truncate(&transaction.category, 30)
        )?;
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &FinancialReport) -> io::Result<()> {
    writeln!(out, "Financial Report:")?;
    writeln!(out, "  Total Income:   {:>12}", format_cents(report.total_income))?;
    writeln!(out, "  Total Expenses: {:>12}", format_cents(report.total_expense))?;
    writeln!(out, "  Savings:        {:>12}", format_cents(report.savings))
}

fn write_budgets<W: Write>(out: &mut W, budgets: &[Budget]) -> io::Result<()> {
    if budgets.is_empty() {
        return writeln!(out, "No budgets found.");
    }

    writeln!(out, "{:<20} {:>12} CREATED", "CATEGORY", "LIMIT")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for budget in budgets {
        writeln!(
            out,
            "{:<20} {:>12} {}",
            truncate(&budget.category, 20),
            format_cents(budget.limit_cents),
            budget.created_at.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

fn write_budget_checks<W: Write>(out: &mut W, checks: &[BudgetCheck]) -> io::Result<()> {
    if checks.is_empty() {
        return writeln!(out, "No budgets found.");
    }

    writeln!(
        out,
        "{:<20} {:>12} {:>12} STATUS",
        "CATEGORY", "LIMIT", "SPENT"
    )?;
    writeln!(out, "{}", "-".repeat(55))?;
    for check in checks {
        writeln!(
            out,
            "{:<20} {:>12} {:>12} {}",
            truncate(&check.category, 20),
            format_cents(check.limit),
            format_cents(check.spent),
            if check.exceeded { "EXCEEDED" } else { "OK" }
        )?;
    }

    for check in checks.iter().filter(|c| c.exceeded) {
        writeln!(
            out,
            "Warning: You have exceeded your budget for {}! (Spent: {}, Limit: {})",
            check.category,
            format_cents(check.spent),
            format_cents(check.limit)
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

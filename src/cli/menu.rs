use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::application::{AppError, FinanceManager, parse_amount, parse_date};
use crate::domain::{TransactionKind, UserId, format_cents};

use super::{write_budget_checks, write_report, write_transactions};

#[derive(Debug, Error)]
enum MenuError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("end of input")]
    Eof,
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented interactive session: register/login, then the per-user menu.
///
/// The logged-in user lives only on the stack of [`Menu::user_session`] and is
/// handed to every ledger call.
pub struct Menu<'a, R, W> {
    app: &'a FinanceManager,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(app: &'a FinanceManager, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Run until the operator exits or input ends.
    pub async fn run(mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Welcome to Personal Finance Manager!")?;

        loop {
            match self.main_menu().await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) | Err(MenuError::Eof) => break,
                Err(MenuError::App(e)) => writeln!(self.output, "Error: {}", e)?,
                Err(MenuError::Io(e)) => return Err(e.into()),
            }
        }

        self.output.flush()?;
        Ok(())
    }

    async fn main_menu(&mut self) -> Result<Flow, MenuError> {
        writeln!(self.output)?;
        writeln!(self.output, "Options:")?;
        writeln!(self.output, "1. Register")?;
        writeln!(self.output, "2. Login")?;
        writeln!(self.output, "3. Exit")?;

        match self.prompt("Choose an option: ")?.as_str() {
            "1" => {
                self.register().await?;
                Ok(Flow::Continue)
            }
            "2" => {
                let user_id = self.login().await?;
                self.user_session(user_id).await
            }
            "3" => {
                writeln!(self.output, "Goodbye!")?;
                Ok(Flow::Quit)
            }
            _ => {
                writeln!(self.output, "Invalid option. Try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn register(&mut self) -> Result<(), MenuError> {
        let username = self.prompt("Enter a unique username: ")?;
        let password = self.prompt("Enter a password: ")?;
        let app = self.app;
        app.accounts.register(&username, &password).await?;
        writeln!(self.output, "Registration successful!")?;
        Ok(())
    }

    async fn login(&mut self) -> Result<UserId, MenuError> {
        let username = self.prompt("Enter username: ")?;
        let password = self.prompt("Enter password: ")?;
        let app = self.app;
        let user_id = app.accounts.login(&username, &password).await?;
        writeln!(self.output, "Login successful!")?;
        Ok(user_id)
    }

    async fn user_session(&mut self, user_id: UserId) -> Result<Flow, MenuError> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "User Menu:")?;
            writeln!(self.output, "1. Add Income")?;
            writeln!(self.output, "2. Add Expense")?;
            writeln!(self.output, "3. View Transactions")?;
            writeln!(self.output, "4. Generate Report")?;
            writeln!(self.output, "5. Set Budget")?;
            writeln!(self.output, "6. Check Budget")?;
            writeln!(self.output, "7. Logout")?;

            let result = match self.prompt("Choose an option: ")?.as_str() {
                "1" => self.add_transaction(user_id, TransactionKind::Income).await,
                "2" => self.add_transaction(user_id, TransactionKind::Expense).await,
                "3" => self.view_transactions(user_id).await,
                "4" => self.generate_report(user_id).await,
                "5" => self.set_budget(user_id).await,
                "6" => self.check_budget(user_id).await,
                "7" => {
                    writeln!(self.output, "Logged out.")?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    writeln!(self.output, "Invalid option. Try again.")?;
                    Ok(())
                }
            };

            match result {
                Ok(()) => {}
                Err(MenuError::App(e)) => writeln!(self.output, "Error: {}", e)?,
                Err(other) => return Err(other),
            }
        }
    }

    async fn add_transaction(
        &mut self,
        user_id: UserId,
        kind: TransactionKind,
    ) -> Result<(), MenuError> {
        let category = self.prompt("Enter category (e.g., Food, Rent): ")?;
        let amount = parse_amount(&self.prompt("Enter amount: ")?)?;
        let date = self.prompt("Enter date (YYYY-MM-DD) or leave blank for today: ")?;
        let date = parse_date(&date)?;

        let app = self.app;
        app.ledger
            .add_transaction(user_id, kind, category, amount, date)
            .await?;
        writeln!(self.output, "{} added successfully!", kind.label())?;
        Ok(())
    }

    async fn view_transactions(&mut self, user_id: UserId) -> Result<(), MenuError> {
        let app = self.app;
        let transactions = app.ledger.list_transactions(user_id).await?;
        write_transactions(&mut self.output, &transactions)?;
        Ok(())
    }

    async fn generate_report(&mut self, user_id: UserId) -> Result<(), MenuError> {
        let app = self.app;
        let report = app.ledger.generate_report(user_id).await?;
        write_report(&mut self.output, &report)?;
        Ok(())
    }

    async fn set_budget(&mut self, user_id: UserId) -> Result<(), MenuError> {
        let category = self.prompt("Enter category for the budget: ")?;
        let limit = parse_amount(&self.prompt("Enter budget limit: ")?)?;

        let app = self.app;
        let budget = app.ledger.set_budget(user_id, category, limit).await?;
        writeln!(
            self.output,
            "Budget set successfully! ({}: {})",
            budget.category,
            format_cents(budget.limit_cents)
        )?;
        Ok(())
    }

    async fn check_budget(&mut self, user_id: UserId) -> Result<(), MenuError> {
        let app = self.app;
        let checks = app.ledger.check_budgets(user_id).await?;
        write_budget_checks(&mut self.output, &checks)?;
        Ok(())
    }

    /// Print `label`, read one line and return it trimmed.
    /// Bytes that are not valid UTF-8 become U+FFFD instead of ending the session.
    fn prompt(&mut self, label: &str) -> Result<String, MenuError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(MenuError::Eof);
        }
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }
}

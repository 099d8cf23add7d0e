use chrono::NaiveDate;

use crate::domain::{Budget, Cents, Transaction, TransactionKind, User, UserId};
use crate::storage::{Repository, is_unique_violation};

use super::{AppError, BudgetCheck, FinancialReport};

/// Both services over one database. This is the entry point for any client
/// (interactive menu, scripted CLI, tests).
pub struct FinanceManager {
    pub accounts: AccountService,
    pub ledger: LedgerService,
}

impl FinanceManager {
    pub fn new(repo: Repository) -> Self {
        Self {
            accounts: AccountService::new(repo.clone()),
            ledger: LedgerService::new(repo),
        }
    }

    /// Open (creating if needed) the database file at `database_path` and
    /// make sure the schema exists.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        tracing::debug!(database = database_path, "database opened");
        Ok(Self::new(repo))
    }
}

/// Registration and login.
pub struct AccountService {
    repo: Repository,
}

impl AccountService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Register a new user. The username is trimmed and must not be empty.
    /// The password is trimmed too, the same way [`AccountService::login`] does.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() {
            return Err(AppError::InvalidUsername(
                "username must not be empty".to_string(),
            ));
        }

        if self.repo.get_user_by_username(username).await?.is_some() {
            return Err(AppError::UsernameTaken(username.to_string()));
        }

        let user = User::new(username.to_string(), password);
        match self.repo.save_user(&user).await {
            Ok(()) => {}
            // Lost a race against another writer between the lookup and the insert
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::UsernameTaken(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, username, "user registered");
        Ok(user)
    }

    /// Authenticate and return the user's id.
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserId, AppError> {
        let username = username.trim();
        let password = password.trim();
        match self.repo.get_user_by_username(username).await? {
            Some(user) if user.verify_password(password) => {
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(user.id)
            }
            _ => {
                tracing::info!(username, "login failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}

/// Transactions, budgets and the reports over them. Every call is scoped to
/// an explicit user id.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record an income or expense. A `None` date means today.
    pub async fn add_transaction(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        category: String,
        amount_cents: Cents,
        date: Option<NaiveDate>,
    ) -> Result<Transaction, AppError> {
        let mut transaction = Transaction::new(user_id, kind, category, amount_cents);
        if let Some(date) = date {
            transaction = transaction.with_date(date);
        }

        self.repo.save_transaction(&transaction).await?;
        tracing::debug!(
            user_id = %user_id,
            transaction_id = %transaction.id,
            kind = %kind,
            amount_cents,
            "transaction recorded"
        );
        Ok(transaction)
    }

    /// List a user's transactions in the order they were recorded.
    pub async fn list_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions_for_user(user_id).await?)
    }

    /// Total income, total expense and their difference.
    pub async fn generate_report(&self, user_id: UserId) -> Result<FinancialReport, AppError> {
        let totals = self.repo.sum_by_kind_for_user(user_id).await?;
        FinancialReport::new(totals.income, totals.expense).ok_or_else(|| {
            AppError::AmountOverflow("savings do not fit in the supported range".to_string())
        })
    }

    // ========================
    // Budget operations
    // ========================

    /// Add a budget for a category. Earlier budgets for the same category are kept.
    pub async fn set_budget(
        &self,
        user_id: UserId,
        category: String,
        limit_cents: Cents,
    ) -> Result<Budget, AppError> {
        let budget = Budget::new(user_id, category, limit_cents);
        self.repo.save_budget(&budget).await?;
        tracing::debug!(user_id = %user_id, budget_id = %budget.id, "budget set");
        Ok(budget)
    }

    /// List a user's budgets in the order they were set.
    pub async fn list_budgets(&self, user_id: UserId) -> Result<Vec<Budget>, AppError> {
        Ok(self.repo.list_budgets_for_user(user_id).await?)
    }

    /// Compare expenses against every budget row, one entry per row.
    pub async fn check_budgets(&self, user_id: UserId) -> Result<Vec<BudgetCheck>, AppError> {
        let budgets = self.list_budgets(user_id).await?;
        let mut checks = Vec::with_capacity(budgets.len());

        for budget in budgets {
            let spent = self
                .repo
                .sum_expenses_by_category(user_id, &budget.category)
                .await?;
            let exceeded = budget.is_exceeded_by(spent);
            if exceeded {
                tracing::info!(
                    category = %budget.category,
                    spent,
                    limit = budget.limit_cents,
                    "budget exceeded"
                );
            }

            checks.push(BudgetCheck {
                budget_id: budget.id,
                category: budget.category,
                limit: budget.limit_cents,
                spent,
                exceeded,
            });
        }

        Ok(checks)
    }
}

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, UserId};

pub type TransactionId = Uuid;

/// Storage format for transaction dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, interest)
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// Capitalized label for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense entry owned by one user.
/// Transactions are append-only: nothing updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TransactionKind,
    /// Free-text grouping label (e.g., "Food", "Rent")
    pub category: String,
    /// Not sign-checked; zero and negative amounts are stored as given
    pub amount_cents: Cents,
    /// Calendar day the transaction happened
    pub date: NaiveDate,
}

impl Transaction {
    /// Create a transaction dated today (local time).
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        category: String,
        amount_cents: Cents,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            category,
            amount_cents,
            date: today(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// Current calendar date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

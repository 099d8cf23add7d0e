use serde::{Deserialize, Serialize};

use crate::domain::{BudgetId, Cents};

/// Lifetime income/expense totals for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub total_income: Cents,
    pub total_expense: Cents,
    /// total_income - total_expense
    pub savings: Cents,
}

impl FinancialReport {
    /// Returns `None` when the difference does not fit in [`Cents`].
    pub fn new(total_income: Cents, total_expense: Cents) -> Option<Self> {
        Some(Self {
            total_income,
            total_expense,
            savings: total_income.checked_sub(total_expense)?,
        })
    }
}

/// Spending against a single budget row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCheck {
    pub budget_id: BudgetId,
    pub category: String,
    pub limit: Cents,
    pub spent: Cents,
    pub exceeded: bool,
}

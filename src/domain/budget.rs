use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, UserId};

pub type BudgetId = Uuid;

/// A spending limit for one category.
///
/// Nothing prevents several budgets for the same (user, category) pair;
/// each row is evaluated on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category: String,
    pub limit_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(user_id: UserId, category: String, limit_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category,
            limit_cents,
            created_at: Utc::now(),
        }
    }

    /// Returns true when `spent` is strictly greater than the limit.
    pub fn is_exceeded_by(&self, spent: Cents) -> bool {
        spent > self.limit_cents
    }
}

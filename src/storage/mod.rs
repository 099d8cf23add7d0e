mod repository;

pub use repository::*;

/// SQL for the initial schema (users, transactions, budgets)
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

pub use application::{AccountService, AppError, FinanceManager, LedgerService};
pub use domain::*;
pub use storage::Repository;

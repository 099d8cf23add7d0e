use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// Deliberately says nothing about which half of the pair was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

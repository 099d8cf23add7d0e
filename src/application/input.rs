//! Parsing of raw operator input into typed values.
//!
//! Malformed amounts and dates become [`AppError`] values instead of aborting
//! the session.

use chrono::NaiveDate;

use crate::domain::{Cents, DATE_FORMAT, parse_cents};

use super::AppError;

/// Parse a money amount such as "12.50". Zero and negative values are accepted.
pub fn parse_amount(input: &str) -> Result<Cents, AppError> {
    parse_cents(input).map_err(|e| AppError::InvalidAmount {
        input: input.trim().to_string(),
        reason: e.to_string(),
    })
}

/// Parse an optional `YYYY-MM-DD` date. Blank input means "today" and yields `None`.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| AppError::InvalidDate(input.to_string()))
}

use std::fmt;

/// Amounts are stored as integer hundredths of the currency unit.
/// The tracker is currency-agnostic, so 1 unit = 100 cents regardless of what the unit is.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "-3" -> -300
///
/// Digits past the second decimal place are truncated. Sign is not
/// restricted here; callers decide whether negative amounts make sense.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::OutOfRange)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        // "5" means 50 cents
        1 => decimal_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        _ => decimal_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::OutOfRange)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::OutOfRange => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

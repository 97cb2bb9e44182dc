//! Conversion between human-entered decimal amounts and base units (wei)

use alloy_primitives::utils as eth_units;
use alloy_primitives::U256;
use thiserror::Error;

/// Number of decimals of the native currency
pub const ETHER_DECIMALS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a valid decimal amount")]
    Invalid(String),
    #[error("'{0}' has more than 18 decimal places")]
    TooManyDecimals(String),
    #[error("'{0}' does not fit in 256 bits")]
    Overflow(String),
}

/// Parse a decimal string such as "0.5" into base units (18 decimals).
///
/// Leading and trailing whitespace is ignored. Signs, exponents and more than
/// 18 fractional digits are rejected rather than rounded.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::Invalid(trimmed.to_string()));
    }

    if fraction.len() > ETHER_DECIMALS {
        return Err(UnitsError::TooManyDecimals(trimmed.to_string()));
    }

    // ".5" -> "0.5", "2." -> "2", "001.50" -> "1.50"
    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    };

    eth_units::parse_ether(&normalized).map_err(|_| UnitsError::Overflow(trimmed.to_string()))
}

/// Format base units as a decimal string, always keeping at least one fractional digit
/// ("1.0", "0.01").
pub fn format_ether(wei: U256) -> String {
    let formatted = eth_units::format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => match fraction.trim_end_matches('0') {
            "" => format!("{}.0", whole),
            fraction => format!("{}.{}", whole, fraction),
        },
        None => format!("{}.0", formatted),
    }
}

/// Base units divided by 10^18, as shown in transaction history
pub fn wei_to_display(wei: U256) -> f64 {
    format_ether(wei).parse().unwrap_or(0.0)
}

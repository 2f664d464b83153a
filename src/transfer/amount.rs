//! Transfer Amount Validation and Formatting
//!
//! Turns the raw text a user typed into the amount field into a canonical,
//! comma-grouped decimal string, or reports why it cannot be accepted.
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. empty input → [`ValidationError::AmountRequired`]
//! 2. malformed input → [`ValidationError::InvalidFormat`]
//! 3. zero or negative → [`ValidationError::NotPositive`]
//! 4. larger than the balance → [`ValidationError::ExceedsBalance`]
//!
//! An amount equal to the balance is accepted.

use std::sync::LazyLock;

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use regex::Regex;

use crate::error::{Error, ValidationError};

/// Maximum number of fraction digits kept when normalizing an amount
pub const MAX_AMOUNT_FRACTION_DIGITS: usize = 10;

/// Maximum number of fraction digits shown for a balance
pub const MAX_BALANCE_FRACTION_DIGITS: usize = 2;

/// Groups of 1-3 leading digits, then comma-separated groups of exactly 3,
/// with an optional decimal fraction (e.g. `1,000,000.90`).
static GROUPED_THOUSANDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(,\d{3})*(\.\d+)?$").expect("grouped thousands pattern is valid")
});

/// Validate a raw amount against the available balance.
///
/// On success returns the normalized amount (see [`normalize_amount`]).
pub fn validate_amount(raw: &str, balance: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::AmountRequired);
    }

    let value = parse_display_amount(raw).ok_or(ValidationError::InvalidFormat)?;

    // Amounts below the kept precision normalize to zero
    let normalized = format_grouped(value, MAX_AMOUNT_FRACTION_DIGITS);
    if value <= 0.0 || is_zero_amount(&normalized) {
        return Err(ValidationError::NotPositive);
    }

    if !within_balance(value, balance) {
        return Err(ValidationError::ExceedsBalance);
    }

    Ok(normalized)
}

fn is_zero_amount(normalized: &str) -> bool {
    normalized
        .chars()
        .all(|c| matches!(c, '0' | ',' | '.' | '-'))
}

/// Number of fraction digits in a grouped or plain decimal string
pub fn fraction_digits(amount: &str) -> usize {
    amount
        .trim()
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

/// Whether `amount` can be expressed exactly in a token with `decimals`
pub fn fits_decimals(amount: &str, decimals: u8) -> bool {
    fraction_digits(amount) <= usize::from(decimals)
}

/// Parse a display amount, enforcing the grouping syntax when commas are used.
///
/// Returns `None` when the string is not a well-formed finite number.
pub fn parse_display_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.contains(',') && !GROUPED_THOUSANDS.is_match(raw) {
        return None;
    }

    strip_grouping(raw)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Check an amount against a formatted balance string.
///
/// Equal amounts are allowed. A balance that cannot be read admits nothing.
pub fn within_balance(value: f64, balance: &str) -> bool {
    match strip_grouping(balance.trim()).parse::<f64>() {
        Ok(available) if available.is_finite() => value <= available,
        _ => false,
    }
}

/// Remove thousands separators
pub fn strip_grouping(value: &str) -> String {
    value.replace(',', "")
}

/// Re-format an already parsed amount into its canonical grouped form
pub fn normalize_amount(value: f64) -> String {
    format_grouped(value, MAX_AMOUNT_FRACTION_DIGITS)
}

/// Format a number with comma thousands separators and at most
/// `max_fraction_digits` fraction digits, dropping trailing zeros.
pub fn format_grouped(value: f64, max_fraction_digits: usize) -> String {
    // Display yields the shortest digits that round-trip.
    let shortest = value.abs().to_string();
    let (integer, fraction) = shortest
        .split_once('.')
        .unwrap_or((shortest.as_str(), ""));
    let (integer, fraction) = round_fraction(integer, fraction, max_fraction_digits);
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 1);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = grouped.chars().all(|c| c == '0' || c == ',') && fraction.is_empty();
    let sign = if value.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// Round a decimal digit string half-up to `max_digits` fraction digits
fn round_fraction(integer: &str, fraction: &str, max_digits: usize) -> (String, String) {
    if fraction.len() <= max_digits {
        return (integer.to_string(), fraction.to_string());
    }

    let round_up = fraction.as_bytes()[max_digits] >= b'5';
    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(max_digits))
        .collect();

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - max_digits;
    let text = String::from_utf8_lossy(&digits);
    (text[..split].to_string(), text[split..].to_string())
}

/// Convert a normalized display amount into token base units
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, Error> {
    let plain = strip_grouping(amount.trim());
    if !fits_decimals(&plain, decimals) {
        return Err(Error::InvalidAmount(format!(
            "{} has more than {} fraction digits",
            amount, decimals
        )));
    }
    parse_units(&plain, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| Error::InvalidAmount(format!("{} ({} decimals): {}", amount, decimals, e)))
}

/// Format a raw token balance for display, keeping at most two fraction digits.
///
/// Falls back to `"0"` when the raw value cannot be represented.
pub fn format_token_balance(raw: U256, decimals: u8) -> String {
    let Ok(units) = format_units(raw, decimals) else {
        return "0".to_string();
    };

    match units.parse::<f64>() {
        Ok(value) if value.is_finite() => format_grouped(value, MAX_BALANCE_FRACTION_DIGITS),
        _ => "0".to_string(),
    }
}

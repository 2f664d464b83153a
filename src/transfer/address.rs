//! Recipient address validation.
//!
//! Purely syntactic: a `0x` prefix followed by 40 hex digits. Mixed-case input
//! must carry a valid EIP-55 checksum.

use std::str::FromStr;

use alloy::primitives::Address;

use crate::error::ValidationError;

const ADDRESS_PREFIX: &str = "0x";
const ADDRESS_HEX_LEN: usize = 40;

/// Validate a recipient address typed by the user
pub fn validate_recipient(raw: &str) -> Result<Address, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::RecipientRequired);
    }

    let hex = raw
        .strip_prefix(ADDRESS_PREFIX)
        .ok_or(ValidationError::InvalidAddress)?;
    if hex.len() != ADDRESS_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidAddress);
    }

    let address = Address::from_str(raw).map_err(|_| ValidationError::InvalidAddress)?;

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != raw {
        return Err(ValidationError::InvalidAddress);
    }

    Ok(address)
}

/// Check whether a string is an acceptable recipient address
pub fn is_valid_address(raw: &str) -> bool {
    validate_recipient(raw).is_ok()
}

/// Shorten an address for review screens, e.g. `0x1234...5678`
pub fn abbreviate_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        address.to_string()
    } else {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    }
}

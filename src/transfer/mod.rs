//! Transfer workflow core
//!
//! Validation, the form and confirm components, and the wizard that threads
//! the transfer payload between them. Chain access goes through the traits in
//! [`collaborators`], so everything here can run against in-memory doubles.

pub mod address;
pub mod amount;
pub mod balance;
pub mod collaborators;
pub mod confirm;
pub mod form;
pub mod gas;
pub mod wizard;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use address::{abbreviate_address, validate_recipient};
pub use amount::{format_token_balance, validate_amount};
pub use balance::{BalanceCache, BalanceSnapshot};
pub use collaborators::{BalanceReader, GasOracle, TokenGateway, TokenMetadata, TransferSubmitter};
pub use confirm::{ConfirmOutcome, ConfirmStatus, Notification, TransferConfirm};
pub use form::{FormField, TransferForm};
pub use gas::GasEstimate;
pub use wizard::{CloseOutcome, TransferWizard, WizardState, WizardStep};

/// A validated transfer, passed from the form to the confirmation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    /// `0x`-prefixed recipient address
    pub recipient: String,
    /// Normalized, comma-grouped amount in display units
    pub amount: String,
}

impl TransferPayload {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }
}

/// Partially entered form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub recipient: Option<String>,
    pub amount: Option<String>,
}

impl From<TransferPayload> for FormData {
    fn from(payload: TransferPayload) -> Self {
        Self {
            recipient: Some(payload.recipient),
            amount: Some(payload.amount),
        }
    }
}

/// Chain-level transfer request derived from a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient: Address,
    /// Amount in token base units
    pub amount: U256,
}

impl TransferRequest {
    /// Convert a payload using the token's decimals
    pub fn from_payload(payload: &TransferPayload, decimals: u8) -> Result<Self, Error> {
        let recipient = validate_recipient(&payload.recipient)?;
        let amount = amount::to_base_units(&payload.amount, decimals)?;
        Ok(Self { recipient, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_from_payload() {
        let payload = TransferPayload::new("0x1234567890abcdef1234567890abcdef12345678", "1,000");
        let request = TransferRequest::from_payload(&payload, 18).unwrap();

        assert_eq!(
            request.amount,
            U256::from(1_000_000_000_000_000_000_000u128)
        );
        assert_eq!(
            request.recipient.to_string().to_lowercase(),
            payload.recipient
        );
    }

    #[test]
    fn test_transfer_request_rejects_bad_recipient() {
        let payload = TransferPayload::new("invalid_address", "1");
        assert!(matches!(
            TransferRequest::from_payload(&payload, 18),
            Err(Error::Validation(_))
        ));
    }
}

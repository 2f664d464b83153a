//! Transfer form state.
//!
//! Holds the two input fields, their field-scoped errors and the injected
//! balance/symbol. Errors are only computed on submit; editing a field clears
//! its own error and leaves the other one alone.

use tracing::debug;

use crate::error::ValidationError;
use crate::transfer::address::validate_recipient;
use crate::transfer::amount::{fits_decimals, validate_amount};
use crate::transfer::{FormData, TransferPayload};

/// Input fields of the transfer form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Recipient,
    Amount,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recipient => "Recipient Address",
            Self::Amount => "Amount",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Recipient => "0x...",
            Self::Amount => "0.00",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Recipient => Self::Amount,
            Self::Amount => Self::Recipient,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferForm {
    recipient: String,
    amount: String,
    recipient_error: Option<ValidationError>,
    amount_error: Option<ValidationError>,
    balance: String,
    symbol: String,
    /// Token decimals; amounts with more fraction digits are rejected
    decimals: Option<u8>,
}

impl TransferForm {
    /// Build a form, prefilled from `data` when returning from confirmation
    pub fn new(data: FormData, balance: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            recipient: data.recipient.unwrap_or_default(),
            amount: data.amount.unwrap_or_default(),
            recipient_error: None,
            amount_error: None,
            balance: balance.into(),
            symbol: symbol.into(),
            decimals: None,
        }
    }

    /// Reject amounts the token cannot represent exactly
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Recipient => &self.recipient,
            FormField::Amount => &self.amount,
        }
    }

    pub fn error(&self, field: FormField) -> Option<ValidationError> {
        match field {
            FormField::Recipient => self.recipient_error,
            FormField::Amount => self.amount_error,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.recipient_error.is_some() || self.amount_error.is_some()
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn set_recipient(&mut self, value: impl Into<String>) {
        self.recipient = value.into();
        self.recipient_error = None;
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
        self.amount_error = None;
    }

    pub fn set_value(&mut self, field: FormField, value: impl Into<String>) {
        match field {
            FormField::Recipient => self.set_recipient(value),
            FormField::Amount => self.set_amount(value),
        }
    }

    /// Replace the balance baseline, e.g. after a refresh
    pub fn set_balance(&mut self, balance: impl Into<String>) {
        self.balance = balance.into();
    }

    /// `You have: {balance} {symbol} available`
    pub fn available_label(&self) -> String {
        format!("You have: {} {} available", self.balance, self.symbol)
    }

    /// Validate both fields.
    ///
    /// Returns the payload only when both pass; otherwise records the
    /// field errors and returns `None`.
    pub fn submit(&mut self) -> Option<TransferPayload> {
        let recipient = validate_recipient(&self.recipient);
        let amount = validate_amount(&self.amount, &self.balance).and_then(|amount| {
            match self.decimals {
                Some(decimals) if !fits_decimals(&amount, decimals) => {
                    Err(ValidationError::InvalidFormat)
                }
                _ => Ok(amount),
            }
        });

        self.recipient_error = recipient.err();
        self.amount_error = amount.as_ref().err().copied();

        match amount {
            Ok(amount) if self.recipient_error.is_none() => {
                let payload = TransferPayload::new(self.recipient.trim(), amount);
                debug!(amount = %payload.amount, "Transfer form validated");
                Some(payload)
            }
            _ => {
                debug!(
                    recipient_error = ?self.recipient_error,
                    amount_error = ?self.amount_error,
                    "Transfer form rejected"
                );
                None
            }
        }
    }
}

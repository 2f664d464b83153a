pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod transfer;
pub mod wallet;

// TUI module - optional via "tui" feature
#[cfg(feature = "tui")]
pub mod tui;

pub use client::TokenClient;
pub use config::{Config, NetworkConstants, TransferNetworkConfig, WalletSource};
pub use error::{Error, ValidationError};
pub use logging::{init_logging, LogTarget};
pub use wallet::TransferWallet;

pub use transfer::{
    validate_amount, validate_recipient, ConfirmOutcome, FormData, TokenGateway, TransferConfirm,
    TransferForm, TransferPayload, TransferRequest, TransferWizard, WizardState, WizardStep,
};

// Re-export TUI entry point when feature is enabled
#[cfg(feature = "tui")]
pub use tui::run_tui;

// Re-export common alloy primitives
pub use alloy::primitives::{Address, TxHash, U256};

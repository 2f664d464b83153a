use thiserror::Error;

use crate::transfer::wizard::WizardStep;

/// SDK Error type
#[derive(Error, Debug)]
pub enum Error {
    /// RPC client error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction simulation error
    #[error("Transaction simulation error: {0}")]
    TxSimulation(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Tx(String),

    /// Wallet error
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Field validation failure
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A validated amount could not be converted to base units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A wizard transition was requested from a step that does not allow it
    #[error("Illegal wizard transition: cannot {action} from {from}")]
    IllegalTransition {
        from: WizardStep,
        action: &'static str,
    },

    /// A submission was requested while another one is still pending
    #[error("A transfer submission is already in flight")]
    SubmissionInFlight,

    /// A submission was requested after the transfer already succeeded
    #[error("Transfer has already been submitted")]
    AlreadySubmitted,

    /// A required collaborator was not provided to a component
    #[error("Missing required context: {0}")]
    MissingContext(&'static str),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Field-scoped validation failures, shown next to the offending input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recipient address is required")]
    RecipientRequired,

    #[error("Invalid Ethereum address")]
    InvalidAddress,

    #[error("Amount is required")]
    AmountRequired,

    #[error("Invalid amount")]
    InvalidFormat,

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Amount exceeds available balance")]
    ExceedsBalance,
}

//! Transfer Confirmation
//!
//! Review screen state for a validated payload. Tracks the submission status
//! (`Idle → Loading → Success`, or back to `Idle` on failure), the gas fee
//! estimate shown next to it, and the notification raised when a submission
//! fails. Failures are never surfaced inline; the user can retry from here
//! with the same payload.

use std::fmt;
use std::time::{Duration, Instant};

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::transfer::address::abbreviate_address;
use crate::transfer::collaborators::TransferSubmitter;
use crate::transfer::gas::{GasEstimate, GAS_PLACEHOLDER};
use crate::transfer::{TransferPayload, TransferRequest};

/// Default lifetime of a gas estimate before it is considered stale
pub const DEFAULT_GAS_ESTIMATE_TTL: Duration = Duration::from_secs(30);

/// Submission status of the confirm step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmStatus {
    #[default]
    Idle,
    Loading,
    Success,
}

impl fmt::Display for ConfirmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// Non-blocking message shown to the user out of band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Raised whenever a submission fails, whatever the cause
    pub fn transaction_incomplete() -> Self {
        Self::new(
            "Transaction incomplete.",
            "We couldn't complete the transaction at this time, please try again later.",
        )
    }
}

/// Result of resolving a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Accepted by the network; the wizard should advance to success
    Submitted(TxHash),
    /// Rejected or failed; status is back to idle
    Failed(Notification),
    /// Arrived while no submission was pending
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TransferConfirm {
    payload: TransferPayload,
    symbol: String,
    decimals: u8,
    status: ConfirmStatus,
    tx_hash: Option<TxHash>,
    gas: Option<GasEstimate>,
    gas_ttl: Duration,
}

impl TransferConfirm {
    pub fn new(payload: TransferPayload, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            payload,
            symbol: symbol.into(),
            decimals,
            status: ConfirmStatus::Idle,
            tx_hash: None,
            gas: None,
            gas_ttl: DEFAULT_GAS_ESTIMATE_TTL,
        }
    }

    pub fn with_gas_ttl(mut self, ttl: Duration) -> Self {
        self.gas_ttl = ttl;
        self
    }

    pub fn payload(&self) -> &TransferPayload {
        &self.payload
    }

    pub fn status(&self) -> ConfirmStatus {
        self.status
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        self.tx_hash
    }

    /// Chain request for the payload under review
    pub fn request(&self) -> Result<TransferRequest, Error> {
        TransferRequest::from_payload(&self.payload, self.decimals)
    }

    /// Confirm and back are both disabled while a submission is pending
    pub fn can_confirm(&self) -> bool {
        self.status == ConfirmStatus::Idle
    }

    pub fn can_go_back(&self) -> bool {
        self.status != ConfirmStatus::Loading
    }

    /// Move to `Loading`, refusing a second concurrent submission
    pub fn begin_submission(&mut self) -> Result<(), Error> {
        match self.status {
            ConfirmStatus::Idle => {
                debug!(recipient = %self.payload.recipient, amount = %self.payload.amount, "Submitting transfer");
                self.status = ConfirmStatus::Loading;
                Ok(())
            }
            ConfirmStatus::Loading => {
                warn!("Transfer submission already in flight");
                Err(Error::SubmissionInFlight)
            }
            ConfirmStatus::Success => {
                error!("Submission requested after the transfer succeeded");
                Err(Error::AlreadySubmitted)
            }
        }
    }

    /// Resolve the pending submission
    pub fn finish_submission(&mut self, result: Result<TxHash, Error>) -> ConfirmOutcome {
        if self.status != ConfirmStatus::Loading {
            warn!(status = %self.status, "Ignoring submission result with nothing pending");
            return ConfirmOutcome::Ignored;
        }

        match result {
            Ok(tx_hash) => {
                info!(%tx_hash, "Transfer submitted");
                self.status = ConfirmStatus::Success;
                self.tx_hash = Some(tx_hash);
                ConfirmOutcome::Submitted(tx_hash)
            }
            Err(e) => {
                error!(error = %e, "Transfer failed");
                self.status = ConfirmStatus::Idle;
                ConfirmOutcome::Failed(Notification::transaction_incomplete())
            }
        }
    }

    /// Submit through `submitter` and resolve the result in one call
    pub async fn confirm(
        &mut self,
        from: Address,
        submitter: &dyn TransferSubmitter,
    ) -> Result<ConfirmOutcome, Error> {
        self.begin_submission()?;

        let result = match self.request() {
            Ok(request) => submitter.submit_transfer(from, request).await,
            Err(e) => Err(e),
        };

        Ok(self.finish_submission(result))
    }

    pub fn set_gas_estimate(&mut self, estimate: GasEstimate) {
        self.gas = Some(estimate);
    }

    /// Drop the estimate, e.g. after a failed refresh
    pub fn clear_gas_estimate(&mut self) {
        self.gas = None;
    }

    pub fn gas_estimate(&self) -> Option<&GasEstimate> {
        self.gas.as_ref()
    }

    /// Fee text, or the placeholder when no fresh estimate is held
    pub fn gas_display(&self, now: Instant) -> String {
        match &self.gas {
            Some(estimate) if !estimate.is_stale(self.gas_ttl, now) => estimate.display_fee(),
            _ => GAS_PLACEHOLDER.to_string(),
        }
    }

    pub fn recipient_display(&self) -> String {
        abbreviate_address(&self.payload.recipient)
    }

    pub fn amount_display(&self) -> String {
        format!("{} {}", self.payload.amount, self.symbol)
    }
}

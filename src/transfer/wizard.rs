//! Transfer Wizard
//!
//! Three-step state machine coordinating the transfer flow:
//! FORM → CONFIRM → SUCCESS, with CONFIRM → FORM as the only way back.
//! The wizard owns the transfer payload and hands it from one step to the next.

use std::fmt;

use tracing::{debug, error};

use crate::error::Error;
use crate::transfer::{FormData, TransferPayload};

/// Discriminant of the active wizard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Form,
    Confirm,
    Success,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Form => "Transfer",
            Self::Confirm => "Confirm Transfer",
            Self::Success => "Transfer Complete",
        }
    }

    pub fn step_number(&self) -> (usize, usize) {
        let current = match self {
            Self::Form => 1,
            Self::Confirm => 2,
            Self::Success => 3,
        };
        (current, 3)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Form => "FORM",
            Self::Confirm => "CONFIRM",
            Self::Success => "SUCCESS",
        };
        f.write_str(name)
    }
}

/// The active wizard state together with the data it carries
#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    /// Form entry, possibly prefilled after navigating back
    Form { data: FormData },
    /// Review of a validated payload
    Confirm { data: TransferPayload },
    /// Transfer accepted by the network
    Success,
}

impl WizardState {
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Form { .. } => WizardStep::Form,
            Self::Confirm { .. } => WizardStep::Confirm,
            Self::Success => WizardStep::Success,
        }
    }
}

/// What the host should do once the wizard is dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOutcome {
    /// The step the wizard was on when closed
    pub closed_from: WizardStep,
    /// Whether the balance should be re-read
    pub refresh_balance: bool,
}

/// Transfer wizard state machine
#[derive(Debug, Clone, PartialEq)]
pub struct TransferWizard {
    state: WizardState,
}

impl Default for TransferWizard {
    fn default() -> Self {
        Self {
            state: WizardState::Form {
                data: FormData::default(),
            },
        }
    }
}

impl TransferWizard {
    /// Create a wizard on the form step with empty data
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step()
    }

    /// Payload under review, when on the confirm step
    pub fn payload(&self) -> Option<&TransferPayload> {
        match &self.state {
            WizardState::Confirm { data } => Some(data),
            _ => None,
        }
    }

    /// Advance from the form to the confirmation step.
    ///
    /// The payload is expected to have passed form validation already.
    pub fn submit_form(&mut self, payload: TransferPayload) -> Result<(), Error> {
        match self.state {
            WizardState::Form { .. } => {
                debug!(recipient = %payload.recipient, amount = %payload.amount, "Form submitted");
                self.state = WizardState::Confirm { data: payload };
                Ok(())
            }
            _ => Err(self.illegal("submit form")),
        }
    }

    /// Return to the form, keeping the entered values for editing
    pub fn back(&mut self) -> Result<(), Error> {
        match &self.state {
            WizardState::Confirm { data } => {
                debug!("Returning to transfer form");
                self.state = WizardState::Form {
                    data: FormData::from(data.clone()),
                };
                Ok(())
            }
            _ => Err(self.illegal("go back")),
        }
    }

    /// Record that the submission was accepted
    pub fn confirm_success(&mut self) -> Result<(), Error> {
        match self.state {
            WizardState::Confirm { .. } => {
                debug!("Transfer confirmed");
                self.state = WizardState::Success;
                Ok(())
            }
            _ => Err(self.illegal("confirm success")),
        }
    }

    /// Dismiss the wizard from any step
    pub fn close(self) -> CloseOutcome {
        let closed_from = self.step();
        debug!(step = %closed_from, "Closing transfer wizard");
        CloseOutcome {
            closed_from,
            refresh_balance: closed_from == WizardStep::Success,
        }
    }

    fn illegal(&self, action: &'static str) -> Error {
        let from = self.step();
        error!(%from, action, "Illegal wizard transition");
        Error::IllegalTransition { from, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> TransferPayload {
        TransferPayload::new("0x1234567890abcdef1234567890abcdef12345678", "50,000")
    }

    #[test]
    fn test_new_wizard_starts_on_empty_form() {
        let wizard = TransferWizard::new();
        assert_eq!(
            wizard.state(),
            &WizardState::Form {
                data: FormData::default()
            }
        );
        assert!(wizard.payload().is_none());
    }

    #[test]
    fn test_submit_form_stores_payload() {
        let mut wizard = TransferWizard::new();
        wizard.submit_form(payload()).unwrap();

        assert_eq!(wizard.step(), WizardStep::Confirm);
        assert_eq!(wizard.payload(), Some(&payload()));
    }

    #[test]
    fn test_back_preserves_entered_values() {
        let mut wizard = TransferWizard::new();
        wizard.submit_form(payload()).unwrap();
        wizard.back().unwrap();

        match wizard.state() {
            WizardState::Form { data } => {
                assert_eq!(data.recipient.as_deref(), Some(payload().recipient.as_str()));
                assert_eq!(data.amount.as_deref(), Some("50,000"));
            }
            other => panic!("expected form state, got {:?}", other),
        }
    }

    #[test]
    fn test_back_from_form_is_illegal() {
        let mut wizard = TransferWizard::new();
        let err = wizard.back().unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalTransition {
                from: WizardStep::Form,
                action: "go back"
            }
        ));
        assert_eq!(wizard.step(), WizardStep::Form);
    }

    #[test]
    fn test_illegal_transitions_leave_state_untouched() {
        let mut wizard = TransferWizard::new();
        assert!(wizard.confirm_success().is_err());

        wizard.submit_form(payload()).unwrap();
        assert!(wizard.submit_form(payload()).is_err());
        assert_eq!(wizard.step(), WizardStep::Confirm);

        wizard.confirm_success().unwrap();
        assert!(wizard.back().is_err());
        assert!(wizard.confirm_success().is_err());
        assert!(wizard.submit_form(payload()).is_err());
        assert_eq!(wizard.step(), WizardStep::Success);
    }

    #[test]
    fn test_close_requests_refresh_only_after_success() {
        let wizard = TransferWizard::new();
        assert!(!wizard.close().refresh_balance);

        let mut wizard = TransferWizard::new();
        wizard.submit_form(payload()).unwrap();
        assert!(!wizard.clone().close().refresh_balance);

        wizard.confirm_success().unwrap();
        let outcome = wizard.close();
        assert_eq!(outcome.closed_from, WizardStep::Success);
        assert!(outcome.refresh_balance);
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(WizardStep::Form.step_number(), (1, 3));
        assert_eq!(WizardStep::Success.step_number(), (3, 3));
        assert_eq!(WizardStep::Confirm.to_string(), "CONFIRM");
    }
}

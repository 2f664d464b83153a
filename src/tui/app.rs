//! Application State
//!
//! Hosts a single transfer wizard at a time. The wizard, form and confirm
//! state live in [`crate::transfer`]; this module wires key presses and
//! background results into them and keeps the balance fresh.

use std::sync::Arc;
use std::time::Instant;

use alloy::primitives::{Address, TxHash};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tui_input::{Input, InputRequest};

use crate::config::TransferNetworkConfig;
use crate::error::Error;
use crate::transfer::collaborators::TokenGateway;
use crate::transfer::{
    BalanceCache, BalanceSnapshot, ConfirmOutcome, FormData, FormField, Notification,
    TransferConfirm, TransferForm, TransferWizard, WizardState, WizardStep,
};
use crate::tui::events::{Event, TransferTasks};

/// Buttons on the confirm step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmButton {
    Back,
    #[default]
    Confirm,
}

impl ConfirmButton {
    pub fn toggle(self) -> Self {
        match self {
            Self::Back => Self::Confirm,
            Self::Confirm => Self::Back,
        }
    }
}

/// Resolved token metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
}

/// Per-step view state of the open wizard
#[derive(Debug, Clone)]
pub enum StepView {
    Form {
        form: TransferForm,
        focus: FormField,
        recipient_input: Input,
        amount_input: Input,
    },
    Confirm {
        confirm: TransferConfirm,
        focus: ConfirmButton,
    },
    Success {
        tx_hash: Option<TxHash>,
    },
}

/// An open wizard together with its view state
#[derive(Debug)]
pub struct ActiveWizard {
    /// Tags background results so stale ones can be dropped
    pub id: u64,
    pub wizard: TransferWizard,
    pub view: StepView,
    gas_refresh: Option<CancellationToken>,
}

impl ActiveWizard {
    fn stop_gas_refresh(&mut self) {
        if let Some(token) = self.gas_refresh.take() {
            token.cancel();
        }
    }
}

/// Application state
#[derive(Debug, Default)]
pub struct AppState {
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
    /// Out-of-band notification, e.g. a failed submission
    pub notification: Option<Notification>,
    pub token: Option<TokenInfo>,
    pub balance: BalanceCache,
    balance_in_flight: bool,
    balance_requested_at: Option<Instant>,
    pub wizard: Option<ActiveWizard>,
    next_wizard_id: u64,
}

pub struct App {
    /// Application state
    pub state: AppState,
    gateway: Arc<dyn TokenGateway>,
    account: Address,
    /// Configuration
    pub config: TransferNetworkConfig,
    tasks: TransferTasks,
}

impl App {
    pub fn new(
        gateway: Arc<dyn TokenGateway>,
        account: Address,
        config: TransferNetworkConfig,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let tasks = TransferTasks::new(Arc::clone(&gateway), event_sender);
        let state = AppState {
            balance: BalanceCache::new(config.timings.balance_stale_time()),
            ..Default::default()
        };

        Self {
            state,
            gateway,
            account,
            config,
            tasks,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn gateway(&self) -> &Arc<dyn TokenGateway> {
        &self.gateway
    }

    /// Kick off token metadata and balance reads
    pub fn start(&mut self) {
        self.tasks.load_token_info();
        self.request_balance();
    }

    pub fn set_status(&mut self, message: String) {
        self.state.status_message = Some(message);
    }

    pub fn set_error(&mut self, message: String) {
        error!(%message, "Application error");
        self.state.error_message = Some(message);
    }

    /// Clear error, status and notification
    pub fn clear_messages(&mut self) {
        self.state.error_message = None;
        self.state.status_message = None;
        self.state.notification = None;
    }

    pub fn wizard_step(&self) -> Option<WizardStep> {
        self.state.wizard.as_ref().map(|active| active.wizard.step())
    }

    fn request_balance(&mut self) {
        if !self.state.balance_in_flight {
            self.state.balance_in_flight = true;
            self.state.balance_requested_at = Some(Instant::now());
            self.tasks.refresh_balance(self.account);
        }
    }

    /// Periodic housekeeping between events
    pub fn tick(&mut self) {
        let now = Instant::now();
        let retry_after = self.config.timings.balance_stale_time();
        let throttled = self
            .state
            .balance_requested_at
            .is_some_and(|at| now.saturating_duration_since(at) < retry_after);
        if self.state.token.is_some() && !throttled && self.state.balance.needs_refresh(now) {
            self.request_balance();
        }
    }

    /// Handle an event, returning whether the app should quit
    pub fn handle_event(&mut self, event: Event) -> Result<bool, Error> {
        if event.is_background_result() {
            self.handle_background(event)?;
            return Ok(self.state.should_quit);
        }

        if event == Event::Quit {
            self.quit();
            return Ok(true);
        }

        match self.wizard_step() {
            None => self.handle_home_key(event)?,
            Some(WizardStep::Form) => self.handle_form_key(event)?,
            Some(WizardStep::Confirm) => self.handle_confirm_key(event)?,
            Some(WizardStep::Success) => {
                if matches!(event, Event::Enter | Event::Escape) {
                    self.close_wizard();
                }
            }
        }

        Ok(self.state.should_quit)
    }

    fn quit(&mut self) {
        if let Some(active) = self.state.wizard.as_mut() {
            active.stop_gas_refresh();
        }
        self.state.should_quit = true;
    }

    fn handle_home_key(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::Char('q') => self.quit(),
            Event::Char('t') | Event::Enter => self.open_wizard()?,
            Event::Char('r') | Event::Refresh => {
                self.state.balance.invalidate();
                self.request_balance();
                self.set_status("Refreshing balance...".to_string());
            }
            Event::Escape => self.clear_messages(),
            _ => {}
        }
        Ok(())
    }

    /// Open a new wizard on the form step
    pub fn open_wizard(&mut self) -> Result<(), Error> {
        let token = self
            .state
            .token
            .clone()
            .ok_or(Error::MissingContext("token metadata"))?;
        let balance = self
            .state
            .balance
            .formatted()
            .ok_or(Error::MissingContext("account balance"))?
            .to_string();

        self.state.next_wizard_id += 1;
        let id = self.state.next_wizard_id;
        let wizard = TransferWizard::new();
        let view = form_view(FormData::default(), balance, &token);

        debug!(wizard_id = id, "Opening transfer wizard");
        self.clear_messages();
        self.state.wizard = Some(ActiveWizard {
            id,
            wizard,
            view,
            gas_refresh: None,
        });
        Ok(())
    }

    fn handle_form_key(&mut self, event: Event) -> Result<(), Error> {
        let Some(active) = self.state.wizard.as_mut() else {
            return Ok(());
        };
        let StepView::Form {
            form,
            focus,
            recipient_input,
            amount_input,
        } = &mut active.view
        else {
            return Ok(());
        };

        let request = match event {
            Event::Escape => {
                self.close_wizard();
                return Ok(());
            }
            Event::Tab | Event::BackTab => {
                *focus = focus.next();
                return Ok(());
            }
            Event::Enter => {
                if let Some(payload) = form.submit() {
                    active.wizard.submit_form(payload)?;
                    self.enter_confirm()?;
                }
                return Ok(());
            }
            Event::Char(c) => InputRequest::InsertChar(c),
            Event::Backspace => InputRequest::DeletePrevChar,
            Event::Delete => InputRequest::DeleteNextChar,
            Event::Left => InputRequest::GoToPrevChar,
            Event::Right => InputRequest::GoToNextChar,
            Event::Home => InputRequest::GoToStart,
            Event::End => InputRequest::GoToEnd,
            _ => return Ok(()),
        };

        let input = match focus {
            FormField::Recipient => recipient_input,
            FormField::Amount => amount_input,
        };
        if let Some(change) = input.handle(request) {
            if change.value {
                form.set_value(*focus, input.value());
            }
        }
        Ok(())
    }

    /// Build the confirm view for the wizard's payload and start gas refreshes
    fn enter_confirm(&mut self) -> Result<(), Error> {
        let token = self
            .state
            .token
            .clone()
            .ok_or(Error::MissingContext("token metadata"))?;
        let Some(active) = self.state.wizard.as_mut() else {
            return Ok(());
        };
        let payload = active
            .wizard
            .payload()
            .cloned()
            .ok_or(Error::MissingContext("transfer payload"))?;

        let confirm = TransferConfirm::new(payload, token.symbol, token.decimals)
            .with_gas_ttl(self.config.timings.gas_estimate_ttl());

        match confirm.request() {
            Ok(request) => {
                let cancel = CancellationToken::new();
                self.tasks.spawn_gas_refresh(
                    active.id,
                    self.account,
                    request,
                    self.config.timings.gas_refresh_interval(),
                    cancel.clone(),
                );
                active.gas_refresh = Some(cancel);
            }
            Err(e) => warn!(error = %e, "Cannot estimate gas for payload"),
        }

        active.view = StepView::Confirm {
            confirm,
            focus: ConfirmButton::default(),
        };
        Ok(())
    }

    fn handle_confirm_key(&mut self, event: Event) -> Result<(), Error> {
        let focus = match self.state.wizard.as_mut().map(|active| &mut active.view) {
            Some(StepView::Confirm { focus, .. }) => focus,
            _ => return Ok(()),
        };

        match event {
            Event::Escape => self.close_wizard(),
            Event::Tab | Event::BackTab | Event::Left | Event::Right => {
                *focus = focus.toggle();
            }
            Event::Enter => {
                let button = *focus;
                match button {
                    ConfirmButton::Back => self.back_to_form()?,
                    ConfirmButton::Confirm => self.submit()?,
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn back_to_form(&mut self) -> Result<(), Error> {
        let balance = self.state.balance.formatted().map(str::to_string);
        let Some(active) = self.state.wizard.as_mut() else {
            return Ok(());
        };
        let StepView::Confirm { confirm, .. } = &active.view else {
            return Ok(());
        };
        if !confirm.can_go_back() {
            return Ok(());
        }
        let Some(token) = self.state.token.clone() else {
            return Err(Error::MissingContext("token metadata"));
        };
        let balance = balance.unwrap_or_else(|| "0".to_string());

        active.wizard.back()?;
        active.stop_gas_refresh();

        if let WizardState::Form { data } = active.wizard.state() {
            active.view = form_view(data.clone(), balance, &token);
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<(), Error> {
        let Some(active) = self.state.wizard.as_mut() else {
            return Ok(());
        };
        let StepView::Confirm { confirm, .. } = &mut active.view else {
            return Ok(());
        };

        match confirm.begin_submission() {
            Ok(()) => {}
            Err(Error::SubmissionInFlight | Error::AlreadySubmitted) => return Ok(()),
            Err(e) => return Err(e),
        }
        self.state.notification = None;

        match confirm.request() {
            Ok(request) => self.tasks.submit(active.id, self.account, request),
            Err(e) => {
                if let ConfirmOutcome::Failed(notification) = confirm.finish_submission(Err(e)) {
                    self.state.notification = Some(notification);
                }
            }
        }
        Ok(())
    }

    /// Dismiss the open wizard
    pub fn close_wizard(&mut self) {
        let Some(mut active) = self.state.wizard.take() else {
            return;
        };
        active.stop_gas_refresh();

        let outcome = active.wizard.close();
        info!(wizard_id = active.id, step = %outcome.closed_from, "Transfer wizard closed");
        if outcome.refresh_balance {
            self.state.balance.invalidate();
            self.request_balance();
        }
    }

    fn handle_background(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::TokenInfoLoaded(Ok((symbol, decimals))) => {
                debug!(%symbol, decimals, "Token metadata loaded");
                self.state.token = Some(TokenInfo { symbol, decimals });
                if self.state.balance.snapshot().is_none() {
                    self.request_balance();
                }
            }
            Event::TokenInfoLoaded(Err(e)) => {
                self.set_error(format!("Failed to load token metadata: {}", e));
            }
            Event::BalanceLoaded(result) => {
                self.state.balance_in_flight = false;
                match result {
                    Ok(raw) => self.store_balance(raw),
                    Err(e) => self.set_error(format!("Failed to load balance: {}", e)),
                }
            }
            Event::GasEstimated { wizard_id, result } => {
                if let Some(confirm) = self.confirm_for(wizard_id) {
                    match result {
                        Ok(estimate) => confirm.set_gas_estimate(estimate),
                        Err(_) => confirm.clear_gas_estimate(),
                    }
                }
            }
            Event::SubmissionFinished { wizard_id, result } => {
                self.finish_submission(wizard_id, result);
            }
            Event::AdvanceToSuccess { wizard_id } => {
                let auto_close = self.config.timings.success_auto_close();
                let Some(active) = self.active_for(wizard_id) else {
                    return Ok(());
                };
                let tx_hash = match &active.view {
                    StepView::Confirm { confirm, .. } => confirm.tx_hash(),
                    _ => None,
                };
                active.wizard.confirm_success()?;
                active.stop_gas_refresh();
                active.view = StepView::Success { tx_hash };
                self.tasks
                    .schedule(Event::AutoClose { wizard_id }, auto_close);
            }
            Event::AutoClose { wizard_id } => {
                if self.active_for(wizard_id).is_some() {
                    self.close_wizard();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish_submission(&mut self, wizard_id: u64, result: Result<TxHash, String>) {
        let advance_delay = self.config.timings.success_advance_delay();
        let Some(confirm) = self.confirm_for(wizard_id) else {
            debug!(wizard_id, "Ignoring submission result for a closed wizard");
            return;
        };

        match confirm.finish_submission(result.map_err(Error::Tx)) {
            ConfirmOutcome::Submitted(tx_hash) => {
                self.set_status(format!(
                    "[{}] Transfer submitted: {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    tx_hash
                ));
                self.tasks
                    .schedule(Event::AdvanceToSuccess { wizard_id }, advance_delay);
            }
            ConfirmOutcome::Failed(notification) => {
                self.state.notification = Some(notification);
            }
            ConfirmOutcome::Ignored => {}
        }
    }

    fn store_balance(&mut self, raw: alloy::primitives::U256) {
        let Some(decimals) = self.state.token.as_ref().map(|t| t.decimals) else {
            // Retried on the next tick once decimals are known
            return;
        };
        let snapshot = BalanceSnapshot::new(raw, decimals);
        let formatted = snapshot.formatted.clone();
        self.state.balance.store(snapshot);

        if let Some(ActiveWizard {
            view: StepView::Form { form, .. },
            ..
        }) = self.state.wizard.as_mut()
        {
            form.set_balance(formatted);
        }
    }

    fn active_for(&mut self, wizard_id: u64) -> Option<&mut ActiveWizard> {
        self.state
            .wizard
            .as_mut()
            .filter(|active| active.id == wizard_id)
    }

    fn confirm_for(&mut self, wizard_id: u64) -> Option<&mut TransferConfirm> {
        match self.active_for(wizard_id).map(|active| &mut active.view) {
            Some(StepView::Confirm { confirm, .. }) => Some(confirm),
            _ => None,
        }
    }
}

fn form_view(data: FormData, balance: String, token: &TokenInfo) -> StepView {
    let recipient_input = Input::default().with_value(data.recipient.clone().unwrap_or_default());
    let amount_input = Input::default().with_value(data.amount.clone().unwrap_or_default());
    StepView::Form {
        form: TransferForm::new(data, balance, token.symbol.as_str())
            .with_decimals(token.decimals),
        focus: FormField::Recipient,
        recipient_input,
        amount_input,
    }
}

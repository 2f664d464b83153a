//! Event Handling System
//!
//! Terminal input is polled on a background task and converted into
//! [`Event`]s. Chain work (balance reads, gas refreshes, submissions) runs on
//! spawned tasks that report back through the same channel, tagged with the
//! wizard they belong to.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::transfer::collaborators::TokenGateway;
use crate::transfer::{GasEstimate, TransferRequest};

/// Application events that can be handled
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Quit the application
    Quit,
    /// Move focus forward
    Tab,
    /// Move focus backward (Shift+Tab)
    BackTab,
    /// Enter/confirm action
    Enter,
    /// Escape/cancel action
    Escape,
    Left,
    Right,
    /// Character input
    Char(char),
    Backspace,
    Delete,
    Home,
    End,
    /// Refresh action (F5)
    Refresh,

    // === Async results ===
    /// Token symbol and decimals resolved
    TokenInfoLoaded(Result<(String, u8), String>),
    /// Raw balance read
    BalanceLoaded(Result<U256, String>),
    /// Gas estimate for an open confirm step
    GasEstimated {
        wizard_id: u64,
        result: Result<GasEstimate, String>,
    },
    /// Submission resolved
    SubmissionFinished {
        wizard_id: u64,
        result: Result<TxHash, String>,
    },
    /// Delay after a successful submission has elapsed
    AdvanceToSuccess { wizard_id: u64 },
    /// The success step's display time has elapsed
    AutoClose { wizard_id: u64 },
}

impl Event {
    /// Whether this event carries the result of background work
    pub fn is_background_result(&self) -> bool {
        matches!(
            self,
            Event::TokenInfoLoaded(_)
                | Event::BalanceLoaded(_)
                | Event::GasEstimated { .. }
                | Event::SubmissionFinished { .. }
                | Event::AdvanceToSuccess { .. }
                | Event::AutoClose { .. }
        )
    }
}

/// Event handler for processing terminal events
pub struct EventHandler {
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
    /// Sender for events raised by background tasks
    sender: mpsc::UnboundedSender<Event>,
    /// Handle for the background terminal event processing task
    _terminal_task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let event_sender = sender.clone();
        let terminal_task = tokio::spawn(async move {
            loop {
                // Poll for events with a timeout to avoid blocking
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    if let Ok(terminal_event) = event::read() {
                        if let Some(app_event) = Self::convert_terminal_event(terminal_event) {
                            if event_sender.send(app_event).is_err() {
                                break;
                            }
                        }
                    }
                }

                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        Self {
            receiver,
            sender,
            _terminal_task: terminal_task,
        }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Result<Event, Box<dyn std::error::Error + Send + Sync>> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| "Event channel closed".into())
    }

    /// Sender handed to background tasks
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    fn convert_terminal_event(terminal_event: event::Event) -> Option<Event> {
        match terminal_event {
            event::Event::Key(key_event) => convert_key_event(key_event),
            _ => None,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a key event to an application event
pub fn convert_key_event(key_event: KeyEvent) -> Option<Event> {
    match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Event::Quit),

        KeyEvent {
            code: KeyCode::Tab,
            modifiers: KeyModifiers::NONE,
            ..
        } => Some(Event::Tab),

        KeyEvent {
            code: KeyCode::BackTab,
            ..
        } => Some(Event::BackTab),

        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => Some(Event::Enter),

        KeyEvent {
            code: KeyCode::Esc,
            ..
        } => Some(Event::Escape),

        KeyEvent {
            code: KeyCode::Left,
            ..
        } => Some(Event::Left),

        KeyEvent {
            code: KeyCode::Right,
            ..
        } => Some(Event::Right),

        KeyEvent {
            code: KeyCode::Backspace,
            ..
        } => Some(Event::Backspace),

        KeyEvent {
            code: KeyCode::Delete,
            ..
        } => Some(Event::Delete),

        KeyEvent {
            code: KeyCode::Home,
            ..
        } => Some(Event::Home),

        KeyEvent {
            code: KeyCode::End,
            ..
        } => Some(Event::End),

        KeyEvent {
            code: KeyCode::F(5),
            ..
        } => Some(Event::Refresh),

        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        } => Some(Event::Char(c)),

        _ => None,
    }
}

/// Spawns chain work and reports results as events
#[derive(Clone)]
pub struct TransferTasks {
    gateway: Arc<dyn TokenGateway>,
    event_sender: mpsc::UnboundedSender<Event>,
}

impl TransferTasks {
    pub fn new(gateway: Arc<dyn TokenGateway>, event_sender: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            gateway,
            event_sender,
        }
    }

    fn send(sender: &mpsc::UnboundedSender<Event>, event: Event) {
        if sender.send(event).is_err() {
            debug!("Event channel closed, dropping background result");
        }
    }

    /// Resolve token symbol and decimals
    pub fn load_token_info(&self) {
        let gateway = Arc::clone(&self.gateway);
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let result = async {
                let symbol = gateway.token_symbol().await?;
                let decimals = gateway.token_decimals().await?;
                Ok::<_, crate::Error>((symbol, decimals))
            }
            .await
            .map_err(|e| e.to_string());
            Self::send(&sender, Event::TokenInfoLoaded(result));
        });
    }

    /// Read the account balance
    pub fn refresh_balance(&self, account: Address) {
        let gateway = Arc::clone(&self.gateway);
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let result = gateway.balance_of(account).await.map_err(|e| e.to_string());
            Self::send(&sender, Event::BalanceLoaded(result));
        });
    }

    /// Submit a transfer; the result is tagged with `wizard_id`
    pub fn submit(&self, wizard_id: u64, from: Address, request: TransferRequest) {
        let gateway = Arc::clone(&self.gateway);
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let result = gateway
                .submit_transfer(from, request)
                .await
                .map_err(|e| e.to_string());
            Self::send(&sender, Event::SubmissionFinished { wizard_id, result });
        });
    }

    /// Refresh the gas estimate every `interval` until `cancel` fires
    pub fn spawn_gas_refresh(
        &self,
        wizard_id: u64,
        from: Address,
        request: TransferRequest,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        let gateway = Arc::clone(&self.gateway);
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = async {
                    let (gas_units, gas_price) = futures::try_join!(
                        gateway.estimate_transfer_gas(from, request),
                        gateway.gas_price()
                    )?;
                    Ok::<_, crate::Error>(GasEstimate::new(gas_units, gas_price))
                }
                .await
                .map_err(|e| e.to_string());

                if let Err(e) = &result {
                    warn!(error = %e, "Gas estimate refresh failed");
                }
                if cancel.is_cancelled() {
                    break;
                }
                Self::send(&sender, Event::GasEstimated { wizard_id, result });
            }
            debug!(wizard_id, "Gas refresh stopped");
        });
    }

    /// Deliver `event` after `delay`
    pub fn schedule(&self, event: Event, delay: Duration) {
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::send(&sender, event);
        });
    }
}

#![cfg(feature = "tui")]

mod utils;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use token_transfer_sdk::config::{TokenConfig, TransferTimings};
use token_transfer_sdk::transfer::{ConfirmStatus, Notification, TokenGateway};
use token_transfer_sdk::tui::app::StepView;
use token_transfer_sdk::tui::{App, Event};
use token_transfer_sdk::{TransferNetworkConfig, WizardStep};
use utils::test_utils::{tokens, MockGateway, RECIPIENT, TEST_ACCOUNT_0, TOKEN};

fn test_config() -> TransferNetworkConfig {
    TransferNetworkConfig {
        network_name: "testnet".to_string(),
        chain_id: 31337,
        rpc_url: "http://127.0.0.1:8545".to_string(),
        token: TokenConfig {
            address: TOKEN.to_string(),
            symbol: None,
            decimals: None,
        },
        explorer_url: None,
        timings: TransferTimings {
            gas_refresh_ms: 20,
            success_advance_ms: 10,
            success_auto_close_ms: 10,
            ..Default::default()
        },
    }
}

fn start_app(gateway: Arc<MockGateway>) -> (App, UnboundedReceiver<Event>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let account: Address = TEST_ACCOUNT_0.parse().unwrap();
    let gateway: Arc<dyn TokenGateway> = gateway;
    let mut app = App::new(gateway, account, test_config(), sender);
    app.start();
    (app, receiver)
}

/// Feed background events into the app until `done` holds
async fn pump_until(
    app: &mut App,
    receiver: &mut UnboundedReceiver<Event>,
    done: impl Fn(&App) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(app) {
            let event = receiver.recv().await.expect("event channel closed");
            app.handle_event(event).unwrap();
        }
    })
    .await
    .expect("timed out waiting for app state");
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_event(Event::Char(c)).unwrap();
    }
}

fn confirm_status(app: &App) -> Option<ConfirmStatus> {
    match app.state.wizard.as_ref().map(|active| &active.view) {
        Some(StepView::Confirm { confirm, .. }) => Some(confirm.status()),
        _ => None,
    }
}

/// Open the wizard and fill the form up to the confirm step
async fn advance_to_confirm(app: &mut App, receiver: &mut UnboundedReceiver<Event>) {
    pump_until(app, receiver, |app| app.state.balance.formatted().is_some()).await;

    app.handle_event(Event::Char('t')).unwrap();
    assert_eq!(app.wizard_step(), Some(WizardStep::Form));

    type_text(app, RECIPIENT);
    app.handle_event(Event::Tab).unwrap();
    type_text(app, "50000");
    app.handle_event(Event::Enter).unwrap();
    assert_eq!(app.wizard_step(), Some(WizardStep::Confirm));
}

#[tokio::test]
async fn test_full_transfer_flow_closes_and_refreshes_balance() {
    let gateway = Arc::new(MockGateway::new("BIT", 18, tokens(100_000, 18)));
    let (mut app, mut receiver) = start_app(Arc::clone(&gateway));

    advance_to_confirm(&mut app, &mut receiver).await;

    pump_until(&mut app, &mut receiver, |app| {
        matches!(
            app.state.wizard.as_ref().map(|active| &active.view),
            Some(StepView::Confirm { confirm, .. }) if confirm.gas_estimate().is_some()
        )
    })
    .await;

    app.handle_event(Event::Enter).unwrap();
    assert_eq!(confirm_status(&app), Some(ConfirmStatus::Loading));

    pump_until(&mut app, &mut receiver, |app| {
        app.wizard_step() == Some(WizardStep::Success)
    })
    .await;
    assert_eq!(gateway.submissions().len(), 1);
    assert_eq!(gateway.submissions()[0].1.amount, tokens(50_000, 18));

    pump_until(&mut app, &mut receiver, |app| {
        app.state.wizard.is_none() && app.state.balance.formatted() == Some("50,000")
    })
    .await;
}

#[tokio::test]
async fn test_over_balance_amount_stays_on_form() {
    let gateway = Arc::new(MockGateway::new("BIT", 18, tokens(100, 18)));
    let (mut app, mut receiver) = start_app(gateway);
    pump_until(&mut app, &mut receiver, |app| app.state.balance.formatted().is_some()).await;

    app.handle_event(Event::Char('t')).unwrap();
    type_text(&mut app, RECIPIENT);
    app.handle_event(Event::Tab).unwrap();
    type_text(&mut app, "150");
    app.handle_event(Event::Enter).unwrap();

    assert_eq!(app.wizard_step(), Some(WizardStep::Form));
}

#[tokio::test]
async fn test_failed_submission_shows_notification() {
    let gateway = Arc::new(MockGateway::new("BIT", 18, tokens(100_000, 18)).failing());
    let (mut app, mut receiver) = start_app(gateway);

    advance_to_confirm(&mut app, &mut receiver).await;
    app.handle_event(Event::Enter).unwrap();

    pump_until(&mut app, &mut receiver, |app| app.state.notification.is_some()).await;
    assert_eq!(
        app.state.notification,
        Some(Notification::transaction_incomplete())
    );
    assert_eq!(app.wizard_step(), Some(WizardStep::Confirm));
    assert_eq!(confirm_status(&app), Some(ConfirmStatus::Idle));
}

#[tokio::test]
async fn test_result_after_close_is_ignored() {
    let gateway = Arc::new(MockGateway::new("BIT", 18, tokens(100_000, 18)).failing());
    let (mut app, mut receiver) = start_app(gateway);

    advance_to_confirm(&mut app, &mut receiver).await;
    app.handle_event(Event::Enter).unwrap();
    app.handle_event(Event::Escape).unwrap();
    assert!(app.state.wizard.is_none());

    let late = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = receiver.recv().await.expect("event channel closed");
            let is_submission = matches!(event, Event::SubmissionFinished { .. });
            app.handle_event(event).unwrap();
            if is_submission {
                break;
            }
        }
    })
    .await;
    assert!(late.is_ok());
    assert!(app.state.notification.is_none());
    assert!(app.state.wizard.is_none());
}

#[tokio::test]
async fn test_wizard_needs_loaded_balance() {
    let gateway = Arc::new(MockGateway::new("BIT", 18, tokens(1, 18)));
    let (sender, _receiver) = mpsc::unbounded_channel();
    let account: Address = TEST_ACCOUNT_0.parse().unwrap();
    let gateway: Arc<dyn TokenGateway> = gateway;
    let mut app = App::new(gateway, account, test_config(), sender);

    assert!(app.open_wizard().is_err());
    assert!(app.state.wizard.is_none());
}

#[cfg(test)]
mod ui_tests {
    use std::sync::Arc;

    use alloy::primitives::{Address, TxHash, B256, U256};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use crate::config::{TokenConfig, TransferNetworkConfig, TransferTimings};
    use crate::error::Error;
    use crate::transfer::collaborators::{
        BalanceReader, GasOracle, TokenGateway, TokenMetadata, TransferSubmitter,
    };
    use crate::transfer::{TransferRequest, WizardStep};
    use crate::tui::app::App;
    use crate::tui::events::Event;
    use crate::tui::ui::render_ui;

    const RECIPIENT: &str = "0x1234567890abcdef1234567890abcdef12345678";

    /// Gateway whose background results are never pumped into the app
    struct QuietGateway;

    #[async_trait::async_trait]
    impl TransferSubmitter for QuietGateway {
        async fn submit_transfer(
            &self,
            _from: Address,
            _request: TransferRequest,
        ) -> Result<TxHash, Error> {
            Ok(B256::repeat_byte(0xab))
        }
    }

    #[async_trait::async_trait]
    impl GasOracle for QuietGateway {
        async fn estimate_transfer_gas(
            &self,
            _from: Address,
            _request: TransferRequest,
        ) -> Result<u64, Error> {
            Err(Error::Rpc("unavailable".to_string()))
        }

        async fn gas_price(&self) -> Result<u128, Error> {
            Err(Error::Rpc("unavailable".to_string()))
        }
    }

    #[async_trait::async_trait]
    impl BalanceReader for QuietGateway {
        async fn balance_of(&self, _account: Address) -> Result<U256, Error> {
            Ok(U256::ZERO)
        }
    }

    #[async_trait::async_trait]
    impl TokenMetadata for QuietGateway {
        async fn token_symbol(&self) -> Result<String, Error> {
            Ok("BIT".to_string())
        }

        async fn token_decimals(&self) -> Result<u8, Error> {
            Ok(18)
        }
    }

    fn test_config() -> TransferNetworkConfig {
        TransferNetworkConfig {
            network_name: "testnet".to_string(),
            chain_id: 31337,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            token: TokenConfig {
                address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
                symbol: None,
                decimals: None,
            },
            explorer_url: Some("https://explorer.example/".to_string()),
            timings: TransferTimings::default(),
        }
    }

    /// App with token metadata and balance loaded. The receiver must stay alive.
    fn loaded_app(decimals: u8, balance: U256) -> (App, UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let gateway: Arc<dyn TokenGateway> = Arc::new(QuietGateway);
        let mut app = App::new(gateway, Address::ZERO, test_config(), sender);

        app.handle_event(Event::TokenInfoLoaded(Ok(("BIT".to_string(), decimals))))
            .unwrap();
        app.handle_event(Event::BalanceLoaded(Ok(balance))).unwrap();
        (app, receiver)
    }

    fn whole_tokens(amount: u64, decimals: u8) -> U256 {
        U256::from(amount) * U256::from(10u64).pow(U256::from(decimals))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(Event::Char(c)).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| {
                render_ui(frame, app).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn wizard_id(app: &App) -> u64 {
        app.state.wizard.as_ref().unwrap().id
    }

    #[tokio::test]
    async fn test_render_overview_balance() {
        let (app, _receiver) = loaded_app(18, whole_tokens(100_000, 18));

        let screen = render(&app);
        assert!(screen.contains("Token Transfer"));
        assert!(screen.contains("Network: testnet"));
        assert!(screen.contains("100,000 BIT"));
    }

    #[tokio::test]
    async fn test_render_form_shows_available_balance() {
        let (mut app, _receiver) = loaded_app(18, whole_tokens(100_000, 18));
        app.open_wizard().unwrap();

        let screen = render(&app);
        assert!(screen.contains("You have: 100,000 BIT available"));
    }

    #[tokio::test]
    async fn test_render_form_amount_error_for_extra_decimals() {
        let (mut app, _receiver) = loaded_app(6, whole_tokens(100, 6));
        app.open_wizard().unwrap();

        type_text(&mut app, RECIPIENT);
        app.handle_event(Event::Tab).unwrap();
        type_text(&mut app, "1.1234567");
        app.handle_event(Event::Enter).unwrap();

        assert_eq!(app.wizard_step(), Some(WizardStep::Form));
        let screen = render(&app);
        assert!(screen.contains("You have: 100 BIT available"));
        assert!(screen.contains("Invalid amount"));
    }

    #[tokio::test]
    async fn test_render_confirm_failure_and_success() {
        let (mut app, _receiver) = loaded_app(18, whole_tokens(100_000, 18));
        app.open_wizard().unwrap();
        type_text(&mut app, RECIPIENT);
        app.handle_event(Event::Tab).unwrap();
        type_text(&mut app, "50000");
        app.handle_event(Event::Enter).unwrap();
        assert_eq!(app.wizard_step(), Some(WizardStep::Confirm));

        let screen = render(&app);
        assert!(screen.contains("Estimated Gas Fee: Estimating..."));
        assert!(screen.contains("Amount: 50,000 BIT"));
        assert!(screen.contains("[ Confirm ]"));

        let id = wizard_id(&app);
        app.handle_event(Event::Enter).unwrap();
        assert!(render(&app).contains("[ Submitting... ]"));

        app.handle_event(Event::SubmissionFinished {
            wizard_id: id,
            result: Err("execution reverted".to_string()),
        })
        .unwrap();
        let screen = render(&app);
        assert!(screen.contains("Transaction incomplete."));
        assert!(screen.contains("[ Confirm ]"));

        let tx_hash = B256::repeat_byte(0xab);
        app.handle_event(Event::Enter).unwrap();
        app.handle_event(Event::SubmissionFinished {
            wizard_id: id,
            result: Ok(tx_hash),
        })
        .unwrap();
        app.handle_event(Event::AdvanceToSuccess { wizard_id: id })
            .unwrap();
        assert_eq!(app.wizard_step(), Some(WizardStep::Success));

        let screen = render(&app);
        assert!(screen.contains("Transfer submitted successfully"));
        assert!(screen.contains(&format!("Transaction: {}", tx_hash)));
        assert!(!screen.contains("Transaction incomplete."));
    }

    #[tokio::test]
    async fn test_render_small_terminal_warning() {
        let (app, _receiver) = loaded_app(18, U256::ZERO);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| render_ui(frame, &app).unwrap()).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Terminal"));
        assert!(screen.contains("too small"));
    }
}

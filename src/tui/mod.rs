//! Token Transfer TUI Module
//!
//! Terminal host for the transfer wizard: shows the account balance and runs
//! the form, confirm and success steps against a [`TokenGateway`].

pub mod app;
pub mod events;
pub mod ui;

pub use app::{App, AppState};
pub use events::{Event, EventHandler, TransferTasks};
pub use ui::render_ui;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::config::TransferNetworkConfig;
use crate::error::Error;
use crate::transfer::TokenGateway;

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

const MIN_TERMINAL_WIDTH: u16 = 60;
const MIN_TERMINAL_HEIGHT: u16 = 20;

/// Global flag to track if terminal cleanup is needed
static TERMINAL_NEEDS_CLEANUP: AtomicBool = AtomicBool::new(false);

/// Initialize the terminal for TUI mode
///
/// Enters the alternate screen and raw mode, and records that cleanup will be
/// needed.
pub fn init_terminal() -> Result<TuiTerminal, Error> {
    enable_raw_mode().map_err(Error::Io)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(Error::Io)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(Error::Io)?;
    terminal.hide_cursor().map_err(Error::Io)?;

    TERMINAL_NEEDS_CLEANUP.store(true, Ordering::SeqCst);

    Ok(terminal)
}

/// Restore the terminal to normal mode. Safe to call more than once.
pub fn restore_terminal(terminal: &mut TuiTerminal) -> Result<(), Error> {
    if TERMINAL_NEEDS_CLEANUP.load(Ordering::SeqCst) {
        disable_raw_mode().map_err(Error::Io)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(Error::Io)?;
        terminal.show_cursor().map_err(Error::Io)?;

        TERMINAL_NEEDS_CLEANUP.store(false, Ordering::SeqCst);
    }
    Ok(())
}

/// Best-effort restoration used from the panic hook
fn emergency_terminal_cleanup() {
    if TERMINAL_NEEDS_CLEANUP.load(Ordering::SeqCst) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = execute!(io::stdout(), cursor::Show);
        TERMINAL_NEEDS_CLEANUP.store(false, Ordering::SeqCst);
    }
}

/// Restore the terminal before the default panic output is printed
pub fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        emergency_terminal_cleanup();
        original_hook(panic_info);
    }));
}

/// Run the transfer TUI until the user quits
///
/// # Arguments
/// * `gateway` - Token reads, gas estimates and submissions
/// * `account` - Sending account, shown in the header and used for balance reads
/// * `config` - Network configuration and flow timings
pub async fn run_tui(
    gateway: Arc<dyn TokenGateway>,
    account: Address,
    config: TransferNetworkConfig,
) -> Result<(), Error> {
    setup_panic_handler();

    let mut terminal = init_terminal().map_err(|e| {
        emergency_terminal_cleanup();
        e
    })?;

    let mut event_handler = EventHandler::new();
    let mut app = App::new(gateway, account, config, event_handler.sender());
    info!(account = %account, network = %app.config.network_name, "Starting transfer TUI");
    app.start();
    app.set_status("Press 't' to transfer, 'q' to quit".to_string());

    let app_result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Restore even when the loop failed; the loop error takes precedence
    if let Err(restore_error) = restore_terminal(&mut terminal) {
        if app_result.is_ok() {
            return Err(restore_error);
        }
        eprintln!("Warning: Failed to restore terminal: {}", restore_error);
    }

    app_result
}

async fn run_app_loop(
    terminal: &mut TuiTerminal,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<(), Error> {
    loop {
        let mut render_error = None;
        terminal
            .draw(|frame| {
                if let Err(e) = render_ui(frame, app) {
                    render_error = Some(e);
                }
            })
            .map_err(Error::Io)?;
        if let Some(e) = render_error {
            app.set_error(format!("Render error: {}", e));
        }

        match tokio::time::timeout(Duration::from_millis(100), event_handler.next()).await {
            Ok(Ok(event)) => match app.handle_event(event) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => app.set_error(e.to_string()),
            },
            Ok(Err(e)) => {
                app.set_error(format!("Event error: {}", e));
            }
            Err(_) => app.tick(),
        }

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Verify the terminal is large enough before entering raw mode
pub fn check_terminal_support() -> Result<(), Error> {
    let (width, height) = crossterm::terminal::size().map_err(|e| {
        Error::Io(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("TUI requires a terminal: {}", e),
        ))
    })?;

    ensure_minimum_size(width, height)
}

fn ensure_minimum_size(width: u16, height: u16) -> Result<(), Error> {
    if width < MIN_TERMINAL_WIDTH || height < MIN_TERMINAL_HEIGHT {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::Unsupported,
            format!(
                "Terminal too small: {}x{} (minimum: {}x{})",
                width, height, MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT
            ),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests;

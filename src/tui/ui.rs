//! UI Rendering Logic
//!
//! Header, body and status bar. The body is either the account overview or
//! the open wizard's current step.

use std::time::Instant;

use ratatui::{prelude::*, widgets::*};
use tui_input::Input;

use crate::error::Error;
use crate::transfer::{abbreviate_address, ConfirmStatus, FormField, TransferConfirm, TransferForm};
use crate::tui::app::{ActiveWizard, App, ConfirmButton, StepView};

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 20;

/// Main UI rendering function
pub fn render_ui(frame: &mut Frame, app: &App) -> Result<(), Error> {
    let size = frame.area();

    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small: {}x{} (minimum: {}x{})",
            size.width, size.height, MIN_WIDTH, MIN_HEIGHT
        ))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
        frame.render_widget(warning, size);
        return Ok(());
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Notification
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_header(frame, chunks[0], app);

    match &app.state.wizard {
        Some(active) => render_wizard(frame, chunks[1], app, active),
        None => render_overview(frame, chunks[1], app),
    }

    render_notification(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let account = app.account().to_checksum(None);
    let title = Line::from(vec![
        Span::styled(
            "Token Transfer",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Network: {}", app.config.network_name),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Account: {}", abbreviate_address(&account)),
            Style::default().fg(Color::Gray),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn token_symbol(app: &App) -> &str {
    app.state
        .token
        .as_ref()
        .map(|t| t.symbol.as_str())
        .unwrap_or("...")
}

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let balance = app.state.balance.formatted().unwrap_or("Loading...");

    let lines = vec![
        Line::from(Span::styled(
            "Balance",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} {}", balance, token_symbol(app))),
        Line::from(""),
        Line::from(Span::styled(
            "t: transfer   r: refresh balance   q: quit",
            Style::default().fg(Color::Gray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Account"))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_wizard(frame: &mut Frame, area: Rect, app: &App, active: &ActiveWizard) {
    let step = active.wizard.step();
    let (current, total) = step.step_number();
    let title = format!(" {} ({}/{}) ", step.title(), current, total);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &active.view {
        StepView::Form {
            form,
            focus,
            recipient_input,
            amount_input,
        } => render_form(frame, inner, form, *focus, recipient_input, amount_input),
        StepView::Confirm { confirm, focus } => render_confirm(frame, inner, confirm, *focus),
        StepView::Success { tx_hash } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Transfer submitted successfully",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            if let Some(hash) = tx_hash {
                lines.push(Line::from(format!("Transaction: {}", hash)));
                if let Some(explorer) = explorer_link(app, &hash.to_string()) {
                    lines.push(Line::from(Span::styled(
                        explorer,
                        Style::default().fg(Color::Blue),
                    )));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Closing shortly. Enter/Esc: close now",
                Style::default().fg(Color::Gray),
            )));
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                inner,
            );
        }
    }
}

fn explorer_link(app: &App, tx_hash: &str) -> Option<String> {
    app.config
        .explorer_url
        .as_ref()
        .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    form: &TransferForm,
    focus: FormField,
    recipient_input: &Input,
    amount_input: &Input,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Recipient
            Constraint::Length(5), // Amount
            Constraint::Length(1), // Available balance
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_input(frame, chunks[0], form, FormField::Recipient, focus, recipient_input);
    render_input(frame, chunks[1], form, FormField::Amount, focus, amount_input);

    frame.render_widget(
        Paragraph::new(form.available_label()).style(Style::default().fg(Color::Gray)),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new("Tab: switch field   Enter: next   Esc: cancel")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    form: &TransferForm,
    field: FormField,
    focus: FormField,
    input: &Input,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Length(3), // Input box
            Constraint::Length(1), // Error message
        ])
        .split(area);

    let focused = field == focus;
    let error = form.error(field);

    frame.render_widget(
        Paragraph::new(field.label()).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        chunks[0],
    );

    let border_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Blue)
    };

    let (text, text_style) = if input.value().is_empty() && !focused {
        (
            field.placeholder().to_string(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        (input.value().to_string(), Style::default().fg(Color::White))
    };

    frame.render_widget(
        Paragraph::new(text)
            .style(text_style)
            .block(Block::default().borders(Borders::ALL).style(border_style)),
        chunks[1],
    );

    if focused {
        let cursor_x = chunks[1].x + input.visual_cursor() as u16 + 1;
        frame.set_cursor_position((cursor_x, chunks[1].y + 1));
    }

    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(format!("⚠ {}", error))
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            chunks[2],
        );
    }
}

fn render_confirm(frame: &mut Frame, area: Rect, confirm: &TransferConfirm, focus: ConfirmButton) {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let value = Style::default().fg(Color::White).bg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Recipient: ", label),
            Span::styled(confirm.recipient_display(), value),
        ]),
        Line::from(vec![
            Span::styled("Amount: ", label),
            Span::styled(confirm.amount_display(), value),
        ]),
        Line::from(vec![
            Span::styled("Estimated Gas Fee: ", label),
            Span::styled(confirm.gas_display(Instant::now()), value),
        ]),
        Line::from(""),
    ];

    let button = |text: &'static str, selected: bool, enabled: bool| {
        let style = if !enabled {
            Style::default().fg(Color::DarkGray)
        } else if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(text, style)
    };

    let confirm_text = match confirm.status() {
        ConfirmStatus::Loading => "[ Submitting... ]",
        _ => "[ Confirm ]",
    };
    lines.push(Line::from(vec![
        button("[ Back ]", focus == ConfirmButton::Back, confirm.can_go_back()),
        Span::raw("  "),
        button(
            confirm_text,
            focus == ConfirmButton::Confirm,
            confirm.can_confirm(),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "←/→: choose   Enter: select   Esc: close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_notification(frame: &mut Frame, area: Rect, app: &App) {
    let Some(notification) = &app.state.notification else {
        return;
    };

    let text = Line::from(vec![
        Span::styled(
            format!("ℹ {} ", notification.title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(notification.description.clone()),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(error) = &app.state.error_message {
        (error.clone(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.state.status_message {
        (status.clone(), Style::default().fg(Color::Green))
    } else {
        ("Ctrl+C: quit".to_string(), Style::default().fg(Color::Gray))
    };

    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title("Status")),
        area,
    );
}

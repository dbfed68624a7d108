//! Warm-Up Dashboard - Actor-based operator console
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async polling and command dispatch

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use warmup_dashboard::app::view::mask;
use warmup_dashboard::constants::LOG_FILE_NAME;
use warmup_dashboard::messages::ui_events::{key_to_ui_event, AccountField, InputMode, Panel, SettingsField};
use warmup_dashboard::network::PollTick;
use warmup_dashboard::ui::{
    action_span, badge_span, delivery_color, empty_hint, form_line, panel_border, title_span,
};
use warmup_dashboard::{
    ApiClient, AppActor, Config, NetworkActor, NetworkCommand, NetworkResponse, Poller, RenderState,
    UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Platform data dir, or the working directory when it cannot be created
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("warmup-dashboard"))
        .filter(|d| std::fs::create_dir_all(d).is_ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(log_dir(), LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(api_base = %config.api_base, "Starting dashboard");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (tick_tx, tick_rx) = mpsc::unbounded_channel::<PollTick>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::new(&config), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor, which owns the poller
    let poller = Poller::new(config.poll_interval, tick_tx).spawn();
    let app_actor = AppActor::new(net_cmd_tx, render_tx).with_poller(poller);
    let app_task = tokio::spawn(app_actor.run(ui_rx, tick_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    // Let the app actor stop the poller before the runtime goes away
    let _ = app_task.await;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header
            Constraint::Length(12), // Status / Settings / Add account
            Constraint::Min(5),     // Accounts / Logs
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_header(f, state, main_chunks[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .split(main_chunks[1]);

    draw_status_card(f, state, top[0]);
    draw_settings(f, state, top[1]);
    draw_account_form(f, state, top[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[2]);

    draw_accounts(f, state, bottom[0]);
    draw_logs(f, state, bottom[1]);

    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        title_span(),
        Span::raw(" "),
        badge_span(state.badge),
    ];
    if state.is_loading {
        spans.push(Span::styled(" Loading… ", Style::default().fg(Color::Black).bg(Color::White)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_card(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Status;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, InputMode::Normal))
        .title(" Status ");

    let value = |v: &str| Span::styled(v.to_string(), Style::default().bold());
    let lines = vec![
        Line::from(vec![Span::raw("Accounts:     "), value(&state.status.accounts)]),
        Line::from(vec![Span::raw("Daily Volume: "), value(&state.status.daily_volume)]),
        Line::from(vec![Span::raw("Max Volume:   "), value(&state.status.max_volume)]),
        Line::from(""),
        Line::from(vec![
            action_span("s:Start", state.can_start, Color::Green),
            Span::raw(" "),
            action_span("x:Stop", true, Color::Red),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_settings(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Settings;
    let editing = is_focused && state.input_mode == InputMode::Editing;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, state.input_mode))
        .title(" Warm-Up Settings ");

    let lines = vec![
        form_line(
            "Daily",
            state.settings.daily_volume.to_string(),
            is_focused && state.settings_field == SettingsField::DailyVolume,
            editing,
        ),
        form_line(
            "Max",
            state.settings.max_volume.to_string(),
            is_focused && state.settings_field == SettingsField::MaxVolume,
            editing,
        ),
        Line::from(""),
        Line::from(action_span("w:Save", state.can_save_settings, Color::Blue)),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_account_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::AddAccount;
    let editing = is_focused && state.input_mode == InputMode::Editing;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, state.input_mode))
        .title(" Add Account ");

    let form = &state.account_form;
    let mut lines: Vec<Line> = AccountField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                AccountField::Email => form.email.clone(),
                AccountField::Password => mask(&form.password),
                AccountField::SmtpHost => form.smtp_host.clone(),
                AccountField::SmtpPort => form.smtp_port.to_string(),
                AccountField::ImapHost => form.imap_host.clone(),
                AccountField::ImapPort => form.imap_port.to_string(),
                AccountField::UseTls => String::from(if form.use_tls { "[x]" } else { "[ ]" }),
            };
            form_line(field.label(), value, is_focused && state.account_field == *field, editing)
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(action_span("a:Add", state.can_add_account, Color::Green)));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_accounts(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Accounts;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, InputMode::Normal))
        .title(format!(" Accounts ({}) - d:delete ", state.accounts.len()));

    if state.accounts.is_empty() {
        f.render_widget(
            empty_hint("No accounts yet. Add at least two to start warm-up.", block),
            area,
        );
        return;
    }

    let header = Row::new(vec!["Email", "SMTP", "IMAP"])
        .style(Style::default().fg(Color::Gray).bold())
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .accounts
        .iter()
        .map(|a| Row::new(vec![a.email.clone(), a.smtp.clone(), a.imap.clone()]))
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(highlight_style);

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected_account));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_logs(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Logs;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, InputMode::Normal))
        .title(" Recent Logs - c:clear ");

    if state.logs.is_empty() {
        f.render_widget(empty_hint("No logs yet.", block), area);
        return;
    }

    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|l| {
            let mut spans = Vec::new();
            if let Some(time) = &l.time {
                spans.push(Span::styled(format!("{} ", time), Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(l.sender.clone(), Style::default().bold()));
            spans.push(Span::raw(" → "));
            spans.push(Span::raw(l.receiver.clone()));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                l.status.as_str().to_string(),
                Style::default().fg(delivery_color(&l.status)),
            ));
            Line::from(spans)
        })
        .collect();

    let logs = Paragraph::new(lines)
        .block(block)
        .scroll((state.log_scroll, 0));
    f.render_widget(logs, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " ESC/Enter:stop editing | ↑/↓:field | digits only for ports and volumes "
    } else {
        " Tab:panel | ↑/↓:select | e:edit | r:refresh | s:start | x:stop | ?:help | q:quit "
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 WARM-UP DASHBOARD - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   ↑ / ↓              Select field / account / log line

 SCHEDULER
   r                  Refresh now
   s                  Start warm-up (needs 2+ accounts)
   x                  Stop warm-up

 SETTINGS / ADD ACCOUNT
   e / Enter          Edit selected field
   Space / t          Toggle TLS
   w                  Save settings
   a                  Add account

 LISTS
   d                  Delete selected account
   c                  Clear logs

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

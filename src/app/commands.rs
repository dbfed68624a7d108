//! Command handlers - business logic for processing UI events and network results

use crate::app::AppState;
use crate::app::state::Failure;
use crate::error::ApiError;
use crate::messages::ui_events::{AccountField, InputMode, Panel, SettingsField};
use crate::messages::{Command, CommandKind, NetworkCommand, NetworkResponse};
use crate::models::{AccountForm, Snapshot};

/// Append a decimal digit, ignoring non-digits and overflow
fn push_digit<T>(value: T, c: char) -> T
where
    T: Copy + Into<u32> + TryFrom<u32>,
{
    let current: u32 = value.into();
    c.to_digit(10)
        .and_then(|d| current.checked_mul(10)?.checked_add(d))
        .and_then(|v| T::try_from(v).ok())
        .unwrap_or(value)
}

fn pop_digit<T>(value: T) -> T
where
    T: Copy + Into<u32> + TryFrom<u32>,
{
    let current: u32 = value.into();
    T::try_from(current / 10).unwrap_or(value)
}

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.input_mode = InputMode::Normal;
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.input_mode = InputMode::Normal;
        self.active_panel = self.active_panel.prev();
    }

    pub fn next_item(&mut self) {
        match self.active_panel {
            Panel::Settings => self.settings_field = self.settings_field.next(),
            Panel::AddAccount => self.account_field = self.account_field.next(),
            Panel::Accounts => {
                let len = self.view.accounts.len();
                if len > 0 {
                    self.selected_account = (self.selected_account + 1) % len;
                }
            }
            Panel::Logs => {
                if self.log_scroll < self.last_log_line() {
                    self.log_scroll += 1;
                }
            }
            Panel::Status => {}
        }
    }

    pub fn prev_item(&mut self) {
        match self.active_panel {
            // Two fields, so next == prev
            Panel::Settings => self.settings_field = self.settings_field.next(),
            Panel::AddAccount => self.account_field = self.account_field.prev(),
            Panel::Accounts => {
                let len = self.view.accounts.len();
                if len > 0 {
                    self.selected_account = self
                        .selected_account
                        .checked_sub(1)
                        .unwrap_or(len - 1);
                }
            }
            Panel::Logs => self.log_scroll = self.log_scroll.saturating_sub(1),
            Panel::Status => {}
        }
    }

    // ========================
    // Draft editing
    // ========================

    pub fn start_editing(&mut self) {
        match self.active_panel {
            Panel::AddAccount if self.account_field == AccountField::UseTls => self.toggle_tls(),
            Panel::Settings | Panel::AddAccount => self.input_mode = InputMode::Editing,
            _ => {}
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_tls(&mut self) {
        self.account_form.use_tls = !self.account_form.use_tls;
    }

    pub fn enter_char(&mut self, c: char) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        match self.active_panel {
            Panel::Settings => match self.settings_field {
                SettingsField::DailyVolume => {
                    self.settings.daily_volume = push_digit(self.settings.daily_volume, c)
                }
                SettingsField::MaxVolume => {
                    self.settings.max_volume = push_digit(self.settings.max_volume, c)
                }
            },
            Panel::AddAccount => {
                let form = &mut self.account_form;
                match self.account_field {
                    AccountField::Email => form.email.push(c),
                    AccountField::Password => form.password.push(c),
                    AccountField::SmtpHost => form.smtp_host.push(c),
                    AccountField::ImapHost => form.imap_host.push(c),
                    AccountField::SmtpPort => form.smtp_port = push_digit(form.smtp_port, c),
                    AccountField::ImapPort => form.imap_port = push_digit(form.imap_port, c),
                    AccountField::UseTls => {}
                }
            }
            _ => {}
        }
    }

    pub fn delete_char(&mut self) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        match self.active_panel {
            Panel::Settings => match self.settings_field {
                SettingsField::DailyVolume => {
                    self.settings.daily_volume = pop_digit(self.settings.daily_volume)
                }
                SettingsField::MaxVolume => {
                    self.settings.max_volume = pop_digit(self.settings.max_volume)
                }
            },
            Panel::AddAccount => {
                let form = &mut self.account_form;
                match self.account_field {
                    AccountField::Email => {
                        form.email.pop();
                    }
                    AccountField::Password => {
                        form.password.pop();
                    }
                    AccountField::SmtpHost => {
                        form.smtp_host.pop();
                    }
                    AccountField::ImapHost => {
                        form.imap_host.pop();
                    }
                    AccountField::SmtpPort => form.smtp_port = pop_digit(form.smtp_port),
                    AccountField::ImapPort => form.imap_port = pop_digit(form.imap_port),
                    AccountField::UseTls => {}
                }
            }
            _ => {}
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Polling
    // ========================

    /// Issue a refresh. Overlapping refreshes are allowed; loading stays on
    /// until every one of them has reported back.
    pub fn begin_refresh(&mut self) -> NetworkCommand {
        self.refreshes_in_flight += 1;
        NetworkCommand::Refresh { id: self.next_id() }
    }

    /// Replace the whole committed view with one snapshot
    fn commit(&mut self, snapshot: Snapshot) {
        self.view = snapshot;

        let accounts = self.view.accounts.len();
        if self.selected_account >= accounts {
            self.selected_account = accounts.saturating_sub(1);
        }
        let last = self.last_log_line();
        if self.log_scroll > last {
            self.log_scroll = last;
        }
    }

    /// Highest scroll offset the log panel can take
    fn last_log_line(&self) -> u16 {
        u16::try_from(self.view.logs.len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    // ========================
    // Dispatch
    // ========================

    fn dispatch(&mut self, command: Command) -> NetworkCommand {
        let id = self.next_id();
        tracing::info!(id, operation = command.kind().as_str(), "Dispatching command");
        NetworkCommand::Dispatch { id, command }
    }

    /// The draft is sent as a copy and only cleared once the server accepts it
    pub fn add_account(&mut self) -> Option<NetworkCommand> {
        self.stop_editing();
        if !self.account_form.is_submittable() {
            return None;
        }
        Some(self.dispatch(Command::AddAccount(self.account_form.clone())))
    }

    pub fn delete_selected_account(&mut self) -> Option<NetworkCommand> {
        let id = self
            .view
            .accounts
            .get(self.selected_account)
            .map(|a| a.id.clone())
            .filter(|id| !id.is_empty())?;
        Some(self.dispatch(Command::DeleteAccount(id)))
    }

    pub fn save_settings(&mut self) -> Option<NetworkCommand> {
        self.stop_editing();
        if !self.settings.is_valid() {
            return None;
        }
        Some(self.dispatch(Command::SaveSettings(self.settings)))
    }

    /// Gated on the committed account list, never on drafts in flight
    pub fn start_warmup(&mut self) -> Option<NetworkCommand> {
        if !self.can_start() {
            return None;
        }
        Some(self.dispatch(Command::StartWarmup))
    }

    pub fn stop_warmup(&mut self) -> NetworkCommand {
        self.dispatch(Command::StopWarmup)
    }

    pub fn clear_logs(&mut self) -> NetworkCommand {
        self.dispatch(Command::ClearLogs)
    }

    // ========================
    // Response handling
    // ========================

    fn record_failure(&mut self, id: u64, operation: &'static str, error: &ApiError) {
        tracing::warn!(id, operation, kind = error.kind().as_str(), error = %error, "Request failed");
        self.last_failure = Some(Failure {
            operation,
            kind: error.kind(),
        });
    }

    /// Apply a network result. Returns the follow-up refresh when a command
    /// succeeded.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::Snapshot { id, result } => {
                self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1);
                match result {
                    Ok(snapshot) => {
                        tracing::debug!(
                            id,
                            accounts = snapshot.accounts.len(),
                            logs = snapshot.logs.len(),
                            "Committing snapshot"
                        );
                        self.commit(snapshot);
                    }
                    Err(e) => self.record_failure(id, "refresh", &e),
                }
                None
            }
            NetworkResponse::CommandCompleted { id, kind, result } => match result {
                Ok(()) => {
                    tracing::info!(id, operation = kind.as_str(), "Command succeeded");
                    if kind == CommandKind::AddAccount {
                        self.account_form = AccountForm::default();
                        self.account_field = AccountField::Email;
                    }
                    Some(self.begin_refresh())
                }
                Err(e) => {
                    self.record_failure(id, kind.as_str(), &e);
                    None
                }
            },
        }
    }
}

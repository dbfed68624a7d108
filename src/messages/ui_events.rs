//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    /// Next field, row or log line depending on the panel
    NextItem,
    PrevItem,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    ToggleTls,

    // Dispatch
    Refresh,
    StartWarmup,
    StopWarmup,
    AddAccount,
    DeleteAccount,
    SaveSettings,
    ClearLogs,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    Status,
    Settings,
    AddAccount,
    Accounts,
    Logs,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Status => Panel::Settings,
            Panel::Settings => Panel::AddAccount,
            Panel::AddAccount => Panel::Accounts,
            Panel::Accounts => Panel::Logs,
            Panel::Logs => Panel::Status,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Status => Panel::Logs,
            Panel::Settings => Panel::Status,
            Panel::AddAccount => Panel::Settings,
            Panel::Accounts => Panel::AddAccount,
            Panel::Logs => Panel::Accounts,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Settings draft field
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SettingsField {
    #[default]
    DailyVolume,
    MaxVolume,
}

impl SettingsField {
    pub fn next(&self) -> SettingsField {
        match self {
            SettingsField::DailyVolume => SettingsField::MaxVolume,
            SettingsField::MaxVolume => SettingsField::DailyVolume,
        }
    }
}

/// Add-account draft field
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AccountField {
    #[default]
    Email,
    Password,
    SmtpHost,
    SmtpPort,
    ImapHost,
    ImapPort,
    UseTls,
}

impl AccountField {
    pub const ALL: [AccountField; 7] = [
        AccountField::Email,
        AccountField::Password,
        AccountField::SmtpHost,
        AccountField::SmtpPort,
        AccountField::ImapHost,
        AccountField::ImapPort,
        AccountField::UseTls,
    ];

    pub fn next(&self) -> AccountField {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> AccountField {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountField::Email => "Email",
            AccountField::Password => "Password",
            AccountField::SmtpHost => "SMTP Host",
            AccountField::SmtpPort => "SMTP Port",
            AccountField::ImapHost => "IMAP Host",
            AccountField::ImapPort => "IMAP Port",
            AccountField::UseTls => "TLS",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AccountField::SmtpPort | AccountField::ImapPort)
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextItem),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevItem),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => {
            // Global keys
            match key.code {
                KeyCode::Char('q') => return Some(UiEvent::Quit),
                KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
                KeyCode::Char('r') => return Some(UiEvent::Refresh),
                KeyCode::Char('s') => return Some(UiEvent::StartWarmup),
                KeyCode::Char('x') => return Some(UiEvent::StopWarmup),
                KeyCode::Tab => return Some(UiEvent::NextPanel),
                KeyCode::BackTab => return Some(UiEvent::PrevPanel),
                KeyCode::Up => return Some(UiEvent::PrevItem),
                KeyCode::Down => return Some(UiEvent::NextItem),
                _ => {}
            }
            handle_panel_keys(key, active_panel)
        }
    }
}

/// Handle keys that only apply to the focused panel
fn handle_panel_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match active_panel {
        Panel::Status => None,
        Panel::Settings => match key.code {
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('w') => Some(UiEvent::SaveSettings),
            _ => None,
        },
        Panel::AddAccount => match key.code {
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char(' ') | KeyCode::Char('t') => Some(UiEvent::ToggleTls),
            KeyCode::Char('a') => Some(UiEvent::AddAccount),
            _ => None,
        },
        Panel::Accounts => match key.code {
            KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteAccount),
            _ => None,
        },
        Panel::Logs => match key.code {
            KeyCode::Char('c') => Some(UiEvent::ClearLogs),
            _ => None,
        },
    }
}

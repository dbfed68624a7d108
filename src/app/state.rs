//! App state - pure data structure with no I/O logic

use crate::app::view::{self, AccountRow, LogRow, SchedulerBadge, StatusCard};
use crate::error::ApiErrorKind;
use crate::messages::ui_events::{AccountField, InputMode, Panel, SettingsField};
use crate::messages::RenderState;
use crate::models::{AccountForm, Settings, Snapshot};

/// Which operation failed most recently, and how
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Failure {
    pub operation: &'static str,
    pub kind: ApiErrorKind,
}

/// Main application state - pure data, no I/O.
///
/// `view` is written only by snapshot commits. Drafts are written only by
/// local edits and by the reset that follows a successful add.
pub struct AppState {
    // Committed server view
    pub view: Snapshot,
    pub refreshes_in_flight: usize,
    pub next_request_id: u64,
    pub last_failure: Option<Failure>,

    // Drafts
    pub settings: Settings,
    pub settings_field: SettingsField,
    pub account_form: AccountForm,
    pub account_field: AccountField,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub selected_account: usize,
    pub log_scroll: u16,
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            view: Snapshot::default(),
            refreshes_in_flight: 0,
            next_request_id: 1,
            last_failure: None,
            settings: Settings::default(),
            settings_field: SettingsField::DailyVolume,
            account_form: AccountForm::default(),
            account_field: AccountField::Email,
            active_panel: Panel::Status,
            input_mode: InputMode::Normal,
            selected_account: 0,
            log_scroll: 0,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_loading(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    pub fn can_start(&self) -> bool {
        view::can_start(&self.view.accounts)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            show_help: self.show_help,
            is_loading: self.is_loading(),
            badge: SchedulerBadge::from_status(&self.view.status),
            status: StatusCard::from_status(&self.view.status),
            can_start: self.can_start(),
            accounts: self.view.accounts.iter().map(AccountRow::from).collect(),
            selected_account: self.selected_account,
            logs: self.view.logs.iter().map(LogRow::from).collect(),
            log_scroll: self.log_scroll,
            settings: self.settings,
            settings_field: self.settings_field,
            can_save_settings: self.settings.is_valid(),
            account_form: self.account_form.clone(),
            account_field: self.account_field,
            can_add_account: self.account_form.is_submittable(),
        }
    }
}

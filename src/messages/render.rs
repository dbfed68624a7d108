//! Render state - data structure sent from App layer to UI for rendering

use crate::app::view::{AccountRow, LogRow, SchedulerBadge, StatusCard};
use crate::messages::ui_events::{AccountField, InputMode, Panel, SettingsField};
use crate::models::{AccountForm, Settings};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub is_loading: bool,

    // Committed server view, derived
    pub badge: SchedulerBadge,
    pub status: StatusCard,
    pub can_start: bool,
    pub accounts: Vec<AccountRow>,
    pub selected_account: usize,
    pub logs: Vec<LogRow>,
    pub log_scroll: u16,

    // Drafts
    pub settings: Settings,
    pub settings_field: SettingsField,
    pub can_save_settings: bool,
    pub account_form: AccountForm,
    pub account_field: AccountField,
    pub can_add_account: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            active_panel: Panel::Status,
            input_mode: InputMode::Normal,
            show_help: false,
            is_loading: false,
            badge: SchedulerBadge::Stopped,
            status: StatusCard::default(),
            can_start: false,
            accounts: Vec::new(),
            selected_account: 0,
            logs: Vec::new(),
            log_scroll: 0,
            settings: Settings::default(),
            settings_field: SettingsField::DailyVolume,
            can_save_settings: true,
            account_form: AccountForm::default(),
            account_field: AccountField::Email,
            can_add_account: false,
        }
    }
}

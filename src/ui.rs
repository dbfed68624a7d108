use ratatui::{prelude::*, widgets::*};

use crate::app::view::SchedulerBadge;
use crate::constants::{APP_NAME, APP_VERSION};
use crate::messages::ui_events::InputMode;
use crate::models::DeliveryStatus;

/// Header title with the running version
pub fn title_span() -> Span<'static> {
    Span::styled(
        format!(" {} v{} ", APP_NAME, APP_VERSION),
        Style::default().fg(Color::White).bold(),
    )
}

/// Border style for a panel given focus and editing state
pub fn panel_border(is_focused: bool, input_mode: InputMode) -> Style {
    if is_focused && input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders a labelled form line, highlighted when selected
pub fn form_line<'a>(label: &'a str, value: String, selected: bool, editing: bool) -> Line<'a> {
    let marker = if selected { "> " } else { "  " };
    let value_style = if selected && editing {
        Style::default().fg(Color::Yellow).bold()
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, value_style),
    ])
}

/// Renders an action hint that greys out when unavailable
pub fn action_span(label: &str, enabled: bool, color: Color) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::Black).bg(color).bold()
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Gray)
    };
    Span::styled(format!(" {} ", label), style)
}

/// Scheduler badge
pub fn badge_span(badge: SchedulerBadge) -> Span<'static> {
    let style = match badge {
        SchedulerBadge::Active => Style::default().fg(Color::Black).bg(Color::Green).bold(),
        SchedulerBadge::Stopped => Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
    };
    Span::styled(format!(" {} ", badge.as_str()), style)
}

/// Delivery status color
pub fn delivery_color(status: &DeliveryStatus) -> Color {
    if status.is_sent() {
        Color::Green
    } else {
        Color::Red
    }
}

/// Placeholder paragraph for empty lists
pub fn empty_hint<'a>(text: &'a str, block: Block<'a>) -> Paragraph<'a> {
    Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
        .block(block)
        .wrap(Wrap { trim: false })
}

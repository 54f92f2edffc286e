//! Status dots for devices and the backend connection.

use ratatui::style::Style;
use ratatui::text::Span;

use citygrid_core::{ConnectionState, DeviceStatus};

use crate::theme;

/// ●/○/◐/◉ in the device's status color.
pub fn status_span(status: DeviceStatus) -> Span<'static> {
    Span::styled(
        status_char(status),
        Style::default().fg(theme::status_color(status)),
    )
}

pub fn status_char(status: DeviceStatus) -> &'static str {
    match status {
        DeviceStatus::Online => "●",
        DeviceStatus::Offline => "○",
        DeviceStatus::Warning => "◐",
        DeviceStatus::Maintenance => "◉",
    }
}

/// Status-bar indicator for the backend link.
pub fn connection_span(state: &ConnectionState) -> Span<'static> {
    match state {
        ConnectionState::Connected => {
            Span::styled("● backend", Style::default().fg(theme::SUCCESS_GREEN))
        }
        ConnectionState::Connecting => {
            Span::styled("◐ connecting", Style::default().fg(theme::ELECTRIC_YELLOW))
        }
        ConnectionState::Failed(_) => {
            Span::styled("✗ backend error", Style::default().fg(theme::ERROR_RED))
        }
        ConnectionState::Disconnected => {
            Span::styled("○ offline (seed data)", Style::default().fg(theme::BORDER_GRAY))
        }
    }
}

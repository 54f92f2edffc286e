//! Neon palette, semantic styles, and conversion of the domain's colors
//! into terminal colors.

use ratatui::style::{Color, Modifier, Style};

use citygrid_core::topology::Paint;
use citygrid_core::{DeviceStatus, HexColor};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

const BG_DARK_RGB: (u8, u8, u8) = (30, 31, 41);

// ── Domain colors ─────────────────────────────────────────────────────

pub fn hex(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Terminals have no alpha: translucent paints are blended onto the
/// dashboard background.
pub fn paint(paint: Paint) -> Color {
    let alpha = match paint {
        Paint::HexAlpha { alpha, .. } => f64::from(alpha) / 255.0,
        Paint::Solid(_) => 1.0,
        Paint::Rgba { a, .. } => a.clamp(0.0, 1.0),
    };
    let (r, g, b) = paint.rgb();
    let (br, bg, bb) = BG_DARK_RGB;
    Color::Rgb(blend(r, br, alpha), blend(g, bg, alpha), blend(b, bb, alpha))
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(fg: u8, bg: u8, alpha: f64) -> u8 {
    (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

pub fn status_color(status: DeviceStatus) -> Color {
    hex(status.color())
}

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn opaque_paint_keeps_its_color() {
        let red = HexColor::rgb(0xEF, 0x44, 0x44);
        assert_eq!(paint(Paint::Solid(red)), Color::Rgb(0xEF, 0x44, 0x44));
        assert_eq!(
            paint(Paint::HexAlpha {
                color: red,
                alpha: 255
            }),
            Color::Rgb(0xEF, 0x44, 0x44)
        );
    }

    #[test]
    fn translucent_paint_blends_toward_background() {
        // 50% gray over #1e1f29.
        assert_eq!(paint(Paint::CROSS_VLAN), Color::Rgb(90, 91, 96));
    }
}

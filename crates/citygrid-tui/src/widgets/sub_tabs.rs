//! Horizontal chip bar for in-screen filters (device filters, VLAN chips).

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// Renders the labels inline with the active one highlighted.
///
/// `prefix` is drawn dim before the chips, e.g. `"status:"`.
pub fn render_sub_tabs<'a>(prefix: &'a str, labels: &[String], active_index: usize) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2 + 1);
    if !prefix.is_empty() {
        spans.push(Span::styled(format!("{prefix} "), theme::key_hint()));
    }

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label.clone(), theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn active_chip_is_bracketed() {
        let labels = vec!["All".to_owned(), "Online".to_owned(), "Offline".to_owned()];
        let line = render_sub_tabs("status:", &labels, 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "status: All  [Online]  Offline");
    }
}

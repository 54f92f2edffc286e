//! Devices screen — filterable inventory table with a detail strip.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use strum::IntoEnumIterator;

use citygrid_core::{Device, DeviceQuery, DeviceStatus, DeviceType, VlanId, VlanNetwork};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

pub struct DevicesScreen {
    focused: bool,
    devices: Arc<Vec<Arc<Device>>>,
    vlans: Arc<Vec<Arc<VlanNetwork>>>,
    query: DeviceQuery,
    filtered: Vec<Arc<Device>>,
    table_state: TableState,
    selected_device: Option<String>,
}

/// Step an "all or one of" filter: all → first → … → last → all.
pub(crate) fn cycle<T: Copy + PartialEq>(current: Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(c) => options
            .iter()
            .position(|o| *o == c)
            .and_then(|i| options.get(i + 1))
            .copied(),
    }
}

/// "VLAN 10 - Traffic Management", or "Unassigned" when the id does not
/// resolve.
pub(crate) fn vlan_label(vlans: &[Arc<VlanNetwork>], id: VlanId) -> String {
    vlans
        .iter()
        .find(|v| v.id == id)
        .map_or_else(|| "Unassigned".to_owned(), |v| v.display_name())
}

impl DevicesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            devices: Arc::new(Vec::new()),
            vlans: Arc::new(Vec::new()),
            query: DeviceQuery::default(),
            filtered: Vec::new(),
            table_state: TableState::default().with_selected(Some(0)),
            selected_device: None,
        }
    }

    fn recompute_filtered(&mut self) {
        self.filtered = self.query.apply(&self.devices);
        let idx = self.selected_index();
        self.select(idx);
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let clamped = if self.filtered.is_empty() {
            0
        } else {
            idx.min(self.filtered.len() - 1)
        };
        self.table_state.select(Some(clamped));
    }

    #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, self.filtered.len() as isize - 1);
        self.select(next as usize);
    }

    fn highlighted(&self) -> Option<&Arc<Device>> {
        self.filtered.get(self.selected_index())
    }

    fn cycle_status(&mut self) {
        let options: Vec<DeviceStatus> = DeviceStatus::iter().collect();
        self.query.status = cycle(self.query.status, &options);
        self.recompute_filtered();
    }

    fn cycle_vlan(&mut self) {
        let options: Vec<VlanId> = self.vlans.iter().map(|v| v.id).collect();
        self.query.vlan = cycle(self.query.vlan, &options);
        self.recompute_filtered();
    }

    fn cycle_type(&mut self) {
        let options: Vec<DeviceType> = DeviceType::iter().collect();
        self.query.device_type = cycle(self.query.device_type, &options);
        self.recompute_filtered();
    }

    fn filter_line(&self) -> Line<'_> {
        let value = |v: Option<String>| {
            let active = v.is_some();
            let style = if active {
                theme::tab_active()
            } else {
                theme::tab_inactive()
            };
            Span::styled(v.unwrap_or_else(|| "All".into()), style)
        };

        let mut spans = vec![
            Span::styled("  s ", theme::key_hint_key()),
            Span::styled("status ", theme::key_hint()),
            value(self.query.status.map(|s| s.label().to_owned())),
            Span::styled("   v ", theme::key_hint_key()),
            Span::styled("vlan ", theme::key_hint()),
            value(self.query.vlan.map(|v| vlan_label(&self.vlans, v))),
            Span::styled("   t ", theme::key_hint_key()),
            Span::styled("type ", theme::key_hint()),
            value(self.query.device_type.map(|t| t.label().to_owned())),
        ];
        if !self.query.search.is_empty() {
            spans.push(Span::styled("   search ", theme::key_hint()));
            spans.push(Span::styled(
                format!("\"{}\"", self.query.search),
                Style::default().fg(theme::NEON_CYAN),
            ));
        }
        Line::from(spans)
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, device: &Device) {
        let block = Block::default()
            .title(format!(" {} ", device.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |s: &'static str| Span::styled(format!("  {s:<10}"), theme::key_hint());
        let lines = vec![
            Line::from(vec![
                label("ID"),
                Span::styled(device.id.clone(), Style::default().fg(theme::DIM_WHITE)),
                Span::styled("    ", theme::key_hint()),
                status_indicator::status_span(device.status),
                Span::styled(
                    format!(" {}", device.status.label()),
                    Style::default().fg(theme::status_color(device.status)),
                ),
            ]),
            Line::from(vec![
                label("Address"),
                Span::styled(device.ip.clone(), Style::default().fg(theme::CORAL)),
                Span::styled(format!("    {}", device.location), theme::table_row()),
            ]),
            Line::from(vec![
                label("VLAN"),
                Span::styled(
                    vlan_label(&self.vlans, device.vlan_id),
                    Style::default().fg(theme::NEON_CYAN),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for DevicesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Char('s') => self.cycle_status(),
            KeyCode::Char('v') => self.cycle_vlan(),
            KeyCode::Char('t') => self.cycle_type(),
            KeyCode::Char('c') => {
                self.query = DeviceQuery::default();
                self.recompute_filtered();
            }
            KeyCode::Enter => {
                if let Some(device) = self.highlighted() {
                    let target = if self.selected_device.as_deref() == Some(device.id.as_str()) {
                        None
                    } else {
                        Some(device.id.clone())
                    };
                    return Ok(Some(Action::SelectDevice(target)));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DevicesUpdated(devices) => {
                self.devices = Arc::clone(devices);
                self.recompute_filtered();
            }
            Action::VlansUpdated(vlans) => {
                self.vlans = Arc::clone(vlans);
                if self
                    .query
                    .vlan
                    .is_some_and(|id| !vlans.iter().any(|v| v.id == id))
                {
                    self.query.vlan = None;
                    self.recompute_filtered();
                }
            }
            Action::SelectedDeviceChanged(id) => self.selected_device.clone_from(id),
            Action::SearchInput(query) if self.focused => {
                self.query.search.clone_from(query);
                self.recompute_filtered();
            }
            Action::CloseSearch if self.focused => {
                self.query.search.clear();
                self.recompute_filtered();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Devices ({}/{}) ", self.filtered.len(), self.devices.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // filters
            Constraint::Min(3),    // table
            Constraint::Length(5), // detail
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(self.filter_line()), layout[0]);

        if self.filtered.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  No devices match the current filters",
                    Style::default().fg(theme::BORDER_GRAY),
                ))),
                layout[1],
            );
            return;
        }

        let header = Row::new(
            ["", "ID", "Name", "Type", "Status", "IP Address", "Location", "VLAN"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .filtered
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let is_cursor = i == selected_idx;
                let is_selected = self.selected_device.as_deref() == Some(d.id.as_str());
                let marker = if is_selected { "▸" } else { " " };
                let row_style = if is_cursor {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                let name_style = if is_selected {
                    Style::default()
                        .fg(theme::ELECTRIC_PURPLE)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(marker).style(Style::default().fg(theme::ELECTRIC_PURPLE)),
                    Cell::from(d.id.clone()),
                    Cell::from(d.name.clone()).style(name_style),
                    Cell::from(d.device_type.label()),
                    Cell::from(Line::from(vec![
                        status_indicator::status_span(d.status),
                        Span::raw(format!(" {}", d.status.label())),
                    ])),
                    Cell::from(d.ip.clone()).style(Style::default().fg(theme::CORAL)),
                    Cell::from(d.location.clone()),
                    Cell::from(vlan_label(&self.vlans, d.vlan_id))
                        .style(Style::default().fg(theme::NEON_CYAN)),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(1),  // marker
            Constraint::Length(8),  // id
            Constraint::Fill(2),    // name
            Constraint::Length(12), // type
            Constraint::Length(13), // status
            Constraint::Length(14), // ip
            Constraint::Fill(2),    // location
            Constraint::Fill(3),    // vlan
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[1], &mut state);

        if let Some(device) = self.highlighted() {
            self.render_detail(frame, layout[2], device);
        }
    }

    fn searchable(&self) -> bool {
        true
    }

    fn key_hints(&self) -> &'static str {
        "j/k move  Enter select  s/v/t filter  c clear"
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Devices"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use citygrid_core::NetworkStore;

    use super::*;

    fn loaded() -> DevicesScreen {
        let store = NetworkStore::seeded(Some(3));
        let mut screen = DevicesScreen::new();
        screen.set_focused(true);
        screen.update(&Action::VlansUpdated(store.vlans())).unwrap();
        screen.update(&Action::DevicesUpdated(store.devices())).unwrap();
        screen
    }

    fn screen_text(screen: &DevicesScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn cycle_walks_through_options_and_back_to_all() {
        let options = [1, 2, 3];
        assert_eq!(cycle(None, &options), Some(1));
        assert_eq!(cycle(Some(1), &options), Some(2));
        assert_eq!(cycle(Some(3), &options), None);
        assert_eq!(cycle::<u8>(None, &[]), None);
    }

    #[test]
    fn status_filter_narrows_the_table() {
        let mut screen = loaded();
        assert_eq!(screen.filtered.len(), 15);
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('s')))
            .unwrap();
        assert_eq!(screen.query.status, Some(DeviceStatus::Online));
        assert!(
            screen
                .filtered
                .iter()
                .all(|d| d.status == DeviceStatus::Online)
        );

        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('c')))
            .unwrap();
        assert_eq!(screen.filtered.len(), 15);
    }

    #[test]
    fn search_input_applies_to_name_and_location() {
        let mut screen = loaded();
        screen
            .update(&Action::SearchInput("zzz-no-such-device".into()))
            .unwrap();
        assert!(screen.filtered.is_empty());
        assert!(screen_text(&screen).contains("No devices match"));

        screen.update(&Action::CloseSearch).unwrap();
        assert_eq!(screen.filtered.len(), 15);
    }

    #[test]
    fn enter_selects_then_clears() {
        let mut screen = loaded();
        let first = screen.filtered[0].id.clone();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(action, Some(Action::SelectDevice(Some(ref id))) if *id == first));

        screen
            .update(&Action::SelectedDeviceChanged(Some(first)))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(action, Some(Action::SelectDevice(None))));
    }

    #[test]
    fn unknown_vlan_reads_unassigned() {
        let screen = loaded();
        assert_eq!(vlan_label(&screen.vlans, 999), "Unassigned");
        assert_eq!(
            vlan_label(&screen.vlans, 10),
            "VLAN 10 - Traffic Management"
        );
    }
}

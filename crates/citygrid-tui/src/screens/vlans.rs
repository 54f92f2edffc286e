//! VLANs screen — segment table, members of the highlighted segment.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};

use citygrid_core::{Device, SecurityLevel, VlanId, VlanNetwork};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

const LOAD_BAR_WIDTH: usize = 10;

pub struct VlansScreen {
    focused: bool,
    vlans: Arc<Vec<Arc<VlanNetwork>>>,
    devices: Arc<Vec<Arc<Device>>>,
    table_state: TableState,
    selected_vlan: Option<VlanId>,
}

/// A member row: the device (if it exists) and whether it is only listed
/// on the VLAN without carrying its id.
#[derive(Debug, PartialEq)]
pub(crate) struct Member {
    pub id: String,
    pub device: Option<Arc<Device>>,
    pub listed_only: bool,
}

/// Devices carrying the VLAN's id, then ids the VLAN lists that do not.
pub(crate) fn members(vlan: &VlanNetwork, devices: &[Arc<Device>]) -> Vec<Member> {
    let mut out: Vec<Member> = devices
        .iter()
        .filter(|d| d.vlan_id == vlan.id)
        .map(|d| Member {
            id: d.id.clone(),
            device: Some(Arc::clone(d)),
            listed_only: false,
        })
        .collect();

    for id in &vlan.devices {
        if out.iter().any(|m| &m.id == id) {
            continue;
        }
        out.push(Member {
            id: id.clone(),
            device: devices.iter().find(|d| &d.id == id).cloned(),
            listed_only: true,
        });
    }
    out
}

fn load_bar(load: u8) -> String {
    let filled = usize::from(load.min(100)) * LOAD_BAR_WIDTH / 100;
    format!(
        "{}{} {load:>3}%",
        "█".repeat(filled),
        "░".repeat(LOAD_BAR_WIDTH - filled)
    )
}

fn security_color(level: SecurityLevel) -> ratatui::style::Color {
    match level {
        SecurityLevel::High => theme::ERROR_RED,
        SecurityLevel::Medium => theme::ELECTRIC_YELLOW,
        SecurityLevel::Low => theme::SUCCESS_GREEN,
    }
}

impl VlansScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            vlans: Arc::new(Vec::new()),
            devices: Arc::new(Vec::new()),
            table_state: TableState::default().with_selected(Some(0)),
            selected_vlan: None,
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.vlans.len();
        if len == 0 {
            return;
        }
        let idx = self.selected_index();
        let next = if down {
            (idx + 1).min(len - 1)
        } else {
            idx.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn highlighted(&self) -> Option<&Arc<VlanNetwork>> {
        self.vlans.get(self.selected_index())
    }

    fn render_members(&self, frame: &mut Frame, area: Rect, vlan: &VlanNetwork) {
        let block = Block::default()
            .title(format!(" {} ", vlan.display_name()))
            .title_style(Style::default().fg(theme::hex(vlan.color)).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("  {}", vlan.description),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(vec![
                Span::styled("  subnet ", theme::key_hint()),
                Span::styled(vlan.subnet.clone(), Style::default().fg(theme::CORAL)),
                Span::styled("   department ", theme::key_hint()),
                Span::styled(vlan.department.clone(), theme::table_row()),
            ]),
            Line::from(""),
        ];

        let members = members(vlan, &self.devices);
        if members.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No devices on this VLAN",
                Style::default().fg(theme::BORDER_GRAY),
            )));
        }
        for m in &members {
            let mut spans = vec![Span::raw("  ")];
            match &m.device {
                Some(d) => {
                    spans.push(status_indicator::status_span(d.status));
                    spans.push(Span::styled(
                        format!(" {:<8} {:<28} {}", d.id, d.name, d.ip),
                        theme::table_row(),
                    ));
                }
                None => spans.push(Span::styled(
                    format!("? {:<8} (unknown device)", m.id),
                    Style::default().fg(theme::BORDER_GRAY),
                )),
            }
            if m.listed_only {
                spans.push(Span::styled(
                    "  listed only",
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                ));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

impl Component for VlansScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
            KeyCode::Enter => {
                if let Some(vlan) = self.highlighted() {
                    return Ok(Some(Action::ToggleVlan(vlan.id)));
                }
            }
            KeyCode::Char('a') => return Ok(Some(Action::SelectVlan(None))),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::VlansUpdated(vlans) => {
                self.vlans = Arc::clone(vlans);
                let idx = self.selected_index().min(vlans.len().saturating_sub(1));
                self.table_state.select(Some(idx));
            }
            Action::DevicesUpdated(devices) => self.devices = Arc::clone(devices),
            Action::SelectedVlanChanged(vlan) => self.selected_vlan = *vlan,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Min(6), Constraint::Percentage(45)]).split(area);

        let block = Block::default()
            .title(format!(" VLANs ({}) ", self.vlans.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let header = Row::new(
            ["", "ID", "Name", "Subnet", "Devices", "Load", "Security", "Department"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .vlans
            .iter()
            .map(|v| {
                let count = self.devices.iter().filter(|d| d.vlan_id == v.id).count();
                let marker = if self.selected_vlan == Some(v.id) {
                    "●"
                } else {
                    " "
                };
                let color = theme::hex(v.color);
                Row::new(vec![
                    Cell::from(marker).style(Style::default().fg(color)),
                    Cell::from(v.id.to_string()).style(Style::default().fg(color)),
                    Cell::from(v.name.clone()),
                    Cell::from(v.subnet.clone()).style(Style::default().fg(theme::CORAL)),
                    Cell::from(count.to_string()),
                    Cell::from(load_bar(v.traffic_load)).style(Style::default().fg(color)),
                    Cell::from(v.security_level.to_string())
                        .style(Style::default().fg(security_color(v.security_level))),
                    Cell::from(v.department.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(2),
            Constraint::Length(14),
            Constraint::Length(7),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Fill(1),
        ];

        let table = Table::new(rows, widths)
            .block(block)
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        if let Some(vlan) = self.highlighted() {
            self.render_members(frame, layout[1], vlan);
        }
    }

    fn key_hints(&self) -> &'static str {
        "j/k move  Enter filter  a all"
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "VLANs"
    }
}

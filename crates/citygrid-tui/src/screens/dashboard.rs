//! Dashboard screen — overview cards, traffic trend, status split, VLAN usage.
//!
//! Layout:
//! ┌─ Devices ─┐┌─ Online ─┐┌─ VLANs ─┐┌─ Avg Load ─┐┌─ Warnings ─┐
//! ├─ Traffic Trend (24h, one Braille line per VLAN series) ────────────┤
//! ├─ Device Status (gauge rows) ─┬─ VLAN Usage (bars, 10% floor) ───────┤
//! └──────────────────────────────┴──────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, Gauge, GraphType,
    Paragraph,
};

use citygrid_core::charts::{self, StatusSlice, VlanBar};
use citygrid_core::{Device, TrafficDataset, VlanId, VlanNetwork};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// X-axis label every this many samples.
const X_LABEL_EVERY: usize = 6;

pub struct DashboardScreen {
    focused: bool,
    devices: Arc<Vec<Arc<Device>>>,
    vlans: Arc<Vec<Arc<VlanNetwork>>>,
    traffic: Arc<TrafficDataset>,
    selected_vlan: Option<VlanId>,
    /// Highlighted bar in the VLAN usage chart.
    bar_cursor: usize,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            devices: Arc::new(Vec::new()),
            vlans: Arc::new(Vec::new()),
            traffic: Arc::new(TrafficDataset::default()),
            selected_vlan: None,
            bar_cursor: 0,
        }
    }

    fn panel(title: &str) -> Block<'_> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let stats = charts::overview(&self.devices, &self.vlans);
        let cards = [
            ("Devices", stats.total_devices.to_string(), theme::NEON_CYAN),
            ("Online", stats.online.to_string(), theme::SUCCESS_GREEN),
            ("VLANs", stats.vlan_count.to_string(), theme::ELECTRIC_PURPLE),
            (
                "Avg Load",
                format!("{:.1}%", stats.average_traffic_load),
                theme::CORAL,
            ),
            ("Warnings", stats.warning.to_string(), theme::ELECTRIC_YELLOW),
        ];

        let columns = Layout::horizontal([Constraint::Ratio(1, 5); 5]).split(area);
        for ((label, value, color), col) in cards.into_iter().zip(columns.iter()) {
            let card = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Self::panel(label));
            frame.render_widget(card, *col);
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn render_traffic(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("Traffic Trend");
        if self.traffic.series.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No traffic data").style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let scale = charts::traffic_scale(&self.traffic);
        let points: Vec<Vec<(f64, f64)>> = self
            .traffic
            .series
            .iter()
            .map(|s| {
                s.values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect()
            })
            .collect();

        let datasets: Vec<Dataset> = self
            .traffic
            .series
            .iter()
            .zip(points.iter())
            .map(|(series, data)| {
                let mut style = Style::default().fg(theme::hex(series.color));
                if self.selected_vlan.is_some_and(|v| v != series.vlan_id) {
                    style = style.add_modifier(Modifier::DIM);
                }
                Dataset::default()
                    .name(series.label.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(style)
                    .data(data)
            })
            .collect();

        let x_max = self.traffic.labels.len().saturating_sub(1).max(1) as f64;
        let x_labels: Vec<Span> = x_axis_labels(&self.traffic.labels)
            .into_iter()
            .map(|l| Span::styled(l, Style::default().fg(theme::BORDER_GRAY)))
            .collect();
        // Axis labels run bottom to top.
        let y_labels: Vec<Span> = scale
            .labels
            .iter()
            .rev()
            .map(|l| Span::styled(l.to_string(), Style::default().fg(theme::BORDER_GRAY)))
            .collect();

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(x_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, scale.max.max(1.0)])
                    .labels(y_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );

        frame.render_widget(chart, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("Device Status");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let slices = charts::status_distribution(&self.devices);
        let rows = Layout::vertical(
            std::iter::repeat_n(Constraint::Length(1), slices.len())
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(inner);

        for (slice, row) in slices.iter().zip(rows.iter()) {
            frame.render_widget(status_gauge(slice), *row);
        }
    }

    fn render_vlan_usage(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("VLAN Usage");
        let usage = charts::vlan_usage(&self.vlans);
        if usage.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No VLANs").style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let bars: Vec<Bar> = usage
            .iter()
            .enumerate()
            .map(|(i, bar)| self.vlan_bar(bar, i == self.bar_cursor))
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(6)
            .bar_gap(2)
            .max(100);
        frame.render_widget(chart, area);
    }

    #[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn vlan_bar(&self, bar: &VlanBar, highlighted: bool) -> Bar<'static> {
        let mut label_style = Style::default().fg(theme::DIM_WHITE);
        if highlighted && self.focused {
            label_style = label_style.add_modifier(Modifier::REVERSED);
        }
        let marker = if self.selected_vlan == Some(bar.vlan_id) {
            "●"
        } else {
            ""
        };
        Bar::default()
            .value(bar.height_percent.round() as u64)
            .text_value(bar.value.to_string())
            .label(Line::from(Span::styled(
                format!("{marker}{}", bar.vlan_id),
                label_style,
            )))
            .style(Style::default().fg(theme::hex(bar.color)))
            .value_style(
                Style::default()
                    .fg(theme::BG_DARK)
                    .bg(theme::hex(bar.color))
                    .add_modifier(Modifier::BOLD),
            )
    }
}

fn status_gauge(slice: &StatusSlice) -> Gauge<'static> {
    let pct = charts::round1(slice.percentage);
    Gauge::default()
        .ratio((slice.percentage / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{:<12}{:>3}  {pct:>5.1}%",
            slice.status.label(),
            slice.count
        ))
        .gauge_style(
            Style::default()
                .fg(theme::status_color(slice.status))
                .bg(theme::BG_HIGHLIGHT),
        )
        .use_unicode(true)
}

/// Every sixth label plus the last one.
fn x_axis_labels(labels: &[String]) -> Vec<String> {
    let last = labels.len().saturating_sub(1);
    labels
        .iter()
        .enumerate()
        .filter(|(i, _)| i % X_LABEL_EVERY == 0 || *i == last)
        .map(|(_, l)| l.clone())
        .collect()
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let count = self.vlans.len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') if count > 0 => {
                self.bar_cursor = (self.bar_cursor + count - 1) % count;
            }
            KeyCode::Right | KeyCode::Char('l') if count > 0 => {
                self.bar_cursor = (self.bar_cursor + 1) % count;
            }
            KeyCode::Enter => {
                if let Some(vlan) = self.vlans.get(self.bar_cursor) {
                    return Ok(Some(Action::ToggleVlan(vlan.id)));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DevicesUpdated(devices) => self.devices = Arc::clone(devices),
            Action::VlansUpdated(vlans) => {
                self.vlans = Arc::clone(vlans);
                self.bar_cursor = self.bar_cursor.min(vlans.len().saturating_sub(1));
            }
            Action::TrafficLoaded(traffic) => self.traffic = Arc::clone(traffic),
            Action::SelectedVlanChanged(vlan) => self.selected_vlan = *vlan,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(area);

        self.render_cards(frame, rows[0]);
        self.render_traffic(frame, rows[1]);

        let bottom = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[2]);
        self.render_status(frame, bottom[0]);
        self.render_vlan_usage(frame, bottom[1]);
    }

    fn key_hints(&self) -> &'static str {
        "←/→ VLAN bar  Enter filter"
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Dashboard"
    }
}

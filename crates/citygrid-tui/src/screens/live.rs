//! Live screen — backend readings, VLAN assignments, and the simulator.
//!
//! `n` opens the simulate form over the screen. Submitting hands a
//! [`SimulationDraft`] to the app, which posts it in the background; the
//! form stays open with the error if the backend rejects it, and closes
//! with the outcome shown below the tables when it succeeds.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table, TableState,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use citygrid_core::charts::ReadingPoint;
use citygrid_core::{ConnectionState, LiveDevice, LiveQuery, LiveSnapshot, RuleSet, SimulationDraft};

use crate::action::{Action, SimulationOutcome};
use crate::component::Component;
use crate::screens::devices::cycle;
use crate::theme;

const TEMPERATURE_STEP: f64 = 1.0;
const TRAFFIC_STEP: f64 = 5.0;
const AIR_QUALITY_STEP: f64 = 10.0;

// ── Simulate form ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    DeviceId,
    Kind,
    Temperature,
    Traffic,
    AirQuality,
    Location,
}

impl FormField {
    const ALL: [Self; 7] = [
        Self::Name,
        Self::DeviceId,
        Self::Kind,
        Self::Temperature,
        Self::Traffic,
        Self::AirQuality,
        Self::Location,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::DeviceId => "Device ID",
            Self::Kind => "Type",
            Self::Temperature => "Temperature",
            Self::Traffic => "Traffic",
            Self::AirQuality => "Air quality",
            Self::Location => "Location",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::DeviceId | Self::Location)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FormOutcome {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
struct SimulateForm {
    draft: SimulationDraft,
    field: FormField,
    error: Option<String>,
}

impl SimulateForm {
    fn new() -> Self {
        Self {
            draft: SimulationDraft::default(),
            field: FormField::Name,
            error: None,
        }
    }

    fn focus(&mut self, forward: bool) {
        let len = FormField::ALL.len();
        let pos = FormField::ALL
            .iter()
            .position(|&f| f == self.field)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.field = FormField::ALL[next];
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Name => Some(&mut self.draft.name),
            FormField::DeviceId => Some(&mut self.draft.device_id),
            FormField::Location => Some(&mut self.draft.location),
            FormField::Kind
            | FormField::Temperature
            | FormField::Traffic
            | FormField::AirQuality => None,
        }
    }

    fn adjust(&mut self, sign: f64) {
        match self.field {
            FormField::Kind => self.draft.cycle_kind(),
            FormField::Temperature => self.draft.adjust_temperature(sign * TEMPERATURE_STEP),
            FormField::Traffic => self.draft.adjust_traffic(sign * TRAFFIC_STEP),
            FormField::AirQuality => self.draft.adjust_air_quality(sign * AIR_QUALITY_STEP),
            FormField::Name | FormField::DeviceId | FormField::Location => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => {
                if self.draft.name.trim().is_empty() {
                    self.error = Some("Name cannot be empty".into());
                    return FormOutcome::Continue;
                }
                self.error = None;
                return FormOutcome::Submit;
            }
            KeyCode::Tab | KeyCode::Down => self.focus(true),
            KeyCode::BackTab | KeyCode::Up => self.focus(false),
            KeyCode::Left if !self.field.is_text() => self.adjust(-1.0),
            KeyCode::Right | KeyCode::Char(' ') if !self.field.is_text() => self.adjust(1.0),
            KeyCode::Backspace => {
                if let Some(input) = self.text_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.text_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
        FormOutcome::Continue
    }

    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.draft.name.clone(),
            FormField::DeviceId => self.draft.device_id.clone(),
            FormField::Kind => self.draft.kind.clone(),
            FormField::Temperature => format!("{:.0} °C", self.draft.temperature),
            FormField::Traffic => format!("{:.0}", self.draft.traffic),
            FormField::AirQuality => format!("{:.0}", self.draft.air_quality),
            FormField::Location => self.draft.location.clone(),
        }
    }
}

// ── Screen ───────────────────────────────────────────────────────────

pub struct LiveScreen {
    focused: bool,
    snapshot: Arc<LiveSnapshot>,
    connection: ConnectionState,
    query: LiveQuery,
    table_state: TableState,
    form: Option<SimulateForm>,
    submitting: bool,
    throbber_state: ThrobberState,
    last_outcome: Option<SimulationOutcome>,
    last_error: Option<String>,
    rng: StdRng,
}

impl LiveScreen {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            focused: false,
            snapshot: Arc::new(LiveSnapshot::default()),
            connection: ConnectionState::Disconnected,
            query: LiveQuery::default(),
            table_state: TableState::default().with_selected(Some(0)),
            form: None,
            submitting: false,
            throbber_state: ThrobberState::default(),
            last_outcome: None,
            last_error: None,
            rng,
        }
    }

    /// Rules for previews: the backend's once fetched, otherwise its
    /// documented defaults.
    fn preview_rules(&self) -> RuleSet {
        let rules = self.snapshot.rules();
        if rules.is_empty() {
            RuleSet::backend_defaults()
        } else {
            rules.clone()
        }
    }

    /// Filtered devices, newest reading first.
    fn visible_devices(&self) -> Vec<&LiveDevice> {
        let mut devices: Vec<&LiveDevice> = self
            .snapshot
            .devices()
            .filter(|d| self.query.matches(d))
            .collect();
        devices.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        devices
    }

    fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .snapshot
            .devices()
            .map(|d| d.reading.category().to_owned())
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    fn cycle_category(&mut self) {
        let cats = self.categories();
        let idx = self
            .query
            .category
            .as_ref()
            .and_then(|c| cats.iter().position(|x| x == c));
        let indices: Vec<usize> = (0..cats.len()).collect();
        self.query.category = cycle(idx, &indices).and_then(|i| cats.get(i).cloned());
        self.table_state.select(Some(0));
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.visible_devices().len();
        if len == 0 {
            return;
        }
        let idx = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (idx + 1).min(len - 1)
        } else {
            idx.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn submit(&mut self, draft: SimulationDraft) -> Option<Action> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.last_error = None;
        Some(Action::SubmitSimulation(Box::new(draft)))
    }

    fn apply_result(&mut self, result: &Result<Box<SimulationOutcome>, String>) {
        self.submitting = false;
        match result {
            Ok(outcome) => {
                self.form = None;
                self.last_error = None;
                self.last_outcome = Some((**outcome).clone());
            }
            Err(message) => match self.form.as_mut() {
                Some(form) => form.error = Some(message.clone()),
                None => self.last_error = Some(message.clone()),
            },
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn banner(&self) -> Option<Line<'static>> {
        match &self.connection {
            ConnectionState::Failed(message) => Some(Line::from(vec![
                Span::styled(" ✗ ", Style::default().fg(theme::ERROR_RED)),
                Span::styled(
                    message.clone(),
                    Style::default()
                        .fg(theme::ERROR_RED)
                        .add_modifier(Modifier::BOLD),
                ),
            ])),
            ConnectionState::Disconnected => Some(Line::from(Span::styled(
                " No backend configured; set backend.url or pass --backend-url",
                Style::default().fg(theme::BORDER_GRAY),
            ))),
            ConnectionState::Connecting => Some(Line::from(Span::styled(
                " ◐ Connecting to backend…",
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ))),
            ConnectionState::Connected => None,
        }
    }

    fn summary_line(&self) -> Line<'static> {
        let overview = self.snapshot.overview();
        let fetched = self.snapshot.fetched_at().map_or_else(
            || "never".to_owned(),
            |t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
        );
        let mut spans = vec![
            Span::styled(" devices ", theme::key_hint()),
            Span::styled(
                overview.device_count.to_string(),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::styled("   vlans ", theme::key_hint()),
            Span::styled(
                overview.vlan_count.to_string(),
                Style::default().fg(theme::ELECTRIC_PURPLE),
            ),
            Span::styled("   updated ", theme::key_hint()),
            Span::styled(fetched, theme::table_row()),
        ];
        if let Some((vlan, n)) = overview.busiest_vlan {
            spans.push(Span::styled("   busiest ", theme::key_hint()));
            spans.push(Span::styled(
                format!("VLAN {vlan} ({n})"),
                Style::default().fg(theme::ELECTRIC_PURPLE),
            ));
        }
        if let Some((category, n)) = overview.top_category {
            spans.push(Span::styled("   top type ", theme::key_hint()));
            spans.push(Span::styled(
                format!("{category} ({n})"),
                Style::default().fg(theme::CORAL),
            ));
        }
        if let Some(cat) = &self.query.category {
            spans.push(Span::styled("   category ", theme::key_hint()));
            spans.push(Span::styled(cat.clone(), theme::tab_active()));
        }
        if !self.query.search.is_empty() {
            spans.push(Span::styled("   search ", theme::key_hint()));
            spans.push(Span::styled(
                format!("\"{}\"", self.query.search),
                Style::default().fg(theme::NEON_CYAN),
            ));
        }
        Line::from(spans)
    }

    fn render_devices(&self, frame: &mut Frame, area: Rect) {
        let devices = self.visible_devices();
        let block = Block::default()
            .title(format!(" Live Devices ({}) ", devices.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if devices.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No live devices",
                    Style::default().fg(theme::BORDER_GRAY),
                )),
                inner,
            );
            return;
        }

        let header = Row::new(
            ["ID", "Name", "Category", "Reading", "Location", "VLAN", "Updated"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = devices
            .iter()
            .map(|d| {
                let vlan = self
                    .snapshot
                    .vlan_of(&d.id)
                    .map_or_else(|| "-".to_owned(), |v| v.to_string());
                Row::new(vec![
                    Cell::from(d.id.clone()),
                    Cell::from(d.display_name().to_owned()),
                    Cell::from(d.reading.category().to_owned())
                        .style(Style::default().fg(theme::CORAL)),
                    Cell::from(d.reading.summary()),
                    Cell::from(d.location.clone().unwrap_or_default()),
                    Cell::from(vlan).style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(
                        d.timestamp
                            .with_timezone(&chrono::Local)
                            .format("%H:%M:%S")
                            .to_string(),
                    ),
                ])
                .style(theme::table_row())
            })
            .collect();
        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(12),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(5),
            Constraint::Length(9),
        ];
        let table = Table::new(rows, widths)
            .block(block)
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_assignments(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" VLAN Assignments ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let grouped = self.snapshot.devices_by_vlan();
        if grouped.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No assignments yet",
                    Style::default().fg(theme::BORDER_GRAY),
                )),
                inner,
            );
            return;
        }

        let mut lines = Vec::new();
        for (vlan, devices) in &grouped {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" VLAN {vlan}"),
                    Style::default()
                        .fg(theme::ELECTRIC_PURPLE)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  ({})", devices.len()), theme::key_hint()),
            ]));
            for d in devices {
                let reason = self
                    .snapshot
                    .assignment(&d.id)
                    .and_then(|a| a.reason.clone())
                    .unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled(format!("   {:<18}", d.id), theme::table_row()),
                    Span::styled(reason, theme::key_hint()),
                ]));
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_rules(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Rules ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rules = self.snapshot.rules();
        let lines: Vec<Line> = if rules.is_empty() {
            vec![Line::from(Span::styled(
                "  Rules load with the first backend poll",
                Style::default().fg(theme::BORDER_GRAY),
            ))]
        } else {
            rules
                .parameters()
                .iter()
                .map(|p| {
                    let mut spans = vec![Span::styled(
                        format!(" {:<12}", p.parameter),
                        Style::default().fg(theme::NEON_CYAN),
                    )];
                    for l in &p.levels {
                        spans.push(Span::styled(
                            format!("{} ≥{} → {}   ", l.level, l.threshold, l.vlan),
                            theme::table_row(),
                        ));
                    }
                    Line::from(spans)
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Temperature and traffic per reporting device, one sparkline each.
    fn render_readings(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Readings ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let overview = self.snapshot.overview();
        let rows = Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(inner);
        for ((label, series, color), row) in [
            ("temp", &overview.temperature_series, theme::CORAL),
            ("traffic", &overview.traffic_series, theme::NEON_CYAN),
        ]
        .into_iter()
        .zip(rows.iter())
        {
            let cols =
                Layout::horizontal([Constraint::Length(9), Constraint::Min(1)]).split(*row);
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {label}"), theme::key_hint())),
                cols[0],
            );
            if series.is_empty() {
                frame.render_widget(
                    Paragraph::new(Span::styled("no readings", Style::default().fg(theme::BORDER_GRAY))),
                    cols[1],
                );
                continue;
            }
            frame.render_widget(
                Sparkline::default()
                    .data(sparkline_values(series))
                    .style(Style::default().fg(color)),
                cols[1],
            );
        }
    }

    fn render_outcome(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(err) = &self.last_error {
            Line::from(vec![
                Span::styled(" ✗ simulate failed: ", Style::default().fg(theme::ERROR_RED)),
                Span::styled(err.clone(), theme::table_row()),
            ])
        } else if let Some(outcome) = &self.last_outcome {
            let vlan = outcome.assignment.as_ref().map_or_else(
                || "no VLAN returned".to_owned(),
                |a| format!("VLAN {}", a.vlan_id),
            );
            let reason = outcome
                .assignment
                .as_ref()
                .and_then(|a| a.reason.clone())
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(" ✓ ", Style::default().fg(theme::SUCCESS_GREEN)),
                Span::styled(
                    outcome.device.display_name().to_owned(),
                    Style::default().fg(theme::NEON_CYAN),
                ),
                Span::styled(format!(" [{}] → ", outcome.device.id), theme::key_hint()),
                Span::styled(vlan, Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(reason, theme::key_hint()),
            ])
        } else {
            Line::from(vec![
                Span::styled(" n ", theme::key_hint_key()),
                Span::styled("simulate  ", theme::key_hint()),
                Span::styled("T ", theme::key_hint_key()),
                Span::styled("traffic sensor  ", theme::key_hint()),
                Span::styled("E ", theme::key_hint_key()),
                Span::styled("environment sensor", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &SimulateForm) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 16u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let form_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, form_area);
        let block = Block::default()
            .title(" Simulate Device ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let mut lines = Vec::with_capacity(FormField::ALL.len() + 6);
        for field in FormField::ALL {
            let active = field == form.field;
            let marker = if active { "▸" } else { " " };
            let label_style = if active {
                Style::default().fg(theme::NEON_CYAN)
            } else {
                Style::default().fg(theme::DIM_WHITE)
            };
            let mut value = form.value(field);
            if active && field.is_text() {
                value.push('\u{2588}');
            }
            let value_span = if field.is_text() {
                Span::styled(value, Style::default().fg(theme::NEON_CYAN))
            } else {
                Span::styled(
                    format!("\u{25C2} {value} \u{25B8}"),
                    if active {
                        Style::default()
                            .fg(theme::ELECTRIC_PURPLE)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        theme::table_row()
                    },
                )
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {marker} "), Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(format!("{:<13}", field.label()), label_style),
                value_span,
            ]));
        }

        let preview = form.draft.preview(&self.preview_rules());
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("   expected ", theme::key_hint()),
            Span::styled(
                format!("VLAN {}", preview.vlan),
                Style::default().fg(theme::ELECTRIC_PURPLE),
            ),
            Span::styled(format!("  {}", preview.reason), theme::key_hint()),
        ]));

        if let Some(err) = &form.error {
            lines.push(Line::from(Span::styled(
                format!("   {err}"),
                Style::default().fg(theme::ERROR_RED),
            )));
        }

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        frame.render_widget(Paragraph::new(lines), rows[0]);

        if self.submitting {
            let throbber = Throbber::default()
                .label("  Submitting…")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, rows[1], &mut self.throbber_state.clone());
        } else {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(" ↑/↓ ", theme::key_hint_key()),
                    Span::styled("field  ", theme::key_hint()),
                    Span::styled("←/→ ", theme::key_hint_key()),
                    Span::styled("adjust  ", theme::key_hint()),
                    Span::styled("Enter ", theme::key_hint_key()),
                    Span::styled("submit  ", theme::key_hint()),
                    Span::styled("Esc ", theme::key_hint_key()),
                    Span::styled("cancel", theme::key_hint()),
                ])),
                rows[1],
            );
        }
    }
}

impl Component for LiveScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(form) = self.form.as_mut() {
            if self.submitting {
                return Ok(None);
            }
            return Ok(match form.handle_key(key) {
                FormOutcome::Continue => None,
                FormOutcome::Cancel => {
                    self.form = None;
                    None
                }
                FormOutcome::Submit => {
                    let draft = form.draft.clone();
                    self.submit(draft)
                }
            });
        }

        let action = match key.code {
            KeyCode::Char('n') => {
                self.form = Some(SimulateForm::new());
                None
            }
            KeyCode::Char('T') => {
                let draft = SimulationDraft::traffic_preset(&mut self.rng);
                self.submit(draft)
            }
            KeyCode::Char('E') => {
                let draft = SimulationDraft::environment_preset(&mut self.rng);
                self.submit(draft)
            }
            KeyCode::Char('r') => Some(Action::RefreshLive),
            KeyCode::Char('f') => {
                self.cycle_category();
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LiveUpdated(snapshot) => self.snapshot = Arc::clone(snapshot),
            Action::ConnectionChanged(state) => self.connection = state.clone(),
            Action::SimulationResult(result) => self.apply_result(result),
            Action::Tick if self.submitting => self.throbber_state.calc_next(),
            Action::SearchInput(query) if self.focused => {
                self.query.search.clone_from(query);
                self.table_state.select(Some(0));
            }
            Action::CloseSearch if self.focused => self.query.search.clear(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let banner = self.banner();
        let layout = Layout::vertical([
            Constraint::Length(u16::from(banner.is_some())),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(line) = banner {
            frame.render_widget(Paragraph::new(line), layout[0]);
        }
        frame.render_widget(Paragraph::new(self.summary_line()), layout[1]);

        let middle = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(layout[2]);
        self.render_devices(frame, middle[0]);
        self.render_assignments(frame, middle[1]);
        let bottom = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(layout[3]);
        self.render_rules(frame, bottom[0]);
        self.render_readings(frame, bottom[1]);
        self.render_outcome(frame, layout[4]);

        if let Some(form) = &self.form {
            self.render_form(frame, area, form);
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }

    fn searchable(&self) -> bool {
        true
    }

    fn key_hints(&self) -> &'static str {
        "n simulate  T/E quick add  r refresh  f category"
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Live"
    }
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sparkline_values(series: &[ReadingPoint]) -> Vec<u64> {
    series.iter().map(|p| p.value.max(0.0).round() as u64).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    use citygrid_core::{LiveAssignment, SimulateResponse};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn response(id: &str, name: &str, ts: f64, vlan: u32) -> SimulateResponse {
        serde_json::from_value(json!({
            "status": "success",
            "device": {
                "timestamp": ts,
                "topic": "smartcity/sensor",
                "data": {"device_id": id, "name": name, "type": "sensor", "temperature": 22.0}
            },
            "vlan": {"vlan_id": vlan, "timestamp": ts, "reason": "temperature medium"}
        }))
        .unwrap()
    }

    fn outcome(resp: &SimulateResponse) -> SimulationOutcome {
        SimulationOutcome {
            device: LiveDevice::from_record(resp.device_id(), &resp.device),
            assignment: resp
                .vlan
                .as_ref()
                .map(|v| LiveAssignment::from_wire(resp.device_id(), v)),
        }
    }

    fn text(screen: &LiveScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
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
    fn form_typing_and_adjusting_edits_the_draft() {
        let mut form = SimulateForm::new();
        for c in "Test Sensor".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Down)); // device id
        form.handle_key(key(KeyCode::Down)); // type
        form.handle_key(key(KeyCode::Right));
        form.handle_key(key(KeyCode::Down)); // temperature
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));

        assert_eq!(form.draft.name, "Test Sensor");
        assert_eq!(form.draft.kind, "traffic");
        assert_eq!(form.draft.temperature, 23.0);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Submit);
    }

    #[test]
    fn empty_name_is_rejected_in_the_form() {
        let mut form = SimulateForm::new();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Continue);
        assert_eq!(form.error.as_deref(), Some("Name cannot be empty"));
    }

    #[test]
    fn submit_then_error_keeps_form_open() {
        let mut screen = LiveScreen::new(Some(1));
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(screen.captures_input());
        for c in "Probe".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::SubmitSimulation(ref d)) if d.name == "Probe"));
        assert!(screen.submitting);

        // A second Enter while in flight does nothing.
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());

        screen
            .update(&Action::SimulationResult(Err("backend said no".into())))
            .unwrap();
        assert!(!screen.submitting);
        let form = screen.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("backend said no"));
        assert_eq!(form.draft.name, "Probe");
    }

    #[test]
    fn success_closes_form_and_shows_outcome() {
        let mut screen = LiveScreen::new(Some(1));
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        let resp = response("sim-1", "Test Sensor", 1_700_000_000.0, 10);
        screen
            .update(&Action::SimulationResult(Ok(Box::new(outcome(&resp)))))
            .unwrap();
        assert!(screen.form.is_none());
        assert!(!screen.captures_input());
        let rendered = text(&screen);
        assert!(rendered.contains("Test Sensor"));
        assert!(rendered.contains("VLAN 10"));
    }

    #[test]
    fn readings_panel_and_top_cards_render() {
        let mut screen = LiveScreen::new(Some(1));
        assert!(text(&screen).contains("no readings"));

        let snapshot = LiveSnapshot::default()
            .with_simulation(&response("a", "North", 1_000.0, 20))
            .with_simulation(&response("b", "South", 2_000.0, 20));
        screen
            .update(&Action::LiveUpdated(Arc::new(snapshot)))
            .unwrap();

        let rendered = text(&screen);
        assert!(rendered.contains("Readings"));
        assert!(rendered.contains("busiest VLAN 20 (2)"));
        assert!(rendered.contains("top type Environment (2)"));
        assert_eq!(
            sparkline_values(&screen.snapshot.overview().temperature_series),
            vec![22, 22]
        );
    }

    #[test]
    fn devices_sort_newest_first_and_filter_by_search() {
        let mut screen = LiveScreen::new(Some(1));
        screen.set_focused(true);
        let snapshot = LiveSnapshot::default()
            .with_simulation(&response("old", "Old Sensor", 1_000.0, 20))
            .with_simulation(&response("new", "New Sensor", 2_000.0, 10));
        screen
            .update(&Action::LiveUpdated(Arc::new(snapshot)))
            .unwrap();

        let ids: Vec<&str> = screen
            .visible_devices()
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["new", "old"]);

        screen.update(&Action::SearchInput("old".into())).unwrap();
        let ids: Vec<&str> = screen
            .visible_devices()
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["old"]);
    }

    #[test]
    fn failed_connection_shows_banner() {
        let mut screen = LiveScreen::new(Some(1));
        screen
            .update(&Action::ConnectionChanged(ConnectionState::Failed(
                "Failed to connect to the server.".into(),
            )))
            .unwrap();
        assert!(text(&screen).contains("Failed to connect to the server."));
    }

    #[test]
    fn quick_presets_submit_directly() {
        let mut screen = LiveScreen::new(Some(9));
        let action = screen.handle_key_event(key(KeyCode::Char('T'))).unwrap();
        assert!(matches!(action, Some(Action::SubmitSimulation(ref d)) if d.kind == "traffic"));
        assert!(screen.form.is_none());
    }
}

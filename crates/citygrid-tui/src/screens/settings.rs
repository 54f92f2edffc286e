//! Settings screen — effective configuration and the backend rule table.
//!
//! Configuration is shown read-only; edit it with `citygrid config set`.
//! Rules are editable one level at a time: `e` opens the editor, Enter
//! validates locally and posts the whole table, Esc cancels.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;

use citygrid_config::Config;
use citygrid_core::{ConnectionState, LiveSnapshot, RuleSet, VlanId};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

// ── Types ────────────────────────────────────────────────────────────

/// What the Settings screen echoes back about the running configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsInfo {
    pub backend_url: Option<String>,
    pub timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub insecure: bool,
    pub tick_rate_ms: u64,
    pub frame_rate_ms: u64,
    pub pulse_probability: f64,
    pub mqtt_broker: String,
    pub mqtt_port: u16,
    pub mqtt_topic: String,
    pub config_path: String,
    pub log_file: Option<String>,
}

impl SettingsInfo {
    /// `backend_url` is the URL actually in use, `None` when running on
    /// seed data only.
    pub fn new(
        cfg: &Config,
        backend_url: Option<String>,
        config_path: String,
        log_file: Option<String>,
    ) -> Self {
        Self {
            backend_url,
            timeout_secs: cfg.backend.timeout_secs,
            poll_interval_secs: cfg.backend.poll_interval_secs,
            insecure: cfg.backend.insecure,
            tick_rate_ms: cfg.tui.tick_rate_ms,
            frame_rate_ms: cfg.tui.frame_rate_ms,
            pulse_probability: cfg.tui.pulse_probability,
            mqtt_broker: cfg.mqtt.broker.clone(),
            mqtt_port: cfg.mqtt.port,
            mqtt_topic: cfg.mqtt.topic.clone(),
            config_path,
            log_file,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsState {
    Browsing,
    Editing,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditField {
    Threshold,
    Vlan,
}

/// One flattened rule row.
#[derive(Debug, Clone, PartialEq)]
struct RuleRow {
    parameter: String,
    level: String,
    threshold: f64,
    vlan: VlanId,
}

fn rule_rows(rules: &RuleSet) -> Vec<RuleRow> {
    rules
        .parameters()
        .iter()
        .flat_map(|p| {
            p.levels.iter().map(|l| RuleRow {
                parameter: p.parameter.clone(),
                level: l.level.clone(),
                threshold: l.threshold,
                vlan: l.vlan,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct RuleEditor {
    parameter: String,
    level: String,
    threshold: String,
    vlan: String,
    field: EditField,
    error: Option<String>,
}

impl RuleEditor {
    fn new(row: &RuleRow) -> Self {
        Self {
            parameter: row.parameter.clone(),
            level: row.level.clone(),
            threshold: format_threshold(row.threshold),
            vlan: row.vlan.to_string(),
            field: EditField::Threshold,
            error: None,
        }
    }

    fn input_mut(&mut self) -> &mut String {
        match self.field {
            EditField::Threshold => &mut self.threshold,
            EditField::Vlan => &mut self.vlan,
        }
    }

    /// The table with this edit applied, or a message for the user.
    fn apply(&self, rules: &RuleSet) -> std::result::Result<RuleSet, String> {
        let threshold: f64 = self
            .threshold
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", self.threshold.trim()))?;
        let vlan: VlanId = self
            .vlan
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a VLAN id", self.vlan.trim()))?;
        let mut next = rules.clone();
        next.set(&self.parameter, &self.level, threshold, vlan)
            .map_err(|e| e.to_string())?;
        Ok(next)
    }
}

fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

// ── Screen ───────────────────────────────────────────────────────────

pub struct SettingsScreen {
    focused: bool,
    info: SettingsInfo,
    connection: ConnectionState,
    rules: RuleSet,
    table_state: TableState,
    state: SettingsState,
    editor: Option<RuleEditor>,
    throbber_state: ThrobberState,
}

impl SettingsScreen {
    pub fn new(info: SettingsInfo) -> Self {
        Self {
            focused: false,
            info,
            connection: ConnectionState::Disconnected,
            rules: RuleSet::default(),
            table_state: TableState::default().with_selected(Some(0)),
            state: SettingsState::Browsing,
            editor: None,
            throbber_state: ThrobberState::default(),
        }
    }

    fn apply_snapshot(&mut self, snapshot: &Arc<LiveSnapshot>) {
        // Keep an in-flight edit's view stable until the save answers.
        if self.state == SettingsState::Browsing {
            self.rules = snapshot.rules().clone();
            let len = rule_rows(&self.rules).len();
            let idx = self.table_state.selected().unwrap_or(0);
            self.table_state
                .select(Some(idx.min(len.saturating_sub(1))));
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = rule_rows(&self.rules).len();
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

    fn open_editor(&mut self) {
        let rows = rule_rows(&self.rules);
        if let Some(row) = rows.get(self.table_state.selected().unwrap_or(0)) {
            self.editor = Some(RuleEditor::new(row));
            self.state = SettingsState::Editing;
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<Action> {
        let editor = self.editor.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.editor = None;
                self.state = SettingsState::Browsing;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                editor.field = match editor.field {
                    EditField::Threshold => EditField::Vlan,
                    EditField::Vlan => EditField::Threshold,
                };
            }
            KeyCode::Backspace => {
                editor.input_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                editor.input_mut().push(c);
            }
            KeyCode::Enter => match editor.apply(&self.rules) {
                Ok(next) => {
                    editor.error = None;
                    self.state = SettingsState::Saving;
                    return Some(Action::SaveRules(next));
                }
                Err(message) => editor.error = Some(message),
            },
            _ => {}
        }
        None
    }

    fn apply_saved(&mut self, result: &std::result::Result<RuleSet, String>) {
        match result {
            Ok(rules) => {
                self.rules = rules.clone();
                self.editor = None;
                self.state = SettingsState::Browsing;
            }
            Err(message) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.error = Some(message.clone());
                    self.state = SettingsState::Editing;
                } else {
                    self.state = SettingsState::Browsing;
                }
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn config_lines(&self) -> Vec<Line<'static>> {
        let info = &self.info;
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<16}"), theme::key_hint()),
                Span::styled(value, theme::table_row()),
            ])
        };

        let mut backend = vec![
            Span::styled(format!("  {:<16}", "Backend"), theme::key_hint()),
            Span::styled(
                info.backend_url
                    .clone()
                    .unwrap_or_else(|| "not configured".into()),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::raw("  "),
        ];
        backend.push(status_indicator::connection_span(&self.connection));

        vec![
            Line::from(backend),
            row(
                "Timeout",
                format!("{}s{}", info.timeout_secs, if info.insecure { "  (TLS unchecked)" } else { "" }),
            ),
            row(
                "Poll interval",
                if info.poll_interval_secs == 0 {
                    "off".into()
                } else {
                    format!("{}s", info.poll_interval_secs)
                },
            ),
            row(
                "MQTT",
                format!("{}:{}  {}", info.mqtt_broker, info.mqtt_port, info.mqtt_topic),
            ),
            row(
                "Frame / tick",
                format!(
                    "{} ms / {} ms   pulse p={}",
                    info.frame_rate_ms, info.tick_rate_ms, info.pulse_probability
                ),
            ),
            row("Config file", info.config_path.clone()),
            row(
                "Log file",
                info.log_file.clone().unwrap_or_else(|| "disabled".into()),
            ),
        ]
    }

    fn render_rules(&self, frame: &mut Frame, area: Rect) {
        let rows = rule_rows(&self.rules);
        let block = Block::default()
            .title(format!(" Assignment Rules ({}) ", rows.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if rows.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let message = match self.connection {
                ConnectionState::Disconnected => "  Rules live on the backend; none is configured",
                _ => "  Rules load with the first backend poll",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(theme::BORDER_GRAY))),
                inner,
            );
            return;
        }

        let header = Row::new(
            ["Parameter", "Level", "Threshold", "VLAN"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let body: Vec<Row> = rows
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.parameter.clone()).style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(r.level.clone()),
                    Cell::from(format!("≥ {}", format_threshold(r.threshold))),
                    Cell::from(r.vlan.to_string()).style(Style::default().fg(theme::ELECTRIC_PURPLE)),
                ])
                .style(theme::table_row())
            })
            .collect();
        let table = Table::new(
            body,
            [
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Length(12),
                Constraint::Length(6),
            ],
        )
        .block(block)
        .header(header)
        .row_highlight_style(theme::table_selected());
        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, editor: &RuleEditor) {
        let width = 46u16.min(area.width.saturating_sub(4));
        let height = 9u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    format!("{}.{}", editor.parameter, editor.level),
                    Style::default()
                        .fg(theme::NEON_CYAN)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_PURPLE))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let field = |label: &str, value: &str, active: bool| {
            let text = if active && self.state == SettingsState::Editing {
                format!("{value}\u{2588}")
            } else {
                value.to_owned()
            };
            Line::from(vec![
                Span::styled(
                    format!("  {label:<11}"),
                    if active {
                        Style::default().fg(theme::NEON_CYAN)
                    } else {
                        Style::default().fg(theme::DIM_WHITE)
                    },
                ),
                Span::styled(text, Style::default().fg(theme::NEON_CYAN)),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field(
                "Threshold",
                &editor.threshold,
                editor.field == EditField::Threshold,
            ),
            field("VLAN", &editor.vlan, editor.field == EditField::Vlan),
            Line::from(""),
        ];
        if let Some(err) = &editor.error {
            lines.push(Line::from(Span::styled(
                format!("  {err}"),
                Style::default().fg(theme::ERROR_RED),
            )));
        }

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        frame.render_widget(Paragraph::new(lines), layout[0]);

        if self.state == SettingsState::Saving {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("  Saving rules...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, layout[1], &mut self.throbber_state.clone());
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Tab field  Enter save  Esc cancel",
                    theme::key_hint(),
                ))
                .alignment(Alignment::Center),
                layout[1],
            );
        }
    }
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.state {
            SettingsState::Saving => Ok(None),
            SettingsState::Editing => Ok(self.handle_editor_key(key)),
            SettingsState::Browsing => {
                match key.code {
                    KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
                    KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
                    KeyCode::Char('e') | KeyCode::Enter => self.open_editor(),
                    KeyCode::Char('r') => return Ok(Some(Action::RefreshLive)),
                    _ => {}
                }
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LiveUpdated(snapshot) => self.apply_snapshot(snapshot),
            Action::ConnectionChanged(state) => self.connection = state.clone(),
            Action::RulesSaved(result) => self.apply_saved(result),
            Action::Tick if self.state == SettingsState::Saving => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = self.config_lines();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
        let layout = Layout::vertical([Constraint::Length(height), Constraint::Min(4)]).split(area);

        let block = Block::default()
            .title(" Configuration ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);
        frame.render_widget(Paragraph::new(lines), inner);

        self.render_rules(frame, layout[1]);

        if let Some(editor) = &self.editor {
            self.render_editor(frame, area, editor);
        }
    }

    fn captures_input(&self) -> bool {
        self.state != SettingsState::Browsing
    }

    fn key_hints(&self) -> &'static str {
        "j/k move  e edit rule  r refresh"
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Settings"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn screen_with_rules() -> SettingsScreen {
        let info = SettingsInfo::new(
            &Config::default(),
            Some("http://localhost:5000/api".into()),
            "/tmp/citygrid/config.toml".into(),
            None,
        );
        let mut screen = SettingsScreen::new(info);
        let snapshot = LiveSnapshot::default().with_rules(RuleSet::backend_defaults());
        screen
            .update(&Action::LiveUpdated(Arc::new(snapshot)))
            .unwrap();
        screen
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn type_text(screen: &mut SettingsScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn edit_posts_whole_table_with_change() {
        let mut screen = screen_with_rules();
        let first = rule_rows(&screen.rules)[0].clone();

        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(screen.captures_input());
        for _ in 0..8 {
            screen.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        type_text(&mut screen, "33");
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        let Some(Action::SaveRules(next)) = action else {
            panic!("expected SaveRules");
        };
        let rule = next.get(&first.parameter, &first.level).unwrap();
        assert_eq!(rule.threshold, 33.0);
        assert_eq!(rule.vlan, first.vlan);
        assert_eq!(next.rule_count(), screen.rules.rule_count());
        assert_eq!(screen.state, SettingsState::Saving);
    }

    #[test]
    fn invalid_number_stays_in_editor() {
        let mut screen = screen_with_rules();
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        for _ in 0..4 {
            screen.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(action.is_none());
        let editor = screen.editor.as_ref().unwrap();
        assert_eq!(editor.error.as_deref(), Some("'' is not a VLAN id"));
        assert_eq!(screen.state, SettingsState::Editing);
    }

    #[test]
    fn save_failure_reopens_editor_and_success_closes_it() {
        let mut screen = screen_with_rules();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        let Some(Action::SaveRules(next)) = action else {
            panic!("expected SaveRules");
        };

        screen
            .update(&Action::RulesSaved(Err("Failed to update rules".into())))
            .unwrap();
        assert_eq!(screen.state, SettingsState::Editing);
        assert_eq!(
            screen.editor.as_ref().unwrap().error.as_deref(),
            Some("Failed to update rules")
        );

        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        screen.update(&Action::RulesSaved(Ok(next))).unwrap();
        assert_eq!(screen.state, SettingsState::Browsing);
        assert!(screen.editor.is_none());
        assert!(!screen.captures_input());
    }

    #[test]
    fn renders_configuration_and_rules() {
        let screen = screen_with_rules();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("http://localhost:5000/api"));
        assert!(text.contains("localhost:1883"));
        assert!(text.contains("temperature"));
    }

    #[test]
    fn whole_thresholds_render_without_decimals() {
        assert_eq!(format_threshold(30.0), "30");
        assert_eq!(format_threshold(2.5), "2.5");
    }
}

//! Application core — event loop, screen management, action dispatch.
//!
//! Screens never touch the store or the backend directly. They emit request
//! actions (`ToggleVlan`, `MoveNode`, `SubmitSimulation`, ...) which the app
//! carries out here; the results come back through the data bridge or as
//! result actions on the same channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use citygrid_core::{
    ConnectionState, LiveAssignment, LiveDevice, NetworkStore, RemoteSync, RuleSet,
    SimulationDraft,
};

use crate::action::{Action, Notification, SimulationOutcome};
use crate::component::Component;
use crate::event::{Event, EventReader, Rates};
use crate::screen::ScreenId;
use crate::screens::{ScreenOptions, create_screens};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::status_indicator;

const NOT_CONNECTED: &str = "Not connected to a backend";
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection: ConnectionState,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    /// Terminal size for responsive layout.
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// The seed-data provider every screen reads from.
    store: Arc<NetworkStore>,
    /// Backend poller, when a backend is configured.
    sync: Option<RemoteSync>,
    rates: Rates,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(
        store: Arc<NetworkStore>,
        sync: Option<RemoteSync>,
        rates: Rates,
        opts: ScreenOptions,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(opts).into_iter().collect();

        Self {
            active_screen: ScreenId::Dashboard,
            previous_screen: None,
            screens,
            running: true,
            connection: ConnectionState::Disconnected,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            store,
            sync,
            rates,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;

        let store = Arc::clone(&self.store);
        let sync = self.sync.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(store, sync, tx, cancel).await;
        });

        let mut events = EventReader::new(self.rates);

        info!(
            tick_ms = self.rates.tick.as_millis(),
            frame_ms = self.rates.render.as_millis(),
            "TUI event loop started"
        );

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // The bridge shuts the poller down on cancel; nothing lands after exit.
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl_c = key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c');

        // Open forms capture all keys except Ctrl+C
        if self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input())
        {
            if ctrl_c {
                return Ok(Some(Action::Quit));
            }
            if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                return screen.handle_key_event(key);
            }
            return Ok(None);
        }

        if self.search_active {
            return match key.code {
                KeyCode::Esc => {
                    self.search_query.clear();
                    Ok(Some(Action::CloseSearch))
                }
                // Keep the filter, leave the prompt.
                KeyCode::Enter => {
                    self.search_active = false;
                    Ok(None)
                }
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Ok(Some(Action::SearchInput(self.search_query.clone())))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Ok(Some(Action::SearchInput(self.search_query.clone())))
                }
                _ => Ok(None),
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char('/')) => {
                let searchable = self
                    .screens
                    .get(&self.active_screen)
                    .is_some_and(|s| s.searchable());
                if searchable {
                    return Ok(Some(Action::OpenSearch));
                }
                return Ok(None);
            }

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='6')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT | KeyModifiers::NONE, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    /// Process a single action — update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if self.search_active {
                        self.search_active = false;
                        self.search_query.clear();
                        self.forward_to_active(&Action::CloseSearch)?;
                    }
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::OpenSearch => {
                self.search_active = true;
                self.search_query.clear();
            }

            Action::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
                self.forward_to_active(action)?;
            }

            Action::Tick => {
                // Auto-dismiss notifications
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                self.forward_to_active(action)?;
            }

            // ── Store requests ───────────────────────────────────────
            Action::SelectVlan(vlan) => self.store.set_selected_vlan(*vlan),
            Action::ToggleVlan(vlan) => self.store.toggle_vlan(*vlan),
            Action::SelectDevice(device) => self.store.set_selected_device(device.clone()),
            Action::MoveNode { id, x, y } => {
                if let Err(e) = self.store.move_node(id, *x, *y) {
                    warn!(node = %id, error = %e, "move rejected");
                    self.action_tx
                        .send(Action::Notify(Notification::error(e.to_string())))?;
                }
            }

            // ── Backend requests ─────────────────────────────────────
            Action::RefreshLive => self.refresh_live(),
            Action::SubmitSimulation(draft) => self.submit_simulation(draft),
            Action::SaveRules(rules) => self.save_rules(rules.clone()),

            Action::ConnectionChanged(state) => {
                self.connection = state.clone();
                self.broadcast(action)?;
            }

            // Data updates and results go to ALL screens so they stay in sync
            Action::VlansUpdated(_)
            | Action::DevicesUpdated(_)
            | Action::NodesUpdated(_)
            | Action::LinksUpdated(_)
            | Action::TrafficLoaded(_)
            | Action::SelectedVlanChanged(_)
            | Action::SelectedDeviceChanged(_)
            | Action::LiveUpdated(_)
            | Action::SimulationResult(_)
            | Action::RulesSaved(_) => self.broadcast(action)?,

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            // Render (topology pulses) and search input go to the active screen
            other => self.forward_to_active(other)?,
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn forward_to_active(&mut self, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Backend tasks ────────────────────────────────────────────────

    fn refresh_live(&self) {
        let Some(sync) = self.sync.clone() else {
            let _ = self
                .action_tx
                .send(Action::Notify(Notification::error(NOT_CONNECTED)));
            return;
        };
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match sync.refresh().await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::info("Live data refreshed")));
                }
                Err(e) => {
                    warn!(error = %e, "manual refresh failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn submit_simulation(&self, draft: &SimulationDraft) {
        let Some(sync) = self.sync.clone() else {
            let _ = self
                .action_tx
                .send(Action::SimulationResult(Err(NOT_CONNECTED.into())));
            return;
        };
        let request = draft.to_request();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match sync.simulate(&request).await {
                Ok(response) => {
                    let id = response.device_id();
                    let outcome = SimulationOutcome {
                        device: LiveDevice::from_record(id, &response.device),
                        assignment: response
                            .vlan
                            .as_ref()
                            .map(|v| LiveAssignment::from_wire(id, v)),
                    };
                    let message = match &outcome.assignment {
                        Some(a) => format!("{} → VLAN {}", outcome.device.display_name(), a.vlan_id),
                        None => format!("{} simulated", outcome.device.display_name()),
                    };
                    let _ = tx.send(Action::SimulationResult(Ok(Box::new(outcome))));
                    let _ = tx.send(Action::Notify(Notification::success(message)));
                }
                Err(e) => {
                    let _ = tx.send(Action::SimulationResult(Err(e.to_string())));
                    let _ = tx.send(Action::Notify(Notification::error("Simulation failed")));
                }
            }
        });
    }

    fn save_rules(&self, rules: RuleSet) {
        let Some(sync) = self.sync.clone() else {
            let _ = self
                .action_tx
                .send(Action::RulesSaved(Err(NOT_CONNECTED.into())));
            return;
        };
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match sync.update_rules(&rules).await {
                Ok(saved) => {
                    let _ = tx.send(Action::RulesSaved(Ok(saved)));
                    let _ = tx.send(Action::Notify(Notification::success("Rules saved")));
                }
                Err(e) => {
                    warn!(error = %e, "rule update failed");
                    let _ = tx.send(Action::RulesSaved(Err(e.to_string())));
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays on top (last = topmost)
        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let narrow = self.terminal_size.0 > 0 && self.terminal_size.0 < 80;
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow { id.label_short() } else { id.label() };
                Line::from(Span::styled(format!(" {} {label} ", id.number()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(&self.search_query, Style::default().fg(theme::NEON_CYAN)),
                Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc clear  Enter keep", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let mut spans = vec![
            Span::raw(" "),
            status_indicator::connection_span(&self.connection),
        ];
        let screen_hints = self
            .screens
            .get(&self.active_screen)
            .map_or("", |s| s.key_hints());
        if !screen_hints.is_empty() {
            spans.push(Span::styled(format!(" │ {screen_hints}"), theme::key_hint()));
        }
        spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn help_row(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
        Span::styled(label, theme::key_hint()),
    ])
}

/// Centered help overlay.
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 60u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        ))
    };

    let help_text = vec![
        Line::from(""),
        section("Navigation"),
        help_row("1-6", "Jump to screen"),
        help_row("Tab", "Next / Shift+Tab previous screen"),
        help_row("j/k ↑/↓", "Move up/down"),
        help_row("Enter", "Select / toggle VLAN filter"),
        help_row("Esc", "Back / close"),
        Line::from(""),
        section("Topology"),
        help_row("click/drag", "Select and move nodes"),
        help_row("wheel +/-", "Zoom (0 resets)"),
        help_row("[ ] a", "Cycle VLAN chips / show all"),
        Line::from(""),
        section("Global"),
        help_row("/", "Search (Devices, Live)"),
        help_row("n", "Simulate a device (Live)"),
        help_row("e", "Edit a rule (Settings)"),
        help_row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "                         Esc or ? to close",
            theme::key_hint(),
        )),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    use crate::action::NotificationLevel;

    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height.min(area.height));

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        toast_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(&notif.message, Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use citygrid_config::Config;

    use super::*;
    use crate::screens::SettingsInfo;

    fn app() -> App {
        let opts = ScreenOptions {
            pulse_probability: 0.0,
            seed: Some(7),
            settings: SettingsInfo::new(&Config::default(), None, "config.toml".into(), None),
        };
        let mut app = App::new(
            Arc::new(NetworkStore::seeded(Some(7))),
            None,
            Rates::from_millis(250, 33),
            opts,
        );
        app.init_screens().unwrap();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    /// Run everything queued, like one pass of the event loop.
    fn drain(app: &mut App) -> Vec<Action> {
        let mut seen = Vec::new();
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
            seen.push(action);
        }
        seen
    }

    #[test]
    fn number_keys_switch_and_escape_goes_back() {
        let mut app = app();
        let action = app.handle_key_event(key(KeyCode::Char('4'))).unwrap().unwrap();
        app.process_action(&action).unwrap();
        assert_eq!(app.active_screen, ScreenId::Topology);

        let back = app.handle_key_event(key(KeyCode::Esc)).unwrap().unwrap();
        app.process_action(&back).unwrap();
        drain(&mut app);
        assert_eq!(app.active_screen, ScreenId::Dashboard);
    }

    #[test]
    fn search_only_opens_on_searchable_screens() {
        let mut app = app();
        assert!(app.handle_key_event(key(KeyCode::Char('/'))).unwrap().is_none());

        app.process_action(&Action::SwitchScreen(ScreenId::Devices)).unwrap();
        let open = app.handle_key_event(key(KeyCode::Char('/'))).unwrap().unwrap();
        app.process_action(&open).unwrap();
        assert!(app.search_active);

        let input = app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(matches!(input, Some(Action::SearchInput(ref q)) if q == "q"));
        assert!(app.running);
    }

    #[test]
    fn toggle_vlan_goes_through_the_store() {
        let mut app = app();
        app.process_action(&Action::ToggleVlan(20)).unwrap();
        assert_eq!(app.store.selected_vlan(), Some(20));
        app.process_action(&Action::ToggleVlan(20)).unwrap();
        assert_eq!(app.store.selected_vlan(), None);
    }

    #[test]
    fn simulate_without_backend_reports_error() {
        let mut app = app();
        app.process_action(&Action::SubmitSimulation(Box::default()))
            .unwrap();
        let seen = drain(&mut app);
        assert!(seen.iter().any(|a| matches!(
            a,
            Action::SimulationResult(Err(msg)) if msg == NOT_CONNECTED
        )));
    }

    #[test]
    fn moving_unknown_node_raises_a_toast() {
        let mut app = app();
        app.process_action(&Action::MoveNode {
            id: "ghost".into(),
            x: 1.0,
            y: 2.0,
        })
        .unwrap();
        drain(&mut app);
        let (notif, _) = app.notification.as_ref().unwrap();
        assert_eq!(notif.level, crate::action::NotificationLevel::Error);
    }

    #[test]
    fn open_form_captures_global_keys() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Live)).unwrap();
        assert!(app.handle_key_event(key(KeyCode::Char('n'))).unwrap().is_none());
        // 'q' is typed into the form instead of quitting.
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        let quit = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(quit, Some(Action::Quit)));
    }
}

//! Topology screen — the VLAN-colored network graph on a Braille canvas.
//!
//! Nodes live in an 800×600 logical space. The canvas maps the viewport's
//! visible rectangle onto the terminal area, flipping y so logical "down"
//! is screen down. Mouse positions travel the other way through
//! [`surface_point`] and [`Viewport::to_logical`], which keeps hit testing
//! in step with what is drawn at every zoom level.

use std::cell::Cell;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{self, Canvas, Circle, Context, Rectangle};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use citygrid_core::filter::{filtered_links, filtered_nodes};
use citygrid_core::topology::{
    LINK_DASH, LabelPill, NodeStyle, Paint, PointerState, Point, Pulse, Selection, Viewport,
    link_style, pulse,
};
use citygrid_core::{NetworkLink, NetworkNode, VlanId, VlanNetwork};

use crate::action::Action;
use crate::component::Component;
use crate::screens::devices::cycle;
use crate::theme;
use crate::widgets::{status_indicator, sub_tabs};

/// Arrow keys nudge the selected node this far in logical units.
const NUDGE: f64 = 10.0;
/// Terminal dots are much coarser than pixels; dashes are stretched to stay
/// visible.
const DASH_SCALE: f64 = 2.0;
/// Logical width of one label character, for pill sizing.
const LABEL_CHAR_WIDTH: f64 = 7.0;
const DETAIL_WIDTH: u16 = 36;

pub struct TopologyScreen {
    focused: bool,
    nodes: Arc<Vec<Arc<NetworkNode>>>,
    links: Arc<Vec<Arc<NetworkLink>>>,
    vlans: Arc<Vec<Arc<VlanNetwork>>>,
    selected_vlan: Option<VlanId>,
    selected_device: Option<String>,
    viewport: Viewport,
    pointer: PointerState,
    pulses: Vec<Pulse>,
    pulse_probability: f64,
    rng: StdRng,
    /// Canvas area from the last frame, for mouse mapping.
    last_area: Cell<Rect>,
}

/// Map a terminal cell to a point on the 800×600 surface, or `None` when
/// the cell is outside `area`.
#[allow(clippy::as_conversions)]
pub(crate) fn surface_point(area: Rect, size: (f64, f64), column: u16, row: u16) -> Option<Point> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    Some(Point::new(fx * size.0, fy * size.1))
}

/// Split the segment `a`→`b` into the "on" pieces of an on/off dash.
pub(crate) fn dash_segments(a: Point, b: Point, pattern: [f64; 2]) -> Vec<(Point, Point)> {
    let length = (b.x - a.x).hypot(b.y - a.y);
    let [on, off] = pattern;
    if length <= f64::EPSILON || on <= 0.0 {
        return vec![(a, b)];
    }
    let period = on + off.max(0.0);
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + on).min(length);
        segments.push((a.lerp(b, start / length), a.lerp(b, end / length)));
        start += period;
    }
    segments
}

impl TopologyScreen {
    pub fn new(pulse_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            focused: false,
            nodes: Arc::new(Vec::new()),
            links: Arc::new(Vec::new()),
            vlans: Arc::new(Vec::new()),
            selected_vlan: None,
            selected_device: None,
            viewport: Viewport::default(),
            pointer: PointerState::default(),
            pulses: Vec::new(),
            pulse_probability,
            rng,
            last_area: Cell::new(Rect::default()),
        }
    }

    fn vlan(&self, id: VlanId) -> Option<&VlanNetwork> {
        self.vlans.iter().find(|v| v.id == id).map(Arc::as_ref)
    }

    fn visible_nodes(&self) -> Vec<Arc<NetworkNode>> {
        filtered_nodes(&self.nodes, self.selected_vlan)
    }

    /// Visible links paired with both endpoints; links with an endpoint
    /// outside the visible set are not drawn.
    fn visible_links(
        &self,
        nodes: &[Arc<NetworkNode>],
    ) -> Vec<(Arc<NetworkLink>, Arc<NetworkNode>, Arc<NetworkNode>)> {
        let node_vlan = |id: &str| self.nodes.iter().find(|n| n.id == id).map(|n| n.vlan_id);
        filtered_links(&self.links, self.selected_vlan, node_vlan)
            .into_iter()
            .filter_map(|link| {
                let source = nodes.iter().find(|n| n.id == link.source)?;
                let target = nodes.iter().find(|n| n.id == link.target)?;
                Some((Arc::clone(&link), Arc::clone(source), Arc::clone(target)))
            })
            .collect()
    }

    fn roll_pulses(&mut self) {
        let nodes = self.visible_nodes();
        let links = self.visible_links(&nodes);
        let mut pulses = Vec::new();
        for (link, source, target) in &links {
            let vlan = self.vlans.iter().find(|v| v.id == link.vlan_id).cloned();
            if let Some(p) = pulse(
                source,
                target,
                vlan.as_deref(),
                self.pulse_probability,
                &mut self.rng,
            ) {
                pulses.push(p);
            }
        }
        self.pulses = pulses;
    }

    fn logical_at(&self, column: u16, row: u16) -> Option<Point> {
        surface_point(self.last_area.get(), self.viewport.size(), column, row)
            .map(|p| self.viewport.to_logical(p))
    }

    fn selected_node(&self) -> Option<&Arc<NetworkNode>> {
        let id = self.selected_device.as_deref()?;
        self.nodes.iter().find(|n| n.id == id)
    }

    fn nudge(&self, dx: f64, dy: f64) -> Option<Action> {
        let node = self.selected_node()?;
        Some(Action::MoveNode {
            id: node.id.clone(),
            x: node.x + dx,
            y: node.y + dy,
        })
    }

    /// Select the next (or previous) visible node in draw order.
    fn step_selection(&self, forward: bool) -> Option<Action> {
        let nodes = self.visible_nodes();
        if nodes.is_empty() {
            return None;
        }
        let current = self
            .selected_device
            .as_deref()
            .and_then(|id| nodes.iter().position(|n| n.id == id));
        let len = nodes.len();
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        Some(Action::SelectDevice(Some(nodes[next].id.clone())))
    }

    fn chip_line(&self) -> Line<'static> {
        let mut labels = vec!["All".to_owned()];
        labels.extend(self.vlans.iter().map(|v| v.id.to_string()));
        let active = self
            .selected_vlan
            .and_then(|sel| self.vlans.iter().position(|v| v.id == sel))
            .map_or(0, |i| i + 1);
        sub_tabs::render_sub_tabs("  vlan:", &labels, active)
    }

    fn paint_links(
        &self,
        ctx: &mut Context<'_>,
        links: &[(Arc<NetworkLink>, Arc<NetworkNode>, Arc<NetworkNode>)],
    ) {
        for (link, source, target) in links {
            let style = link_style(link, self.vlan(link.vlan_id));
            let color = theme::paint(style.paint);
            let a = Point::new(source.x, -source.y);
            let b = Point::new(target.x, -target.y);
            let segments = match style.dash {
                Some([on, off]) => dash_segments(a, b, [on * DASH_SCALE, off * DASH_SCALE]),
                None => vec![(a, b)],
            };
            for (p, q) in segments {
                ctx.draw(&canvas::Line {
                    x1: p.x,
                    y1: p.y,
                    x2: q.x,
                    y2: q.y,
                    color,
                });
            }
        }
    }

    fn paint_nodes(&self, ctx: &mut Context<'_>, nodes: &[Arc<NetworkNode>]) {
        let hovered = self.pointer.hovered();
        for node in nodes {
            let emphasized = self.selected_device.as_deref() == Some(node.id.as_str())
                || hovered == Some(node.id.as_str());
            let style = NodeStyle::for_node(node, self.vlan(node.vlan_id), emphasized);
            let (x, y) = (node.x, -node.y);

            if let Some(blur) = style.glow {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: style.radius + blur / 2.0,
                    color: theme::paint(Paint::HexAlpha {
                        color: style.stroke,
                        alpha: 110,
                    }),
                });
            }

            let fill = theme::hex(style.fill);
            let mut r = style.radius - style.line_width;
            while r > 0.0 {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: r,
                    color: fill,
                });
                r -= 2.0;
            }
            ctx.draw(&Circle {
                x,
                y,
                radius: style.radius,
                color: theme::hex(style.stroke),
            });
        }
    }

    fn paint_labels(&self, ctx: &mut Context<'_>, nodes: &[Arc<NetworkNode>]) {
        let hovered = self.pointer.hovered();
        for node in nodes {
            let emphasized = self.selected_device.as_deref() == Some(node.id.as_str())
                || hovered == Some(node.id.as_str());
            let style = NodeStyle::for_node(node, self.vlan(node.vlan_id), emphasized);

            ctx.print(
                node.x,
                -node.y,
                Span::styled(
                    style.glyph,
                    Style::default()
                        .fg(theme::hex(style.glyph_color))
                        .add_modifier(Modifier::BOLD),
                ),
            );

            if style.show_label {
                #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
                let text_width = node.label.chars().count() as f64 * LABEL_CHAR_WIDTH;
                let pill = LabelPill::layout(node, style.radius, text_width);
                ctx.draw(&Rectangle {
                    x: pill.x,
                    y: -(pill.y + pill.height),
                    width: pill.width,
                    height: pill.height,
                    color: theme::paint(Paint::LABEL_BACKGROUND),
                });
                ctx.print(
                    pill.x + 5.0,
                    -pill.text_y,
                    Span::styled(node.label.clone(), Style::default().fg(theme::DIM_WHITE)),
                );
            }
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, node: &NetworkNode) {
        let vlan = self.vlan(node.vlan_id);
        let accent = vlan.map_or(theme::DIM_WHITE, |v| theme::hex(v.color));
        let block = Block::default()
            .title(format!(" {} ", node.label))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let row = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!(" {label:<9}"), theme::key_hint()),
                Span::styled(value, theme::table_row()),
            ])
        };

        let mut lines = vec![
            row("id", node.id.clone()),
            row("type", node.device_type.label().to_owned()),
            Line::from(vec![
                Span::styled(format!(" {:<9}", "status"), theme::key_hint()),
                status_indicator::status_span(node.status),
                Span::styled(
                    format!(" {}", node.status.label()),
                    Style::default().fg(theme::status_color(node.status)),
                ),
            ]),
            row(
                "vlan",
                vlan.map_or_else(|| "Unassigned".to_owned(), VlanNetwork::display_name),
            ),
            row("position", format!("{:.0}, {:.0}", node.x, node.y)),
            Line::from(""),
            Line::from(Span::styled(" Links", Style::default().fg(theme::NEON_CYAN))),
        ];

        for link in self.links.iter().filter(|l| l.touches(&node.id)) {
            let peer = if link.source == node.id {
                &link.target
            } else {
                &link.source
            };
            let kind = if link.is_cross_vlan() {
                "cross".to_owned()
            } else {
                format!("vlan {}", link.vlan_id)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  → {peer:<9}"), theme::table_row()),
                Span::styled(
                    format!("{kind:<8} {:.0}%", link.strength * 100.0),
                    theme::key_hint(),
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for TopologyScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('+' | '=') => {
                self.viewport.zoom_in();
                None
            }
            KeyCode::Char('-') => {
                self.viewport.zoom_out();
                None
            }
            KeyCode::Char('0') => {
                self.viewport.reset();
                None
            }
            KeyCode::Char(']') => {
                let ids: Vec<VlanId> = self.vlans.iter().map(|v| v.id).collect();
                Some(Action::SelectVlan(cycle(self.selected_vlan, &ids)))
            }
            KeyCode::Char('[') => {
                let ids: Vec<VlanId> = self.vlans.iter().rev().map(|v| v.id).collect();
                Some(Action::SelectVlan(cycle(self.selected_vlan, &ids)))
            }
            KeyCode::Char('a') => Some(Action::SelectVlan(None)),
            KeyCode::Char('n') => self.step_selection(true),
            KeyCode::Char('N') => self.step_selection(false),
            KeyCode::Char('x') => Some(Action::SelectDevice(None)),
            KeyCode::Left => self.nudge(-NUDGE, 0.0),
            KeyCode::Right => self.nudge(NUDGE, 0.0),
            KeyCode::Up => self.nudge(0.0, -NUDGE),
            KeyCode::Down => self.nudge(0.0, NUDGE),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let at = self.logical_at(mouse.column, mouse.row);
        let nodes = self.visible_nodes();

        let action = match (mouse.kind, at) {
            (MouseEventKind::Down(MouseButton::Left), Some(p)) => {
                match self.pointer.press(&nodes, p) {
                    Selection::Select(id) => Some(Action::SelectDevice(Some(id))),
                    Selection::Clear => Some(Action::SelectDevice(None)),
                }
            }
            (MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved, Some(p)) => self
                .pointer
                .move_to(&nodes, p)
                .map(|(id, to)| Action::MoveNode { id, x: to.x, y: to.y }),
            (MouseEventKind::Drag(_) | MouseEventKind::Moved, None) => {
                self.pointer.leave();
                None
            }
            (MouseEventKind::Up(_), _) => {
                self.pointer.release();
                None
            }
            (MouseEventKind::ScrollDown, Some(_)) => {
                self.viewport.wheel(1.0);
                None
            }
            (MouseEventKind::ScrollUp, Some(_)) => {
                self.viewport.wheel(-1.0);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NodesUpdated(nodes) => self.nodes = Arc::clone(nodes),
            Action::LinksUpdated(links) => self.links = Arc::clone(links),
            Action::VlansUpdated(vlans) => self.vlans = Arc::clone(vlans),
            Action::SelectedVlanChanged(vlan) => {
                self.selected_vlan = *vlan;
                self.pulses.clear();
            }
            Action::SelectedDeviceChanged(id) => self.selected_device.clone_from(id),
            Action::Render if self.focused => self.roll_pulses(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Topology  ·  zoom {:.1}x ", self.viewport.zoom());
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

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(inner);
        frame.render_widget(Paragraph::new(self.chip_line()), rows[0]);

        let selected = self.selected_node();
        let (canvas_area, detail_area) = if selected.is_some() && rows[1].width > DETAIL_WIDTH * 2 {
            let cols = Layout::horizontal([Constraint::Min(10), Constraint::Length(DETAIL_WIDTH)])
                .split(rows[1]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[1], None)
        };
        self.last_area.set(canvas_area);

        let nodes = self.visible_nodes();
        let links = self.visible_links(&nodes);
        let bounds = self.viewport.world_bounds();

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([bounds.min_x, bounds.max_x])
            .y_bounds([-bounds.max_y, -bounds.min_y])
            .paint(|ctx: &mut Context<'_>| {
                self.paint_links(ctx, &links);
                for p in &self.pulses {
                    ctx.draw(&Circle {
                        x: p.at.x,
                        y: -p.at.y,
                        radius: p.radius,
                        color: theme::paint(p.paint),
                    });
                }
                ctx.layer();
                self.paint_nodes(ctx, &nodes);
                ctx.layer();
                self.paint_labels(ctx, &nodes);
            });
        frame.render_widget(canvas, canvas_area);

        if let (Some(node), Some(detail)) = (selected, detail_area) {
            self.render_detail(frame, detail, node);
        }
    }

    fn key_hints(&self) -> &'static str {
        "n/N node  ←↑↓→ move  +/- zoom  0 reset  [/] vlan  a all"
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.pointer.leave();
        }
    }

    fn id(&self) -> &'static str {
        "Topology"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use citygrid_core::NetworkStore;

    use super::*;

    fn loaded(store: &NetworkStore) -> TopologyScreen {
        let mut screen = TopologyScreen::new(1.0, Some(5));
        screen.set_focused(true);
        screen.update(&Action::VlansUpdated(store.vlans())).unwrap();
        screen.update(&Action::NodesUpdated(store.nodes())).unwrap();
        screen.update(&Action::LinksUpdated(store.links())).unwrap();
        screen
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn dash_segments_cover_the_on_runs() {
        let segs = dash_segments(Point::new(0.0, 0.0), Point::new(16.0, 0.0), [5.0, 3.0]);
        let xs: Vec<(f64, f64)> = segs.iter().map(|(a, b)| (a.x, b.x)).collect();
        assert_eq!(xs, vec![(0.0, 5.0), (8.0, 13.0)]);

        let degenerate = dash_segments(Point::new(1.0, 1.0), Point::new(1.0, 1.0), [5.0, 3.0]);
        assert_eq!(degenerate.len(), 1);
    }

    #[test]
    fn surface_point_maps_cell_centers() {
        let area = Rect::new(10, 5, 80, 60);
        let p = surface_point(area, (800.0, 600.0), 10, 5).unwrap();
        assert_eq!((p.x, p.y), (5.0, 5.0));
        let p = surface_point(area, (800.0, 600.0), 89, 64).unwrap();
        assert_eq!((p.x, p.y), (795.0, 595.0));
        assert_eq!(surface_point(area, (800.0, 600.0), 9, 5), None);
        assert_eq!(surface_point(area, (800.0, 600.0), 90, 5), None);
    }

    #[test]
    fn click_selects_node_under_pointer_and_drag_moves_it() {
        let store = NetworkStore::seeded(Some(11));
        let mut screen = loaded(&store);
        // One cell per logical pixel keeps the mapping easy to reason about.
        screen.last_area.set(Rect {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        });
        let node = store.nodes()[0].clone();
        #[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (col, row) = (node.x as u16, node.y as u16);

        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), col, row))
            .unwrap();
        assert!(matches!(action, Some(Action::SelectDevice(Some(ref id))) if *id == node.id));

        let action = screen
            .handle_mouse_event(mouse(
                MouseEventKind::Drag(MouseButton::Left),
                col + 20,
                row,
            ))
            .unwrap();
        match action {
            Some(Action::MoveNode { id, x, .. }) => {
                assert_eq!(id, node.id);
                assert!((x - (f64::from(col) + 20.5)).abs() < 1e-9);
            }
            other => panic!("expected MoveNode, got {other:?}"),
        }

        screen
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), col, row))
            .unwrap();
        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Moved, col + 40, row))
            .unwrap();
        assert!(action.is_none());
    }

    #[test]
    fn wheel_zooms_within_limits() {
        let store = NetworkStore::seeded(Some(11));
        let mut screen = loaded(&store);
        screen.last_area.set(Rect::new(0, 0, 80, 24));
        for _ in 0..30 {
            screen
                .handle_mouse_event(mouse(MouseEventKind::ScrollUp, 10, 10))
                .unwrap();
        }
        assert_eq!(screen.viewport.zoom(), 2.0);
        screen
            .handle_mouse_event(mouse(MouseEventKind::ScrollDown, 10, 10))
            .unwrap();
        assert_eq!(screen.viewport.zoom(), 1.9);
    }

    #[test]
    fn bracket_keys_cycle_vlan_chips() {
        let store = NetworkStore::seeded(Some(11));
        let mut screen = loaded(&store);
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char(']')))
            .unwrap();
        assert!(matches!(action, Some(Action::SelectVlan(Some(10)))));

        screen.update(&Action::SelectedVlanChanged(Some(10))).unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('[')))
            .unwrap();
        assert!(matches!(action, Some(Action::SelectVlan(None))));
    }

    #[test]
    fn vlan_filter_hides_links_with_hidden_endpoints() {
        let store = NetworkStore::seeded(Some(11));
        let mut screen = loaded(&store);
        screen.update(&Action::SelectedVlanChanged(Some(40))).unwrap();
        let nodes = screen.visible_nodes();
        assert!(nodes.iter().all(|n| n.vlan_id == 40));
        for (_, source, target) in screen.visible_links(&nodes) {
            assert_eq!(source.vlan_id, 40);
            assert_eq!(target.vlan_id, 40);
        }
    }

    #[test]
    fn render_frames_roll_pulses_only_when_focused() {
        let store = NetworkStore::seeded(Some(11));
        let mut screen = loaded(&store);
        screen.update(&Action::Render).unwrap();
        assert!(!screen.pulses.is_empty());

        screen.set_focused(false);
        screen.update(&Action::SelectedVlanChanged(None)).unwrap();
        screen.update(&Action::Render).unwrap();
        assert!(screen.pulses.is_empty());
    }

    #[test]
    fn arrows_nudge_the_selected_node() {
        let store = NetworkStore::seeded(Some(11));
        let mut screen = loaded(&store);
        let node = store.nodes()[2].clone();
        screen
            .update(&Action::SelectedDeviceChanged(Some(node.id.clone())))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Up))
            .unwrap();
        match action {
            Some(Action::MoveNode { id, x, y }) => {
                assert_eq!(id, node.id);
                assert_eq!((x, y), (node.x, node.y - NUDGE));
            }
            other => panic!("expected MoveNode, got {other:?}"),
        }
    }
}

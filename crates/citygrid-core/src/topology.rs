// ── Topology canvas geometry and styling ──
//
// Everything the topology view needs that does not depend on a drawing
// backend: the zoom viewport, hit testing, pointer interaction state, and
// per-link / per-node paint decisions. Randomness is always injected.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::model::{DeviceStatus, HexColor, NetworkLink, NetworkNode, VlanNetwork, palette};
use crate::seed::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Pointer hit radius in logical coordinates.
pub const HIT_RADIUS: f64 = 15.0;
pub const NODE_RADIUS: f64 = 15.0;
pub const EMPHASIS_RADIUS: f64 = 18.0;

/// Chance per frame that a link shows a traffic pulse.
pub const PULSE_PROBABILITY: f64 = 0.3;
pub const PULSE_RADIUS: f64 = 3.0;

pub const LINK_DASH: [f64; 2] = [5.0, 3.0];
pub const GLOW_BLUR: f64 = 10.0;

const LABEL_GAP: f64 = 5.0;
const LABEL_HEIGHT: f64 = 20.0;
const LABEL_PADDING: f64 = 10.0;
const LABEL_BASELINE: f64 = 15.0;
const LABEL_CORNER: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `t` of the way from `self` to `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

// ── Viewport ─────────────────────────────────────────────────────────

/// Center-anchored zoom over a fixed-size canvas.
///
/// Drawing maps a logical point `p` to `center + (p - center) * zoom`;
/// [`to_logical`](Self::to_logical) is the exact inverse, so hit testing
/// agrees with what is drawn at every zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    width: f64,
    height: f64,
    zoom: f64,
    center: Point,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            zoom: 1.0,
            center: Point::new(width / 2.0, height / 2.0),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Track a resized surface, keeping zoom and recentering.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.center = Point::new(width / 2.0, height / 2.0);
    }

    /// Clamp into `[MIN_ZOOM, MAX_ZOOM]`, snapped to one decimal so
    /// repeated steps do not accumulate float error.
    pub fn set_zoom(&mut self, zoom: f64) {
        let snapped = (zoom * 10.0).round() / 10.0;
        self.zoom = snapped.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Wheel input: scrolling down (positive delta) zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_out();
        } else {
            self.zoom_in();
        }
    }

    /// Zoom back to 1.0 around the canvas midpoint.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.center = Point::new(self.width / 2.0, self.height / 2.0);
    }

    /// Logical point to surface point.
    pub fn to_screen(&self, p: Point) -> Point {
        Point {
            x: self.center.x + (p.x - self.center.x) * self.zoom,
            y: self.center.y + (p.y - self.center.y) * self.zoom,
        }
    }

    /// Surface point (relative to the canvas origin) to logical point.
    pub fn to_logical(&self, p: Point) -> Point {
        Point {
            x: self.center.x + (p.x - self.center.x) / self.zoom,
            y: self.center.y + (p.y - self.center.y) / self.zoom,
        }
    }

    /// The logical rectangle visible on the surface.
    pub fn world_bounds(&self) -> Bounds {
        let top_left = self.to_logical(Point::new(0.0, 0.0));
        let bottom_right = self.to_logical(Point::new(self.width, self.height));
        Bounds {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: bottom_right.x,
            max_y: bottom_right.y,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

// ── Hit testing and pointer state ────────────────────────────────────

/// First node, in draw order, within [`HIT_RADIUS`] of `p`.
pub fn hit_test(nodes: &[Arc<NetworkNode>], p: Point) -> Option<&Arc<NetworkNode>> {
    nodes
        .iter()
        .find(|n| n.distance_sq(p.x, p.y) <= HIT_RADIUS * HIT_RADIUS)
}

/// What the caller should do after a pointer press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Select(String),
    Clear,
}

/// Drag and hover tracking for the canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerState {
    dragging: Option<String>,
    hovered: Option<String>,
}

impl PointerState {
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Pressing on a node selects it and starts a drag; pressing on empty
    /// space clears the selection.
    pub fn press(&mut self, nodes: &[Arc<NetworkNode>], p: Point) -> Selection {
        match hit_test(nodes, p) {
            Some(node) => {
                self.dragging = Some(node.id.clone());
                Selection::Select(node.id.clone())
            }
            None => {
                self.dragging = None;
                Selection::Clear
            }
        }
    }

    /// Update hover. While dragging, returns the node id and the position
    /// it should move to.
    pub fn move_to(&mut self, nodes: &[Arc<NetworkNode>], p: Point) -> Option<(String, Point)> {
        self.hovered = hit_test(nodes, p).map(|n| n.id.clone());
        self.dragging.clone().map(|id| (id, p))
    }

    pub fn release(&mut self) {
        self.dragging = None;
    }

    /// Pointer left the canvas: no drag, no hover.
    pub fn leave(&mut self) {
        self.dragging = None;
        self.hovered = None;
    }
}

// ── Paint ────────────────────────────────────────────────────────────

/// A stroke or fill color in the two forms the canvas uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Paint {
    /// Opaque VLAN color with a two-digit hex alpha suffix.
    HexAlpha { color: HexColor, alpha: u8 },
    Solid(HexColor),
    Rgba { r: u8, g: u8, b: u8, a: f64 },
}

impl Paint {
    pub const CROSS_VLAN: Self = Self::Rgba {
        r: 150,
        g: 150,
        b: 150,
        a: 0.5,
    };
    pub const NEUTRAL: Self = Self::Rgba {
        r: 200,
        g: 200,
        b: 200,
        a: 0.7,
    };
    pub const LABEL_BACKGROUND: Self = Self::Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.7,
    };

    /// The RGB part, for backends without alpha.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::HexAlpha { color, .. } | Self::Solid(color) => (color.r, color.g, color.b),
            Self::Rgba { r, g, b, .. } => (r, g, b),
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HexAlpha { color, alpha } => f.write_str(&color.with_alpha(*alpha)),
            Self::Solid(color) => write!(f, "{color}"),
            Self::Rgba { r, g, b, a } => write!(f, "rgba({r}, {g}, {b}, {a})"),
        }
    }
}

/// Link opacity byte: strength mapped into `[10, 100]`.
#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn link_alpha(strength: f64) -> u8 {
    (strength * 90.0 + 10.0).round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkStyle {
    pub paint: Paint,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
}

/// Stroke for a link. `vlan` is the link's own VLAN, if it resolves.
pub fn link_style(link: &NetworkLink, vlan: Option<&VlanNetwork>) -> LinkStyle {
    let width = link.strength * 3.0;
    if link.is_cross_vlan() {
        return LinkStyle {
            paint: Paint::CROSS_VLAN,
            width,
            dash: Some(LINK_DASH),
        };
    }
    let paint = match vlan {
        Some(v) => Paint::HexAlpha {
            color: v.color,
            alpha: link_alpha(link.strength),
        },
        None => Paint::NEUTRAL,
    };
    LinkStyle {
        paint,
        width,
        dash: None,
    }
}

/// A traffic pulse dot drawn on a link for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pulse {
    pub at: Point,
    pub radius: f64,
    pub paint: Paint,
}

/// Roll for a pulse on `link` between its two endpoint nodes.
///
/// Stateless: each call is an independent frame.
pub fn pulse<R: Rng + ?Sized>(
    source: &NetworkNode,
    target: &NetworkNode,
    vlan: Option<&VlanNetwork>,
    probability: f64,
    rng: &mut R,
) -> Option<Pulse> {
    if rng.random::<f64>() >= probability {
        return None;
    }
    let t = rng.random::<f64>();
    let at = Point::new(source.x, source.y).lerp(Point::new(target.x, target.y), t);
    Some(Pulse {
        at,
        radius: PULSE_RADIUS,
        paint: vlan.map_or(Paint::NEUTRAL, |v| Paint::Solid(v.color)),
    })
}

/// Rounded label background below an emphasized node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPill {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    /// Baseline for the centered label text.
    pub text_y: f64,
}

impl LabelPill {
    /// Lay out the pill for a label `text_width` wide.
    pub fn layout(node: &NetworkNode, radius: f64, text_width: f64) -> Self {
        let width = text_width + LABEL_PADDING;
        Self {
            x: node.x - width / 2.0,
            y: node.y + radius + LABEL_GAP,
            width,
            height: LABEL_HEIGHT,
            corner_radius: LABEL_CORNER,
            text_y: node.y + radius + LABEL_BASELINE,
        }
    }
}

/// Paint decisions for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub radius: f64,
    pub fill: HexColor,
    pub stroke: HexColor,
    pub line_width: f64,
    /// Shadow blur when emphasized; the shadow takes the stroke color.
    pub glow: Option<f64>,
    pub glyph: &'static str,
    pub glyph_color: HexColor,
    /// Whether the label pill is drawn.
    pub show_label: bool,
}

impl NodeStyle {
    /// `vlan` is the node's VLAN, if it resolves. Emphasized nodes are the
    /// selected or hovered one.
    pub fn for_node(node: &NetworkNode, vlan: Option<&VlanNetwork>, emphasized: bool) -> Self {
        let base = vlan.map_or(palette::NEUTRAL, |v| v.color);
        let (fill, stroke) = match node.status {
            DeviceStatus::Offline => (palette::WHITE, palette::RED),
            DeviceStatus::Warning => (base, palette::AMBER),
            DeviceStatus::Maintenance => (base, palette::GRAY),
            DeviceStatus::Online => (base, base),
        };
        let glyph_color = if node.status == DeviceStatus::Offline {
            palette::RED
        } else {
            palette::WHITE
        };

        Self {
            radius: if emphasized {
                EMPHASIS_RADIUS
            } else {
                NODE_RADIUS
            },
            fill,
            stroke,
            line_width: if emphasized { 3.0 } else { 2.0 },
            glow: emphasized.then_some(GLOW_BLUR),
            glyph: node.device_type.glyph(),
            glyph_color,
            show_label: emphasized,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::model::{DeviceType, SecurityLevel};

    fn node(id: &str, x: f64, y: f64, status: DeviceStatus) -> Arc<NetworkNode> {
        Arc::new(NetworkNode {
            id: id.into(),
            label: id.to_uppercase(),
            device_type: DeviceType::Camera,
            status,
            vlan_id: 10,
            x,
            y,
        })
    }

    fn vlan() -> VlanNetwork {
        VlanNetwork {
            id: 10,
            name: "Traffic Management".into(),
            subnet: "10.10.0.0/24".into(),
            description: String::new(),
            devices: Vec::new(),
            color: palette::BLUE,
            traffic_load: 72,
            security_level: SecurityLevel::High,
            department: "Transportation".into(),
        }
    }

    #[test]
    fn zoom_stays_clamped() {
        let mut vp = Viewport::default();
        for _ in 0..30 {
            vp.zoom_in();
            assert!(vp.zoom() <= MAX_ZOOM);
        }
        assert_eq!(vp.zoom(), 2.0);
        for _ in 0..30 {
            vp.zoom_out();
            assert!(vp.zoom() >= MIN_ZOOM);
        }
        assert_eq!(vp.zoom(), 0.5);
    }

    #[test]
    fn wheel_direction_and_reset() {
        let mut vp = Viewport::new(400.0, 300.0);
        vp.wheel(120.0);
        assert_eq!(vp.zoom(), 0.9);
        vp.wheel(-120.0);
        vp.wheel(-120.0);
        assert_eq!(vp.zoom(), 1.1);
        vp.reset();
        assert_eq!(vp.zoom(), 1.0);
        assert_eq!(vp.center(), Point::new(200.0, 150.0));
    }

    #[test]
    fn logical_and_screen_are_inverse() {
        let mut vp = Viewport::default();
        vp.set_zoom(1.7);
        let p = Point::new(123.0, 456.0);
        let back = vp.to_logical(vp.to_screen(p));
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn world_bounds_widen_when_zoomed_out() {
        let mut vp = Viewport::default();
        assert_eq!(
            vp.world_bounds(),
            Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 800.0,
                max_y: 600.0
            }
        );
        vp.set_zoom(0.5);
        let b = vp.world_bounds();
        assert_eq!((b.min_x, b.max_x), (-400.0, 1200.0));
    }

    #[test]
    fn hit_test_uses_fixed_radius_and_draw_order() {
        let nodes = vec![
            node("a", 100.0, 100.0, DeviceStatus::Online),
            node("b", 110.0, 100.0, DeviceStatus::Online),
        ];
        assert_eq!(hit_test(&nodes, Point::new(112.0, 100.0)).unwrap().id, "a");
        assert_eq!(hit_test(&nodes, Point::new(124.0, 100.0)).unwrap().id, "b");
        assert!(hit_test(&nodes, Point::new(126.0, 100.0)).is_none());
    }

    #[test]
    fn pointer_drag_lifecycle() {
        let nodes = vec![node("a", 50.0, 50.0, DeviceStatus::Online)];
        let mut pointer = PointerState::default();

        assert_eq!(
            pointer.press(&nodes, Point::new(52.0, 49.0)),
            Selection::Select("a".into())
        );
        let moved = pointer.move_to(&nodes, Point::new(60.0, 60.0));
        assert_eq!(moved, Some(("a".into(), Point::new(60.0, 60.0))));
        assert_eq!(pointer.hovered(), Some("a"));

        pointer.release();
        assert!(pointer.move_to(&nodes, Point::new(300.0, 300.0)).is_none());
        assert_eq!(pointer.hovered(), None);

        pointer.press(&nodes, Point::new(50.0, 50.0));
        pointer.leave();
        assert_eq!(pointer, PointerState::default());

        assert_eq!(
            pointer.press(&nodes, Point::new(400.0, 400.0)),
            Selection::Clear
        );
    }

    #[test]
    fn link_paint_branches() {
        let link = NetworkLink {
            source: "a".into(),
            target: "b".into(),
            strength: 0.8,
            vlan_id: 10,
        };
        let style = link_style(&link, Some(&vlan()));
        assert_eq!(style.paint.to_string(), "#3B82F652");
        assert!((style.width - 2.4).abs() < 1e-9);
        assert!(style.dash.is_none());

        assert_eq!(
            link_style(&link, None).paint.to_string(),
            "rgba(200, 200, 200, 0.7)"
        );

        let cross = NetworkLink {
            vlan_id: 0,
            ..link
        };
        let style = link_style(&cross, None);
        assert_eq!(style.paint.to_string(), "rgba(150, 150, 150, 0.5)");
        assert_eq!(style.dash, Some(LINK_DASH));
    }

    #[test]
    fn link_alpha_range() {
        assert_eq!(link_alpha(0.0), 10);
        assert_eq!(link_alpha(1.0), 100);
        assert_eq!(link_alpha(0.5), 55);
    }

    #[test]
    fn pulse_respects_probability_and_segment() {
        let a = node("a", 0.0, 0.0, DeviceStatus::Online);
        let b = node("b", 100.0, 50.0, DeviceStatus::Online);
        let mut rng = StdRng::seed_from_u64(9);

        assert!(pulse(&a, &b, None, 0.0, &mut rng).is_none());

        let dot = pulse(&a, &b, Some(&vlan()), 1.0, &mut rng).unwrap();
        assert!((0.0..=100.0).contains(&dot.at.x));
        assert!((dot.at.y - dot.at.x / 2.0).abs() < 1e-9);
        assert_eq!(dot.paint, Paint::Solid(palette::BLUE));
        assert_eq!(dot.radius, PULSE_RADIUS);
    }

    #[test]
    fn offline_node_is_hollow_red() {
        let n = node("a", 0.0, 0.0, DeviceStatus::Offline);
        let style = NodeStyle::for_node(&n, Some(&vlan()), false);
        assert_eq!(style.fill, palette::WHITE);
        assert_eq!(style.stroke, palette::RED);
        assert_eq!(style.glyph_color, palette::RED);
        assert_eq!(style.radius, NODE_RADIUS);
        assert!(style.glow.is_none());
    }

    #[test]
    fn emphasized_node_grows_and_glows() {
        let n = node("a", 0.0, 0.0, DeviceStatus::Warning);
        let style = NodeStyle::for_node(&n, None, true);
        assert_eq!(style.fill, palette::NEUTRAL);
        assert_eq!(style.stroke, palette::AMBER);
        assert_eq!(style.radius, EMPHASIS_RADIUS);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.glow, Some(GLOW_BLUR));
        assert_eq!(style.glyph, "C");

        let pill = LabelPill::layout(&n, style.radius, 40.0);
        assert_eq!((pill.x, pill.y, pill.width), (-25.0, 23.0, 50.0));
        assert_eq!(pill.text_y, 33.0);
    }
}

//! Pure path geometry shared by the renderer and the hit tester.
//!
//! Nothing in here touches the DOM, so the curve a user sees and the curve
//! that receives clicks are computed by the same code and can be unit tested
//! natively.

use crate::config::EditorConfig;
use crate::constants::*;
use crate::graph::WorkflowGraph;
use crate::models::{Connection, ConnectionType, ConnectorKind, Node, Point, Rect};

/// Fixed node dimensions in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMetrics {
    pub width: f64,
    pub height: f64,
    pub connector_radius: f64,
    pub hit_width: f64,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
            connector_radius: CONNECTOR_RADIUS,
            hit_width: CONNECTION_HIT_WIDTH,
        }
    }
}

impl From<&EditorConfig> for NodeMetrics {
    fn from(config: &EditorConfig) -> Self {
        Self {
            width: config.node_width,
            height: config.node_height,
            connector_radius: config.connector_radius,
            hit_width: config.connection_hit_width,
        }
    }
}

impl NodeMetrics {
    pub fn rect(&self, position: Point) -> Rect {
        Rect::new(position.x, position.y, self.width, self.height)
    }

    pub fn output_anchor(&self, position: Point) -> Point {
        Point::new(position.x + self.width, position.y + self.height / 2.0)
    }

    pub fn input_anchor(&self, position: Point) -> Point {
        Point::new(position.x, position.y + self.height / 2.0)
    }

    pub fn anchor(&self, position: Point, kind: ConnectorKind) -> Point {
        match kind {
            ConnectorKind::Input => self.input_anchor(position),
            ConnectorKind::Output => self.output_anchor(position),
        }
    }
}

/// A node being dragged is drawn at its pending position before the graph
/// is updated; this carries that override through path computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOverride<'a> {
    pub node_id: &'a str,
    pub position: Point,
}

pub fn node_position(node: &Node, moving: Option<PositionOverride<'_>>) -> Point {
    match moving {
        Some(o) if o.node_id == node.id => o.position,
        _ => node.position,
    }
}

/// Cubic Bezier from `start` to `end` with control points `c1`, `c2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// The connection S-curve: control points are pushed horizontally by
    /// half the horizontal distance and stay level with their endpoints.
    pub fn between(start: Point, end: Point) -> Self {
        let dx = BEZIER_CURVATURE * (end.x - start.x).abs();
        Self {
            start,
            c1: Point::new(start.x + dx, start.y),
            c2: Point::new(end.x - dx, end.y),
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.c1 * (3.0 * u * u * t)
            + self.c2 * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// Polyline approximation with `segments + 1` points.
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Approximate shortest distance from `p` to the curve.
    pub fn distance_to(&self, p: Point) -> f64 {
        self.flatten(BEZIER_HIT_SAMPLES)
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 == 0.0 {
        return p.distance_to(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0);
    p.distance_to(a + ab * t)
}

/// Visual encoding of a connection type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionStyle {
    pub color: &'static str,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
    pub alpha: f64,
    /// Whether an invisible hit path is laid under the stroke.
    pub selectable: bool,
}

impl ConnectionStyle {
    pub fn for_type(kind: ConnectionType) -> Self {
        match kind {
            ConnectionType::Data => Self {
                color: CONNECTION_DATA_COLOR,
                width: CONNECTION_LINE_WIDTH,
                dash: None,
                alpha: 1.0,
                selectable: true,
            },
            ConnectionType::Control => Self {
                color: CONNECTION_CONTROL_COLOR,
                width: CONNECTION_LINE_WIDTH,
                dash: Some(CONTROL_DASH),
                alpha: 1.0,
                selectable: true,
            },
            ConnectionType::Error => Self {
                color: CONNECTION_ERROR_COLOR,
                width: CONNECTION_LINE_WIDTH,
                dash: None,
                alpha: 1.0,
                selectable: true,
            },
            ConnectionType::Preview => Self {
                color: CONNECTION_PREVIEW_COLOR,
                width: CONNECTION_LINE_WIDTH,
                dash: Some(PREVIEW_DASH),
                alpha: PREVIEW_ALPHA,
                selectable: false,
            },
        }
    }
}

/// Everything needed to draw (and hit test) one persisted connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPath<'a> {
    pub connection: &'a Connection,
    pub curve: CubicBezier,
    pub style: ConnectionStyle,
    /// Source node is running; draw the flow indicator.
    pub flowing: bool,
}

/// Path for `conn` from live node positions. `None` if an endpoint is
/// missing, which a well-formed graph never produces.
pub fn connection_path<'a>(
    graph: &WorkflowGraph,
    conn: &'a Connection,
    metrics: &NodeMetrics,
    moving: Option<PositionOverride<'_>>,
) -> Option<ConnectionPath<'a>> {
    let source = graph.node(&conn.source_node_id)?;
    let target = graph.node(&conn.target_node_id)?;
    let start = metrics.output_anchor(node_position(source, moving));
    let end = metrics.input_anchor(node_position(target, moving));
    Some(ConnectionPath {
        connection: conn,
        curve: CubicBezier::between(start, end),
        style: ConnectionStyle::for_type(conn.kind),
        flowing: source.status == crate::models::NodeStatus::Running,
    })
}

pub fn connection_paths<'a>(
    graph: &'a WorkflowGraph,
    metrics: &NodeMetrics,
    moving: Option<PositionOverride<'_>>,
) -> Vec<ConnectionPath<'a>> {
    graph
        .connections()
        .iter()
        .filter_map(|c| connection_path(graph, c, metrics, moving))
        .collect()
}

/// Preview curve from a source output anchor to the pointer.
pub fn preview_path(source_anchor: Point, pointer: Point) -> CubicBezier {
    CubicBezier::between(source_anchor, pointer)
}

/// Next dash offset for the running-flow animation. Moves backwards so the
/// dashes travel from source to target, wrapping to stay bounded.
pub fn advance_flow_offset(offset: f64) -> f64 {
    (offset - FLOW_ANIMATION_STEP) % FLOW_ANIMATION_WRAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeStatus, TaskTemplate};
    use serde_json::json;

    fn template() -> TaskTemplate {
        serde_json::from_value(json!({"templateType": "t", "title": "T"})).unwrap()
    }

    #[test]
    fn anchors_sit_on_vertical_midline() {
        let m = NodeMetrics::default();
        let p = Point::new(10.0, 20.0);
        assert_eq!(m.output_anchor(p), Point::new(210.0, 70.0));
        assert_eq!(m.input_anchor(p), Point::new(10.0, 70.0));
    }

    #[test]
    fn control_points_are_level_with_endpoints() {
        let curve = CubicBezier::between(Point::new(0.0, 0.0), Point::new(100.0, 80.0));
        assert_eq!(curve.c1, Point::new(50.0, 0.0));
        assert_eq!(curve.c2, Point::new(50.0, 80.0));

        // Target to the left of the source still bends outwards.
        let back = CubicBezier::between(Point::new(100.0, 0.0), Point::new(0.0, 50.0));
        assert_eq!(back.c1, Point::new(150.0, 0.0));
        assert_eq!(back.c2, Point::new(-50.0, 50.0));
    }

    #[test]
    fn curve_passes_through_endpoints() {
        let curve = CubicBezier::between(Point::new(3.0, 4.0), Point::new(90.0, -30.0));
        assert_eq!(curve.point_at(0.0), curve.start);
        assert_eq!(curve.point_at(1.0), curve.end);
        assert!(curve.distance_to(curve.point_at(0.5)) < 1e-9);
    }

    #[test]
    fn distance_grows_away_from_curve() {
        let curve = CubicBezier::between(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        assert!(curve.distance_to(Point::new(100.0, 5.0)) <= 5.0 + 1e-9);
        assert!(curve.distance_to(Point::new(100.0, 40.0)) > 30.0);
    }

    #[test]
    fn styles_follow_connection_type() {
        let data = ConnectionStyle::for_type(ConnectionType::Data);
        assert!(data.dash.is_none() && data.selectable);
        let control = ConnectionStyle::for_type(ConnectionType::Control);
        assert_eq!(control.color, CONNECTION_CONTROL_COLOR);
        assert!(control.dash.is_some());
        let error = ConnectionStyle::for_type(ConnectionType::Error);
        assert_eq!(error.color, CONNECTION_ERROR_COLOR);
        assert!(error.dash.is_none());
        let preview = ConnectionStyle::for_type(ConnectionType::Preview);
        assert!(preview.dash.is_some());
        assert!(preview.alpha < 1.0);
        assert!(!preview.selectable);
    }

    #[test]
    fn paths_track_live_and_pending_positions() {
        let mut g = WorkflowGraph::new();
        let a = g.add_node(&template(), Point::new(0.0, 0.0));
        let b = g.add_node(&template(), Point::new(400.0, 0.0));
        g.add_connection(&a, &b, ConnectionType::Data);
        let m = NodeMetrics::default();

        let paths = connection_paths(&g, &m, None);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].curve.start, Point::new(200.0, 50.0));
        assert_eq!(paths[0].curve.end, Point::new(400.0, 50.0));
        assert!(!paths[0].flowing);

        let moving = PositionOverride {
            node_id: &b,
            position: Point::new(400.0, 300.0),
        };
        let paths = connection_paths(&g, &m, Some(moving));
        assert_eq!(paths[0].curve.end, Point::new(400.0, 350.0));

        g.set_status(&a, NodeStatus::Running);
        assert!(connection_paths(&g, &m, None)[0].flowing);
    }

    #[test]
    fn flow_offset_stays_bounded() {
        let mut offset = 0.0;
        for _ in 0..10_000 {
            offset = advance_flow_offset(offset);
            assert!(offset.abs() < FLOW_ANIMATION_WRAP);
        }
    }
}

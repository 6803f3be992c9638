use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Add, Div, Mul, Sub};

/// A 2D point or vector. Whether it lives in screen space or canvas space is
/// decided by the caller; `CanvasViewport` converts between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Execution status of a node. Written by the execution collaborator, never
/// by the canvas itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Idle => "idle",
            NodeStatus::Running => "running",
            NodeStatus::Completed => "completed",
            NodeStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(NodeStatus::Idle),
            "running" => Some(NodeStatus::Running),
            "completed" => Some(NodeStatus::Completed),
            "failed" => Some(NodeStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Data,
    Control,
    Error,
    /// Transient drag feedback. Never stored in a `WorkflowGraph`.
    Preview,
}

/// Which side of a node a connector sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    Input,
    Output,
}

/// Two CSS colours used for the node header gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGradient {
    pub from: String,
    pub to: String,
}

impl ColorGradient {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::new("#6366f1", "#8b5cf6")
    }
}

/// A catalog entry that can be dragged onto the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub template_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color_gradient: ColorGradient,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// A placed, positioned instance of a task template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub template_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color_gradient: ColorGradient,
    /// Canvas-space position of the top-left corner.
    pub position: Point,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub status: NodeStatus,
    /// Derived: true while the node is an endpoint of at least one
    /// connection. Maintained by `WorkflowGraph`.
    #[serde(default)]
    pub connected: bool,
}

impl Node {
    pub fn from_template(id: String, template: &TaskTemplate, position: Point) -> Self {
        Self {
            id,
            template_type: template.template_type.clone(),
            title: template.title.clone(),
            description: template.description.clone(),
            icon: template.icon.clone(),
            color_gradient: template.color_gradient.clone(),
            position,
            inputs: template.inputs.clone(),
            outputs: template.outputs.clone(),
            parameters: template.parameters.clone(),
            status: NodeStatus::Idle,
            connected: false,
        }
    }
}

/// A directed edge between two nodes' connectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    #[serde(rename = "type", default)]
    pub kind: ConnectionType,
}

impl Connection {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connection_type_uses_wire_field_name() {
        let conn: Connection = serde_json::from_value(json!({
            "id": "c1",
            "sourceNodeId": "n1",
            "targetNodeId": "n2",
            "type": "control"
        }))
        .unwrap();
        assert_eq!(conn.kind, ConnectionType::Control);
        assert!(conn.touches("n1"));
        assert!(conn.touches("n2"));
        assert!(!conn.touches("n3"));
    }

    #[test]
    fn node_defaults_fill_optional_fields() {
        let node: Node = serde_json::from_value(json!({
            "id": "n1",
            "templateType": "search",
            "title": "Search",
            "position": { "x": 10.0, "y": 20.0 }
        }))
        .unwrap();
        assert_eq!(node.status, NodeStatus::Idle);
        assert!(!node.connected);
        assert!(node.inputs.is_empty());
        assert_eq!(node.position, Point::new(10.0, 20.0));
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            NodeStatus::Idle,
            NodeStatus::Running,
            NodeStatus::Completed,
            NodeStatus::Failed,
        ] {
            assert_eq!(NodeStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(NodeStatus::parse("processing"), None);
    }

    #[test]
    fn point_arithmetic() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p + Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert_eq!(p - Point::new(1.0, 1.0), Point::new(2.0, 3.0));
        assert_eq!(p * 2.0, Point::new(6.0, 8.0));
        assert_eq!(p / 2.0, Point::new(1.5, 2.0));
        assert_eq!(p.distance_to(Point::ORIGIN), 5.0);
    }
}

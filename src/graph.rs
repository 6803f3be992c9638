//! The node/connection data model.
//!
//! `WorkflowGraph` is the single owner of nodes and connections for an editor
//! session. Every mutation goes through its methods so the structural
//! invariants hold in one place:
//!
//! * every connection's endpoints exist in `nodes`
//! * no self-loops, no duplicate `(source, target)` pairs
//! * no `Preview` connections are ever stored
//! * `Node::connected` mirrors whether the node is an endpoint of a connection
//!
//! Invalid requests are rejected by returning `None`/`false`; nothing here
//! panics or surfaces an error to the user.

use crate::debug_log;
use crate::models::{Connection, ConnectionType, Node, NodeStatus, Point, Rect, TaskTemplate};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowGraph {
    // Vec rather than a map: insertion order is what the compiler walks.
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from host-supplied collections.
    ///
    /// Nodes with an id already seen are dropped. Connections are filtered
    /// through the same rules as `add_connection` (endpoints must exist, no
    /// self-loops, no duplicates, no previews) and keep their ids.
    /// `connected` flags from the input are ignored and recomputed.
    pub fn from_parts(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            if graph.contains_node(&node.id) {
                debug_log!("Dropping duplicate node id {}", node.id);
                continue;
            }
            graph.nodes.push(node);
        }
        for conn in connections {
            if graph.can_connect(&conn.source_node_id, &conn.target_node_id, conn.kind)
                && graph.connection(&conn.id).is_none()
            {
                graph.connections.push(conn);
            } else {
                debug_log!("Dropping invalid connection {}", conn.id);
            }
        }
        graph.refresh_connectivity();
        graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Create a node from `template` at a canvas-space position and return
    /// its fresh id.
    pub fn add_node(&mut self, template: &TaskTemplate, position: Point) -> String {
        let id = format!("node-{}", Uuid::new_v4());
        self.nodes
            .push(Node::from_template(id.clone(), template, position));
        debug_log!(
            "Added node {} ({}) at ({:.1}, {:.1})",
            id,
            template.template_type,
            position.x,
            position.y
        );
        id
    }

    /// Update a node's position. Connections are untouched; their paths are
    /// derived from live node positions when rendered.
    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        if !position.is_finite() {
            return false;
        }
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove a node and every connection that references it.
    pub fn delete_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);
        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        debug_log!(
            "Deleted node {} and {} connection(s)",
            id,
            before - self.connections.len()
        );
        self.refresh_connectivity();
        Some(node)
    }

    /// Whether a connection `source → target` of `kind` would be accepted.
    pub fn can_connect(&self, source_id: &str, target_id: &str, kind: ConnectionType) -> bool {
        kind != ConnectionType::Preview
            && source_id != target_id
            && self.contains_node(source_id)
            && self.contains_node(target_id)
            && !self
                .connections
                .iter()
                .any(|c| c.source_node_id == source_id && c.target_node_id == target_id)
    }

    /// Persist a connection and return its id, or `None` when the request is
    /// a self-loop, references a missing node, duplicates an existing edge or
    /// is a preview.
    pub fn add_connection(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: ConnectionType,
    ) -> Option<String> {
        if !self.can_connect(source_id, target_id, kind) {
            debug_log!("Rejected connection {} → {}", source_id, target_id);
            return None;
        }
        let id = format!("conn-{}", Uuid::new_v4());
        self.connections.push(Connection {
            id: id.clone(),
            source_node_id: source_id.to_string(),
            target_node_id: target_id.to_string(),
            kind,
        });
        self.refresh_connectivity();
        Some(id)
    }

    pub fn delete_connection(&mut self, id: &str) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        let conn = self.connections.remove(index);
        self.refresh_connectivity();
        Some(conn)
    }

    pub fn set_parameter(&mut self, id: &str, key: &str, value: Value) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.parameters.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, id: &str, status: NodeStatus) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.status = status;
                true
            }
            None => false,
        }
    }

    /// Nodes feeding `target_id`, in connection order.
    pub fn incoming_sources(&self, target_id: &str) -> Vec<&Node> {
        self.connections
            .iter()
            .filter(|c| c.target_node_id == target_id)
            .filter_map(|c| self.node(&c.source_node_id))
            .collect()
    }

    /// Bounding box of all nodes given a fixed node size.
    pub fn bounds(&self, node_width: f64, node_height: f64) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|n| Rect::new(n.position.x, n.position.y, node_width, node_height))
            .reduce(|acc, r| acc.union(&r))
    }

    fn refresh_connectivity(&mut self) {
        let endpoints: HashSet<&str> = self
            .connections
            .iter()
            .flat_map(|c| [c.source_node_id.as_str(), c.target_node_id.as_str()])
            .collect();
        for node in &mut self.nodes {
            node.connected = endpoints.contains(node.id.as_str());
        }
    }
}

//! Events the editor reacts to, and the side effects it asks for.

use crate::constants::*;
use crate::models::{Connection, Node, NodeStatus, Point, TaskTemplate};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Pointer input, screen coordinates relative to the canvas element
    PointerDown { screen: Point },
    PointerMove { screen: Point },
    PointerUp { screen: Point },
    PointerLeave,
    Wheel { screen: Point, delta_y: f64 },

    // Palette drag-and-drop
    TemplateDragStart { template: TaskTemplate },
    TemplateDragEnd,
    DropTemplate { template: TaskTemplate, screen: Point },

    // Graph edits from the keyboard or the host
    DeleteSelected,
    DeleteNode { node_id: String },
    DeleteConnection { connection_id: String },
    SetNodeStatus { node_id: String, status: NodeStatus },
    SetNodeParameter { node_id: String, key: String, value: Value },
    LoadGraph { nodes: Vec<Node>, connections: Vec<Connection> },

    // View
    ResetView,
    CenterView,
    CanvasResized { width: f64, height: f64 },
    AnimationTick,

    // Execution
    ExecuteWorkflow,
    WorkflowCreated { workflow_id: String },
    ExecutionFailed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Notify the host through a registered callback
    Emit(CanvasEvent),
    /// Fire-and-forget `createWorkflow(instruction)`
    CreateWorkflowApi { instruction: String },
}

/// Host-facing notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    NodeMove { id: String, position: Point },
    NodeConnect { source_id: String, target_id: String },
    NodeDelete { id: String },
    NodeSelect { node: Node },
    Drop { template: TaskTemplate, position: Point },
    ConnectionDelete { id: String },
    WorkflowCreated { workflow_id: String },
    ExecutionFailed { message: String },
}

impl CanvasEvent {
    /// Name the host registers the callback under.
    pub fn name(&self) -> &'static str {
        match self {
            CanvasEvent::NodeMove { .. } => EVENT_NODE_MOVE,
            CanvasEvent::NodeConnect { .. } => EVENT_NODE_CONNECT,
            CanvasEvent::NodeDelete { .. } => EVENT_NODE_DELETE,
            CanvasEvent::NodeSelect { .. } => EVENT_NODE_SELECT,
            CanvasEvent::Drop { .. } => EVENT_DROP,
            CanvasEvent::ConnectionDelete { .. } => EVENT_CONNECTION_DELETE,
            CanvasEvent::WorkflowCreated { .. } => EVENT_WORKFLOW_CREATED,
            CanvasEvent::ExecutionFailed { .. } => EVENT_EXECUTION_FAILED,
        }
    }
}

//! Connect gesture state machine.
//!
//! ```text
//!            begin (pointer-down on output)
//!   Idle ─────────────────────────────────▶ ConnectingFromOutput(source, preview)
//!    ▲                                          │  track (pointer-move)
//!    │   finish: valid input → add_connection   │◀─┘
//!    └──────────────────────────────────────────┘
//!        finish: anything else → cancel (silent)
//! ```
//!
//! The preview endpoint only ever lives in `DragState`; the graph never sees
//! a `Preview` connection.

use crate::canvas::geometry::{preview_path, CubicBezier, NodeMetrics};
use crate::debug_log;
use crate::drag::DragState;
use crate::graph::WorkflowGraph;
use crate::models::{ConnectionType, Point};
use crate::viewport::CanvasViewport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected {
        connection_id: String,
        source_id: String,
        target_id: String,
    },
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionEngine {
    complete_on_hover: bool,
}

impl ConnectionEngine {
    pub fn new(complete_on_hover: bool) -> Self {
        Self { complete_on_hover }
    }

    pub fn complete_on_hover(&self) -> bool {
        self.complete_on_hover
    }

    /// Start a connect gesture from `source_id`'s output connector. Only
    /// valid from `Idle`; the preview starts on the connector itself.
    pub fn begin(
        &self,
        drag: &mut DragState,
        graph: &WorkflowGraph,
        metrics: &NodeMetrics,
        source_id: &str,
    ) -> bool {
        if !drag.is_idle() {
            return false;
        }
        let Some(source) = graph.node(source_id) else {
            return false;
        };
        *drag = DragState::ConnectingFromOutput {
            source_id: source_id.to_string(),
            preview: metrics.output_anchor(source.position),
        };
        debug_log!("🔗 Connect gesture started from {}", source_id);
        true
    }

    /// Follow the pointer. With hover completion enabled, hovering a valid
    /// input connector finishes the gesture immediately and the outcome is
    /// returned.
    pub fn track(
        &self,
        drag: &mut DragState,
        graph: &mut WorkflowGraph,
        viewport: &CanvasViewport,
        pointer_screen: Point,
        hovered_input: Option<&str>,
    ) -> Option<ConnectOutcome> {
        let DragState::ConnectingFromOutput { source_id, preview } = &mut *drag else {
            return None;
        };
        *preview = viewport.to_canvas(pointer_screen);

        if !self.complete_on_hover {
            return None;
        }
        let target = hovered_input?;
        if !graph.can_connect(source_id, target, ConnectionType::Data) {
            return None;
        }
        Some(self.finish(drag, graph, Some(target)))
    }

    /// Pointer released. `target` is the node whose input connector is under
    /// the pointer, if any. Always leaves `drag` in `Idle` when a connect
    /// gesture was in progress.
    pub fn finish(
        &self,
        drag: &mut DragState,
        graph: &mut WorkflowGraph,
        target: Option<&str>,
    ) -> ConnectOutcome {
        let source_id = match &mut *drag {
            DragState::ConnectingFromOutput { source_id, .. } => std::mem::take(source_id),
            _ => return ConnectOutcome::Cancelled,
        };
        *drag = DragState::Idle;

        let Some(target_id) = target else {
            debug_log!("Connect gesture from {} cancelled", source_id);
            return ConnectOutcome::Cancelled;
        };
        match graph.add_connection(&source_id, target_id, ConnectionType::Data) {
            Some(connection_id) => {
                debug_log!("🔗 Connected {} → {}", source_id, target_id);
                ConnectOutcome::Connected {
                    connection_id,
                    source_id,
                    target_id: target_id.to_string(),
                }
            }
            None => ConnectOutcome::Cancelled,
        }
    }

    /// Abort an in-progress gesture. Returns whether one was aborted.
    pub fn cancel(&self, drag: &mut DragState) -> bool {
        if drag.is_connecting() {
            *drag = DragState::Idle;
            true
        } else {
            false
        }
    }

    /// Curve to draw as the dashed preview, in canvas space.
    pub fn preview(
        &self,
        drag: &DragState,
        graph: &WorkflowGraph,
        metrics: &NodeMetrics,
    ) -> Option<CubicBezier> {
        let DragState::ConnectingFromOutput { source_id, preview } = drag else {
            return None;
        };
        let source = graph.node(source_id)?;
        Some(preview_path(metrics.output_anchor(source.position), *preview))
    }
}

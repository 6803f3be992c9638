use crate::models::{Point, TaskTemplate};

/// The single in-progress pointer gesture on the canvas.
///
/// At most one gesture is live at a time; pointer-up (or leaving the canvas)
/// always returns to `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Dragging empty background. `last` is the previous pointer position in
    /// screen space.
    Panning { last: Point },
    /// A palette template is being dragged over the canvas.
    DraggingTemplate { template: TaskTemplate },
    /// Repositioning an existing node.
    DraggingNode {
        node_id: String,
        /// Pointer position relative to the node's top-left, canvas space.
        grab_offset: Point,
        /// Where the node will land on release, canvas space.
        pending: Point,
        /// Screen position of the press, used to tell a click from a move.
        press_screen: Point,
        moved: bool,
    },
    /// Connect gesture started on `source_id`'s output connector.
    ConnectingFromOutput { source_id: String, preview: Point },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, DragState::ConnectingFromOutput { .. })
    }

    /// Node id and pending position while a node is being dragged.
    pub fn moving_node(&self) -> Option<(&str, Point)> {
        match self {
            DragState::DraggingNode {
                node_id, pending, ..
            } => Some((node_id.as_str(), *pending)),
            _ => None,
        }
    }
}

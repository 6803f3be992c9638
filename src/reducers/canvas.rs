//! Canvas reducer: pointer gestures, palette drops, deletion and view
//! changes.
//!
//! Invalid gestures (self-loops, drops outside the canvas, releases with no
//! target) change nothing and emit nothing.

use crate::canvas::geometry::advance_flow_offset;
use crate::config::ZoomAnchor;
use crate::connection::ConnectOutcome;
use crate::debug_log;
use crate::drag::DragState;
use crate::hit_test::{connector_at, hit_test, HitTarget};
use crate::messages::{CanvasEvent, Command, Message};
use crate::models::{ConnectorKind, NodeStatus, Point, TaskTemplate};
use crate::state::EditorState;

pub fn update(state: &mut EditorState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    match msg {
        Message::PointerDown { screen } => pointer_down(state, *screen, cmds),
        Message::PointerMove { screen } => pointer_move(state, *screen, cmds),
        Message::PointerUp { screen } => pointer_up(state, *screen, cmds),
        Message::PointerLeave => pointer_leave(state, cmds),
        Message::Wheel { screen, delta_y } => wheel(state, *screen, *delta_y),
        Message::TemplateDragStart { template } => {
            if state.drag.is_idle() {
                state.drag = DragState::DraggingTemplate {
                    template: template.clone(),
                };
            }
        }
        Message::TemplateDragEnd => {
            if matches!(state.drag, DragState::DraggingTemplate { .. }) {
                state.drag = DragState::Idle;
            }
        }
        Message::DropTemplate { template, screen } => drop_template(state, template, *screen, cmds),
        Message::DeleteSelected => {
            if let Some(id) = state.selected_node_id.clone() {
                delete_node(state, &id, cmds);
            }
        }
        Message::DeleteNode { node_id } => delete_node(state, node_id, cmds),
        Message::DeleteConnection { connection_id } => {
            delete_connection(state, connection_id, cmds)
        }
        Message::ResetView => {
            state.viewport.reset();
            state.mark_dirty();
        }
        Message::CenterView => {
            let bounds = state
                .graph
                .bounds(state.metrics.width, state.metrics.height);
            if let (Some(bounds), Some(size)) = (bounds, state.canvas_size) {
                state.viewport.center_on(bounds, size);
                state.mark_dirty();
            }
        }
        Message::CanvasResized { width, height } => {
            let size = Point::new(*width, *height);
            if size.is_finite() && *width > 0.0 && *height > 0.0 {
                state.canvas_size = Some(size);
                state.mark_dirty();
            }
        }
        Message::AnimationTick => {
            let flowing = state.graph.connections().iter().any(|c| {
                state
                    .graph
                    .node(&c.source_node_id)
                    .is_some_and(|n| n.status == NodeStatus::Running)
            });
            if flowing {
                state.flow_offset = advance_flow_offset(state.flow_offset);
                state.mark_dirty();
            }
        }
        _ => return false,
    }
    true
}

fn pointer_down(state: &mut EditorState, screen: Point, cmds: &mut Vec<Command>) {
    if !state.drag.is_idle() || !screen.is_finite() {
        return;
    }
    let p = state.viewport.to_canvas(screen);
    match hit_test(&state.graph, &state.metrics, p) {
        HitTarget::OutputConnector { node_id } => {
            state
                .engine
                .begin(&mut state.drag, &state.graph, &state.metrics, &node_id);
        }
        // Connections only start from outputs; an input press does nothing.
        HitTarget::InputConnector { .. } => return,
        HitTarget::NodeBody {
            node_id,
            grab_offset,
        } => {
            let pending = p - grab_offset;
            state.drag = DragState::DraggingNode {
                node_id,
                grab_offset,
                pending,
                press_screen: screen,
                moved: false,
            };
        }
        HitTarget::Connection { connection_id } => {
            delete_connection(state, &connection_id, cmds);
        }
        HitTarget::Background => {
            state.drag = DragState::Panning { last: screen };
            state.selected_node_id = None;
        }
    }
    state.mark_dirty();
}

fn pointer_move(state: &mut EditorState, screen: Point, cmds: &mut Vec<Command>) {
    if !screen.is_finite() {
        return;
    }
    if state.drag.is_connecting() {
        let p = state.viewport.to_canvas(screen);
        let hovered = connector_at(&state.graph, &state.metrics, p, ConnectorKind::Input);
        let outcome = state.engine.track(
            &mut state.drag,
            &mut state.graph,
            &state.viewport,
            screen,
            hovered.as_deref(),
        );
        state.hovered_connector = hovered.map(|id| (id, ConnectorKind::Input));
        if let Some(outcome) = outcome {
            state.hovered_connector = None;
            emit_connect(outcome, cmds);
        }
        state.mark_dirty();
        return;
    }

    if matches!(state.drag, DragState::Idle | DragState::DraggingTemplate { .. }) {
        update_hover(state, screen);
        return;
    }

    let to_canvas = state.viewport.to_canvas(screen);
    let click_slop = state.config.click_slop;
    match &mut state.drag {
        DragState::Panning { last } => {
            let delta = screen - *last;
            *last = screen;
            state.viewport.pan(delta);
        }
        DragState::DraggingNode {
            grab_offset,
            pending,
            press_screen,
            moved,
            ..
        } => {
            *pending = to_canvas - *grab_offset;
            if !*moved && screen.distance_to(*press_screen) > click_slop {
                *moved = true;
            }
        }
        _ => return,
    }
    state.mark_dirty();
}

fn pointer_up(state: &mut EditorState, screen: Point, cmds: &mut Vec<Command>) {
    if state.drag.is_connecting() {
        let target = if screen.is_finite() {
            let p = state.viewport.to_canvas(screen);
            connector_at(&state.graph, &state.metrics, p, ConnectorKind::Input)
        } else {
            None
        };
        let outcome = state
            .engine
            .finish(&mut state.drag, &mut state.graph, target.as_deref());
        state.hovered_connector = None;
        emit_connect(outcome, cmds);
        state.mark_dirty();
        return;
    }

    match std::mem::take(&mut state.drag) {
        DragState::DraggingNode {
            node_id,
            pending,
            moved,
            ..
        } => {
            if moved {
                commit_move(state, &node_id, pending, cmds);
            } else {
                select_node(state, &node_id, cmds);
            }
        }
        // Palette drags end through dragend/drop, not pointerup.
        template @ DragState::DraggingTemplate { .. } => state.drag = template,
        _ => {}
    }
    state.mark_dirty();
}

fn pointer_leave(state: &mut EditorState, cmds: &mut Vec<Command>) {
    if state.engine.cancel(&mut state.drag) {
        debug_log!("Pointer left the canvas; connect gesture cancelled");
    }
    match std::mem::take(&mut state.drag) {
        DragState::DraggingNode {
            node_id,
            pending,
            moved: true,
            ..
        } => commit_move(state, &node_id, pending, cmds),
        template @ DragState::DraggingTemplate { .. } => state.drag = template,
        _ => {}
    }
    state.hovered_connector = None;
    state.mark_dirty();
}

fn wheel(state: &mut EditorState, screen: Point, delta_y: f64) {
    if delta_y == 0.0 || !delta_y.is_finite() {
        return;
    }
    // Scrolling up (negative delta) zooms in.
    let factor = if delta_y < 0.0 {
        state.config.zoom_in_factor
    } else {
        state.config.zoom_out_factor
    };
    let anchor = match state.config.zoom_anchor {
        ZoomAnchor::Origin => None,
        ZoomAnchor::Cursor => Some(screen),
    };
    if state.viewport.zoom_by(factor, anchor) {
        state.mark_dirty();
    }
}

fn drop_template(
    state: &mut EditorState,
    template: &TaskTemplate,
    screen: Point,
    cmds: &mut Vec<Command>,
) {
    if matches!(state.drag, DragState::DraggingTemplate { .. }) {
        state.drag = DragState::Idle;
    }
    if !screen.is_finite() || !state.contains_screen_point(screen) {
        debug_log!("Ignoring drop outside the canvas at ({}, {})", screen.x, screen.y);
        return;
    }
    let position = state.viewport.to_canvas(screen);
    state.graph.add_node(template, position);
    cmds.push(Command::Emit(CanvasEvent::Drop {
        template: template.clone(),
        position,
    }));
    state.mark_dirty();
}

fn delete_node(state: &mut EditorState, node_id: &str, cmds: &mut Vec<Command>) {
    if state.graph.delete_node(node_id).is_none() {
        return;
    }
    if state.selected_node_id.as_deref() == Some(node_id) {
        state.selected_node_id = None;
    }
    let gesture_on_node = match &state.drag {
        DragState::DraggingNode { node_id: id, .. } => id == node_id,
        DragState::ConnectingFromOutput { source_id, .. } => source_id == node_id,
        _ => false,
    };
    if gesture_on_node {
        state.drag = DragState::Idle;
    }
    if matches!(&state.hovered_connector, Some((id, _)) if id == node_id) {
        state.hovered_connector = None;
    }
    cmds.push(Command::Emit(CanvasEvent::NodeDelete {
        id: node_id.to_string(),
    }));
    state.mark_dirty();
}

fn delete_connection(state: &mut EditorState, connection_id: &str, cmds: &mut Vec<Command>) {
    if state.graph.delete_connection(connection_id).is_some() {
        cmds.push(Command::Emit(CanvasEvent::ConnectionDelete {
            id: connection_id.to_string(),
        }));
        state.mark_dirty();
    }
}

fn commit_move(state: &mut EditorState, node_id: &str, position: Point, cmds: &mut Vec<Command>) {
    if state.graph.move_node(node_id, position) {
        cmds.push(Command::Emit(CanvasEvent::NodeMove {
            id: node_id.to_string(),
            position,
        }));
    }
}

fn select_node(state: &mut EditorState, node_id: &str, cmds: &mut Vec<Command>) {
    if let Some(node) = state.graph.node(node_id) {
        state.selected_node_id = Some(node_id.to_string());
        cmds.push(Command::Emit(CanvasEvent::NodeSelect { node: node.clone() }));
    }
}

fn update_hover(state: &mut EditorState, screen: Point) {
    let p = state.viewport.to_canvas(screen);
    let hovered = connector_at(&state.graph, &state.metrics, p, ConnectorKind::Output)
        .map(|id| (id, ConnectorKind::Output))
        .or_else(|| {
            connector_at(&state.graph, &state.metrics, p, ConnectorKind::Input)
                .map(|id| (id, ConnectorKind::Input))
        });
    if hovered != state.hovered_connector {
        state.hovered_connector = hovered;
        state.mark_dirty();
    }
}

fn emit_connect(outcome: ConnectOutcome, cmds: &mut Vec<Command>) {
    if let ConnectOutcome::Connected {
        source_id,
        target_id,
        ..
    } = outcome
    {
        cmds.push(Command::Emit(CanvasEvent::NodeConnect {
            source_id,
            target_id,
        }));
    }
}

//! Host-driven graph updates and the execution lifecycle.

use crate::debug_log;
use crate::drag::DragState;
use crate::graph::WorkflowGraph;
use crate::messages::{CanvasEvent, Command, Message};
use crate::state::EditorState;

pub fn update(state: &mut EditorState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    match msg {
        Message::LoadGraph { nodes, connections } => {
            state.graph = WorkflowGraph::from_parts(nodes.clone(), connections.clone());
            state.drag = DragState::Idle;
            state.hovered_connector = None;
            if let Some(id) = &state.selected_node_id {
                if !state.graph.contains_node(id) {
                    state.selected_node_id = None;
                }
            }
            state.mark_dirty();
        }
        Message::SetNodeStatus { node_id, status } => {
            if state.graph.set_status(node_id, *status) {
                state.mark_dirty();
            }
        }
        Message::SetNodeParameter {
            node_id,
            key,
            value,
        } => {
            if state.graph.set_parameter(node_id, key, value.clone()) {
                state.mark_dirty();
            }
        }
        Message::ExecuteWorkflow if state.executing => {
            debug_log!("Workflow submission already in flight; ignoring execute");
        }
        Message::ExecuteWorkflow => match state.compiler.prepare_instruction(&state.graph) {
            Ok(instruction) => {
                debug_log!("▶️ Executing workflow: {}", instruction);
                state.executing = true;
                cmds.push(Command::CreateWorkflowApi { instruction });
            }
            Err(err) => {
                cmds.push(Command::Emit(CanvasEvent::ExecutionFailed {
                    message: err.to_string(),
                }));
            }
        },
        Message::WorkflowCreated { workflow_id } => {
            state.executing = false;
            cmds.push(Command::Emit(CanvasEvent::WorkflowCreated {
                workflow_id: workflow_id.clone(),
            }));
        }
        Message::ExecutionFailed { error } => {
            state.executing = false;
            cmds.push(Command::Emit(CanvasEvent::ExecutionFailed {
                message: error.clone(),
            }));
        }
        _ => return false,
    }
    true
}

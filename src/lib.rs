//! Workflow canvas editor compiled to WebAssembly.
//!
//! The pure core (viewport, graph, connection engine, geometry, compiler and
//! the reducers) is plain Rust and testable natively. The DOM shell in
//! `components` wires browser events into `state::dispatch_global_message`
//! and paints through `canvas::renderer`.

use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

// Export convenience macros crate-wide
#[macro_use]
mod macros;

pub mod callbacks;
pub mod canvas;
pub mod catalog;
mod command_executors;
mod components;
pub mod compiler;
pub mod config;
pub mod connection;
pub mod constants;
pub mod drag;
pub mod error;
pub mod graph;
pub mod messages;
pub mod models;
pub mod network;
pub mod reducers;
pub mod state;
pub mod viewport;


use crate::catalog::TaskCatalog;
use crate::config::EditorConfig;
use crate::messages::Message;
use crate::models::{Connection, Node, NodeStatus, TaskTemplate};
use crate::state::{dispatch_global_message, EDITOR_STATE};

thread_local! {
    /// Palette container, kept so a catalog swap can re-render it.
    static PALETTE: RefCell<Option<web_sys::Element>> = const { RefCell::new(None) };
    static MOUNTED: RefCell<bool> = const { RefCell::new(false) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    // Compile-time API_BASE_URL or same-origin; the host may override with
    // init_api_config_js() before executing.
    network::init_api_config();
    Ok(())
}

fn apply_config(config: EditorConfig) {
    if !config.api_base_url.trim().is_empty() {
        network::set_api_config(network::config::ApiConfig::from_url(&config.api_base_url));
    }
    EDITOR_STATE.with(|state| state.borrow_mut().reconfigure(config));
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Attach the editor to `<canvas id=canvas_id>` and, optionally, render the
/// task palette into `palette_id`. A second call only applies `config`.
#[wasm_bindgen]
pub fn mount_canvas_editor(
    canvas_id: &str,
    palette_id: Option<String>,
    config: JsValue,
) -> Result<(), JsValue> {
    let config: EditorConfig = if config.is_undefined() || config.is_null() {
        EditorConfig::default()
    } else {
        from_js(config, "editor config")?
    };
    config.validate()?;

    if MOUNTED.with(|m| *m.borrow()) {
        apply_config(config);
        debug_log!("Canvas editor already mounted; configuration updated");
        return Ok(());
    }

    // Resolve everything fallible before any state changes or listeners.
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let palette = palette_id
        .map(|id| {
            document
                .get_element_by_id(&id)
                .ok_or_else(|| JsValue::from_str(&format!("no element with id '{id}'")))
        })
        .transpose()?;
    let (canvas, context) = components::canvas_editor::resolve_canvas(&document, canvas_id)?;

    apply_config(config);
    if let Some(container) = palette {
        EDITOR_STATE.with(|state| {
            components::node_palette::render_palette(&document, &container, &state.borrow().catalog)
        })?;
        PALETTE.with(|p| *p.borrow_mut() = Some(container));
    }

    // Listeners cannot be detached, so never attach a second set.
    MOUNTED.with(|m| *m.borrow_mut() = true);
    components::canvas_editor::attach_canvas(&document, canvas, context)?;
    debug_log!("🎨 Canvas editor mounted on #{}", canvas_id);
    Ok(())
}

/// Replace the task catalog offered by the palette.
#[wasm_bindgen]
pub fn set_task_catalog(templates: JsValue) -> Result<(), JsValue> {
    let templates: Vec<TaskTemplate> = from_js(templates, "task catalog")?;
    let catalog = TaskCatalog::new(templates);

    let container = PALETTE.with(|p| p.borrow().clone());
    if let Some(container) = container {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        components::node_palette::render_palette(&document, &container, &catalog)?;
    }
    EDITOR_STATE.with(|state| state.borrow_mut().catalog = catalog);
    Ok(())
}

/// Replace the graph with the host's `nodes`/`connections` arrays.
#[wasm_bindgen]
pub fn load_workflow_graph(nodes: JsValue, connections: JsValue) -> Result<(), JsValue> {
    let nodes: Vec<Node> = from_js(nodes, "nodes")?;
    let connections: Vec<Connection> = if connections.is_undefined() || connections.is_null() {
        Vec::new()
    } else {
        from_js(connections, "connections")?
    };
    dispatch_global_message(Message::LoadGraph { nodes, connections });
    Ok(())
}

#[derive(Serialize)]
struct GraphSnapshot<'a> {
    nodes: &'a [Node],
    connections: &'a [Connection],
}

/// Current graph as `{nodes, connections}`.
#[wasm_bindgen]
pub fn workflow_graph() -> Result<JsValue, JsValue> {
    EDITOR_STATE.with(|state| {
        let state = state.borrow();
        to_js(&GraphSnapshot {
            nodes: state.graph.nodes(),
            connections: state.graph.connections(),
        })
    })
}

#[wasm_bindgen]
pub fn compile_workflow_instruction() -> Result<String, JsValue> {
    EDITOR_STATE.with(|state| {
        let state = state.borrow();
        state.compiler.compile(&state.graph).map_err(JsValue::from)
    })
}

/// Compile the graph and submit it. The outcome arrives through the
/// `workflowCreated` / `executionFailed` callbacks.
#[wasm_bindgen]
pub fn execute_workflow() {
    dispatch_global_message(Message::ExecuteWorkflow);
}

#[wasm_bindgen]
pub fn set_node_status(node_id: &str, status: &str) -> Result<(), JsValue> {
    let status = NodeStatus::parse(status)
        .ok_or_else(|| JsValue::from_str(&format!("unknown node status: {status}")))?;
    dispatch_global_message(Message::SetNodeStatus {
        node_id: node_id.to_string(),
        status,
    });
    Ok(())
}

#[wasm_bindgen]
pub fn set_node_parameter(node_id: &str, key: &str, value: JsValue) -> Result<(), JsValue> {
    let value: serde_json::Value = from_js(value, "parameter value")?;
    dispatch_global_message(Message::SetNodeParameter {
        node_id: node_id.to_string(),
        key: key.to_string(),
        value,
    });
    Ok(())
}

#[wasm_bindgen]
pub fn delete_canvas_node(node_id: &str) {
    dispatch_global_message(Message::DeleteNode {
        node_id: node_id.to_string(),
    });
}

#[wasm_bindgen]
pub fn reset_canvas_view() {
    dispatch_global_message(Message::ResetView);
}

/// Pan so the graph's bounding box sits in the middle of the canvas.
#[wasm_bindgen]
pub fn center_canvas_view() {
    dispatch_global_message(Message::CenterView);
}

//! Host callback registry.
//!
//! The host registers plain JS functions by event name with
//! `on_canvas_event`; `emit` calls them with positional arguments, e.g.
//! `nodeMove(id, {x, y})`.

use crate::constants::*;
use crate::messages::CanvasEvent;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

const EVENT_NAMES: [&str; 8] = [
    EVENT_NODE_MOVE,
    EVENT_NODE_CONNECT,
    EVENT_NODE_DELETE,
    EVENT_NODE_SELECT,
    EVENT_DROP,
    EVENT_CONNECTION_DELETE,
    EVENT_WORKFLOW_CREATED,
    EVENT_EXECUTION_FAILED,
];

thread_local! {
    static CALLBACKS: RefCell<HashMap<&'static str, js_sys::Function>> = RefCell::new(HashMap::new());
}

/// Register (or replace) the callback for `name`.
#[wasm_bindgen]
pub fn on_canvas_event(name: &str, callback: js_sys::Function) -> Result<(), JsValue> {
    let key = EVENT_NAMES
        .iter()
        .find(|n| **n == name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown canvas event: {name}")))?;
    CALLBACKS.with(|c| c.borrow_mut().insert(*key, callback));
    Ok(())
}

pub fn emit(event: &CanvasEvent) {
    // Clone out so a callback that re-enters the editor can register handlers.
    let Some(callback) = CALLBACKS.with(|c| c.borrow().get(event.name()).cloned()) else {
        return;
    };
    let args = match event_args(event) {
        Ok(args) => args,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Failed to encode {} payload: {}", event.name(), e).into(),
            );
            return;
        }
    };
    if let Err(e) = callback.apply(&JsValue::NULL, &args) {
        web_sys::console::warn_1(&format!("{} callback threw: {:?}", event.name(), e).into());
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    // Plain objects rather than JS `Map`s for parameter maps.
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn event_args(event: &CanvasEvent) -> Result<js_sys::Array, serde_wasm_bindgen::Error> {
    let values = match event {
        CanvasEvent::NodeMove { id, position } => vec![to_js(id)?, to_js(position)?],
        CanvasEvent::NodeConnect {
            source_id,
            target_id,
        } => vec![to_js(source_id)?, to_js(target_id)?],
        CanvasEvent::NodeDelete { id } | CanvasEvent::ConnectionDelete { id } => vec![to_js(id)?],
        CanvasEvent::NodeSelect { node } => vec![to_js(node)?],
        CanvasEvent::Drop { template, position } => vec![to_js(template)?, to_js(position)?],
        CanvasEvent::WorkflowCreated { workflow_id } => vec![to_js(workflow_id)?],
        CanvasEvent::ExecutionFailed { message } => vec![to_js(message)?],
    };
    Ok(values.into_iter().collect())
}

//! DOM wiring for the canvas: pointer, wheel, drag-and-drop and keyboard
//! listeners feed `Message`s into the editor; a requestAnimationFrame loop
//! repaints when the state is dirty.

use crate::constants::{CSS_DROP_TARGET, TEMPLATE_MIME_TYPE};
use crate::messages::Message;
use crate::models::Point;
use crate::state::{dispatch_global_message, EDITOR_STATE};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, DragEvent, HtmlCanvasElement,
    KeyboardEvent, MouseEvent, PointerEvent, WheelEvent,
};

/// Look up `<canvas id=canvas_id>` and its 2D context without touching it.
pub fn resolve_canvas(
    document: &Document,
    canvas_id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((canvas, context))
}

/// Hand a resolved canvas to the editor and attach every listener plus the
/// animation loop. Runs once per page.
pub fn attach_canvas(
    document: &Document,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
) -> Result<(), JsValue> {
    EDITOR_STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.canvas = Some(canvas.clone());
        state.context = Some(context);
        state.mark_dirty();
    });

    resize_canvas(&canvas)?;
    setup_pointer_events(&canvas)?;
    setup_wheel(&canvas)?;
    setup_drag_drop(&canvas)?;
    setup_keyboard(document)?;
    setup_resize_handler(&canvas)?;
    setup_animation_loop()?;
    Ok(())
}

/// Match the backing store to the CSS size times the device pixel ratio and
/// report the CSS size to the editor.
pub fn resize_canvas(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let dpr = window.device_pixel_ratio();

    let (width, height) = match canvas.parent_element() {
        Some(parent) if parent.client_width() > 0 && parent.client_height() > 0 => {
            (parent.client_width(), parent.client_height())
        }
        _ => (canvas.client_width(), canvas.client_height()),
    };
    if width <= 0 || height <= 0 {
        return Ok(());
    }

    canvas.set_width((width as f64 * dpr) as u32);
    canvas.set_height((height as f64 * dpr) as u32);
    let style = canvas.style();
    style.set_property("width", &format!("{width}px"))?;
    style.set_property("height", &format!("{height}px"))?;

    dispatch_global_message(Message::CanvasResized {
        width: width as f64,
        height: height as f64,
    });
    Ok(())
}

fn event_point(event: &MouseEvent) -> Point {
    Point::new(event.offset_x() as f64, event.offset_y() as f64)
}

fn setup_pointer_events(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let canvas_down = canvas.clone();
    let on_down = Closure::wrap(Box::new(move |event: PointerEvent| {
        if event.button() != 0 {
            return;
        }
        // Keep receiving moves if the pointer leaves the element mid-drag.
        let _ = canvas_down.set_pointer_capture(event.pointer_id());
        dispatch_global_message(Message::PointerDown {
            screen: event_point(&event),
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_move = Closure::wrap(Box::new(move |event: PointerEvent| {
        dispatch_global_message(Message::PointerMove {
            screen: event_point(&event),
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let canvas_up = canvas.clone();
    let on_up = Closure::wrap(Box::new(move |event: PointerEvent| {
        let _ = canvas_up.release_pointer_capture(event.pointer_id());
        dispatch_global_message(Message::PointerUp {
            screen: event_point(&event),
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let on_cancel = Closure::wrap(Box::new(move |_event: PointerEvent| {
        dispatch_global_message(Message::PointerLeave);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointercancel", on_cancel.as_ref().unchecked_ref())?;
    canvas.add_event_listener_with_callback("pointerleave", on_cancel.as_ref().unchecked_ref())?;
    on_cancel.forget();

    Ok(())
}

fn setup_wheel(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        dispatch_global_message(Message::Wheel {
            screen: event_point(&event),
            delta_y: event.delta_y(),
        });
    }) as Box<dyn FnMut(_)>);

    let options = AddEventListenerOptions::new();
    options.set_passive(false); // Allow preventDefault inside wheel handler
    canvas.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        on_wheel.as_ref().unchecked_ref(),
        &options,
    )?;
    on_wheel.forget();
    Ok(())
}

fn set_drop_highlight(canvas: &HtmlCanvasElement, on: bool) {
    let classes = canvas.class_list();
    let _ = if on {
        classes.add_1(CSS_DROP_TARGET)
    } else {
        classes.remove_1(CSS_DROP_TARGET)
    };
}

fn setup_drag_drop(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let canvas_over = canvas.clone();
    let on_dragover = Closure::wrap(Box::new(move |event: DragEvent| {
        // Prevent default to allow drop
        event.prevent_default();
        if let Some(dt) = event.data_transfer() {
            dt.set_drop_effect("copy");
        }
        set_drop_highlight(&canvas_over, true);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("dragover", on_dragover.as_ref().unchecked_ref())?;
    on_dragover.forget();

    let canvas_leave = canvas.clone();
    let on_dragleave = Closure::wrap(Box::new(move |_event: DragEvent| {
        set_drop_highlight(&canvas_leave, false);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("dragleave", on_dragleave.as_ref().unchecked_ref())?;
    on_dragleave.forget();

    let canvas_drop = canvas.clone();
    let on_drop = Closure::wrap(Box::new(move |event: DragEvent| {
        event.prevent_default();
        set_drop_highlight(&canvas_drop, false);

        let screen = event_point(&event);
        crate::debug_log!("Drop event at screen ({}, {})", screen.x, screen.y);

        let Some(dt) = event.data_transfer() else {
            return;
        };
        let json = dt.get_data(TEMPLATE_MIME_TYPE).ok();
        let plain = dt.get_data("text/plain").ok();
        let template = EDITOR_STATE.with(|state| {
            crate::components::node_palette::template_from_payload(
                &state.borrow().catalog,
                json.as_deref(),
                plain.as_deref(),
            )
        });
        match template {
            Some(template) => dispatch_global_message(Message::DropTemplate { template, screen }),
            None => dispatch_global_message(Message::TemplateDragEnd),
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())?;
    on_drop.forget();

    Ok(())
}

fn setup_keyboard(document: &Document) -> Result<(), JsValue> {
    let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.key() != "Delete" && event.key() != "Backspace" {
            return;
        }
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let active = document.active_element();
        let on_canvas = active.as_ref().is_some_and(|el| {
            EDITOR_STATE.with(|s| {
                s.borrow()
                    .canvas
                    .as_ref()
                    .is_some_and(|c| c.is_same_node(Some(&**el)))
            })
        });
        let editable = active
            .as_ref()
            .and_then(|el| el.dyn_ref::<web_sys::HtmlElement>())
            .is_some_and(|h| h.is_content_editable());
        let tag = active.as_ref().map(|el| el.node_name());
        if !delete_key_targets_canvas(tag.as_deref(), on_canvas, editable) {
            return;
        }
        let has_selection = EDITOR_STATE.with(|s| s.borrow().selected_node_id.is_some());
        if has_selection {
            event.prevent_default();
            dispatch_global_message(Message::DeleteSelected);
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
    on_keydown.forget();
    Ok(())
}

/// Delete/Backspace only reaches the graph when focus is on the canvas or
/// nowhere in particular. Form controls keep their own key handling.
pub(crate) fn delete_key_targets_canvas(active_tag: Option<&str>, on_canvas: bool, editable: bool) -> bool {
    if editable {
        return false;
    }
    on_canvas || matches!(active_tag, None | Some("BODY") | Some("HTML"))
}

fn setup_resize_handler(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let canvas = canvas.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        if let Err(e) = resize_canvas(&canvas) {
            web_sys::console::warn_1(&e);
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    // Leak the closure to keep it alive for the lifetime of the application
    on_resize.forget();
    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no global window"))?
        .request_animation_frame(f.as_ref().unchecked_ref())
}

fn setup_animation_loop() -> Result<(), JsValue> {
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();

    *next.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64| {
        dispatch_global_message(Message::AnimationTick);
        EDITOR_STATE.with(|state| {
            let mut state = state.borrow_mut();
            if state.take_dirty() {
                if let Err(e) = crate::canvas::renderer::draw_editor(&state) {
                    web_sys::console::error_1(&e);
                }
            }
        });
        if let Some(cb) = frame.borrow().as_ref() {
            let _ = request_animation_frame(cb);
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = next.borrow().as_ref() {
        request_animation_frame(cb)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_key_reaches_graph_from_canvas_or_page() {
        assert!(delete_key_targets_canvas(None, false, false));
        assert!(delete_key_targets_canvas(Some("BODY"), false, false));
        assert!(delete_key_targets_canvas(Some("CANVAS"), true, false));
    }

    #[test]
    fn delete_key_ignored_in_form_controls() {
        for tag in ["INPUT", "TEXTAREA", "SELECT", "BUTTON"] {
            assert!(!delete_key_targets_canvas(Some(tag), false, false), "{tag}");
        }
        assert!(!delete_key_targets_canvas(Some("DIV"), false, true));
        // Another canvas on the page is not ours.
        assert!(!delete_key_targets_canvas(Some("CANVAS"), false, false));
    }
}

use crate::catalog::TaskCatalog;
use crate::constants::{CSS_PALETTE_HEADER, CSS_PALETTE_ITEM, TEMPLATE_MIME_TYPE};
use crate::messages::Message;
use crate::models::TaskTemplate;
use crate::state::dispatch_global_message;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DragEvent, Element};

/// Render the catalog as draggable items inside `container`.
pub fn render_palette(
    document: &Document,
    container: &Element,
    catalog: &TaskCatalog,
) -> Result<(), JsValue> {
    container.set_inner_html("");

    let header = document.create_element("div")?;
    header.set_class_name(CSS_PALETTE_HEADER);
    header.set_text_content(Some("Tasks"));
    container.append_child(&header)?;

    for template in catalog.templates() {
        let item = palette_item(document, template)?;
        container.append_child(&item)?;
    }
    Ok(())
}

fn palette_item(document: &Document, template: &TaskTemplate) -> Result<Element, JsValue> {
    let item = document.create_element("div")?;
    item.set_class_name(CSS_PALETTE_ITEM);
    item.set_attribute("draggable", "true")?;
    item.set_attribute("data-template-type", &template.template_type)?;
    item.set_attribute("title", &template.description)?;

    let icon = document.create_element("span")?;
    icon.set_class_name("palette-icon");
    icon.set_text_content(Some(&template.icon));
    item.append_child(&icon)?;

    let label = document.create_element("span")?;
    label.set_class_name("palette-label");
    label.set_text_content(Some(&template.title));
    item.append_child(&label)?;

    let payload = serde_json::to_string(template).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let dragged = template.clone();
    let ondragstart = Closure::wrap(Box::new(move |event: DragEvent| {
        if let Some(dt) = event.data_transfer() {
            let _ = dt.set_data(TEMPLATE_MIME_TYPE, &payload);
            let _ = dt.set_data("text/plain", &dragged.template_type);
            dt.set_effect_allowed("copy");
        }
        dispatch_global_message(Message::TemplateDragStart {
            template: dragged.clone(),
        });
    }) as Box<dyn FnMut(_)>);
    item.add_event_listener_with_callback("dragstart", ondragstart.as_ref().unchecked_ref())?;
    ondragstart.forget();

    let ondragend = Closure::wrap(Box::new(move |_event: DragEvent| {
        dispatch_global_message(Message::TemplateDragEnd);
    }) as Box<dyn FnMut(_)>);
    item.add_event_listener_with_callback("dragend", ondragend.as_ref().unchecked_ref())?;
    ondragend.forget();

    Ok(item)
}

/// Decode a drop payload: a full template as JSON, or failing that a bare
/// template type looked up in the catalog.
pub fn template_from_payload(
    catalog: &TaskCatalog,
    json: Option<&str>,
    plain: Option<&str>,
) -> Option<TaskTemplate> {
    json.and_then(|j| serde_json::from_str::<TaskTemplate>(j).ok())
        .or_else(|| plain.and_then(|p| catalog.get(p.trim()).cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_prefers_json_template() {
        let catalog = TaskCatalog::default();
        let json = r#"{"templateType": "custom", "title": "Custom"}"#;
        let t = template_from_payload(&catalog, Some(json), Some("search")).unwrap();
        assert_eq!(t.template_type, "custom");
    }

    #[test]
    fn payload_falls_back_to_catalog_lookup() {
        let catalog = TaskCatalog::default();
        let t = template_from_payload(&catalog, Some(""), Some(" search ")).unwrap();
        assert_eq!(t.title, "Search");
        assert!(template_from_payload(&catalog, None, Some("unknown")).is_none());
        assert!(template_from_payload(&catalog, Some("{bad"), None).is_none());
    }
}

//! Task template catalog.
//!
//! The catalog is read-only input to the editor: the palette renders it and
//! a drop looks templates up by `template_type`.

use crate::models::{ColorGradient, TaskTemplate};
use lazy_static::lazy_static;
use serde_json::{json, Map, Value};

lazy_static! {
    static ref DEFAULT_TEMPLATES: Vec<TaskTemplate> = vec![
        template(
            "search",
            "Search",
            "Search the web for relevant information",
            "🔍",
            ColorGradient::new("#3b82f6", "#06b6d4"),
            &["query"],
            &["results"],
            json!({ "maxResults": 10 }),
        ),
        template(
            "analyze",
            "Analyze",
            "Analyze the collected data and extract insights",
            "📊",
            ColorGradient::new("#8b5cf6", "#ec4899"),
            &["data"],
            &["insights"],
            json!({ "depth": "standard" }),
        ),
        template(
            "summarize",
            "Summarize",
            "Condense the input into a short summary",
            "📝",
            ColorGradient::new("#10b981", "#84cc16"),
            &["text"],
            &["summary"],
            json!({ "maxWords": 200 }),
        ),
        template(
            "extract",
            "Extract",
            "Pull structured fields out of unstructured content",
            "🧩",
            ColorGradient::new("#f59e0b", "#ef4444"),
            &["content"],
            &["fields"],
            json!({ "schema": "" }),
        ),
        template(
            "notify",
            "Notify",
            "Send the result to a channel",
            "📣",
            ColorGradient::new("#ef4444", "#f97316"),
            &["message"],
            &[],
            json!({ "channel": "email" }),
        ),
    ];
}

#[allow(clippy::too_many_arguments)]
fn template(
    template_type: &str,
    title: &str,
    description: &str,
    icon: &str,
    color_gradient: ColorGradient,
    inputs: &[&str],
    outputs: &[&str],
    parameters: Value,
) -> TaskTemplate {
    TaskTemplate {
        template_type: template_type.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        color_gradient,
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        outputs: outputs.iter().map(|s| s.to_string()).collect(),
        parameters: match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskCatalog {
    templates: Vec<TaskTemplate>,
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES.clone(),
        }
    }
}

impl TaskCatalog {
    /// Build a catalog from host-supplied templates. Later entries with a
    /// `template_type` already seen are ignored.
    pub fn new(templates: Vec<TaskTemplate>) -> Self {
        let mut unique: Vec<TaskTemplate> = Vec::with_capacity(templates.len());
        for t in templates {
            if unique.iter().all(|u| u.template_type != t.template_type) {
                unique.push(t);
            }
        }
        Self { templates: unique }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let templates: Vec<TaskTemplate> = serde_json::from_str(json)?;
        Ok(Self::new(templates))
    }

    pub fn get(&self, template_type: &str) -> Option<&TaskTemplate> {
        self.templates
            .iter()
            .find(|t| t.template_type == template_type)
    }

    pub fn templates(&self) -> &[TaskTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_unique_types() {
        let catalog = TaskCatalog::default();
        assert!(!catalog.is_empty());
        let search = catalog.get("search").expect("search template");
        assert_eq!(search.title, "Search");
        assert_eq!(search.outputs, vec!["results".to_string()]);
        assert_eq!(search.parameters["maxResults"], 10);
    }

    #[test]
    fn duplicate_template_types_keep_first() {
        let catalog = TaskCatalog::from_json(
            r#"[
                {"templateType": "a", "title": "First"},
                {"templateType": "a", "title": "Second"},
                {"templateType": "b", "title": "Other"}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().title, "First");
        assert!(catalog.get("missing").is_none());
    }
}

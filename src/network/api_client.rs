use crate::debug_log;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[derive(Serialize)]
struct CreateWorkflowRequest<'a> {
    instruction: &'a str,
}

/// REST client for the external execution service.
pub struct ApiClient;

impl ApiClient {
    /// `POST /api/workflows` with `{ "instruction": … }`; resolves to the
    /// new workflow's id.
    pub async fn create_workflow(instruction: &str) -> Result<String, JsValue> {
        let url = super::api_config().url("/workflows");
        let body = serde_json::to_string(&CreateWorkflowRequest { instruction })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        debug_log!("POST {} ({} chars)", url, instruction.len());
        let response = Self::fetch_json(&url, "POST", Some(&body)).await?;
        parse_workflow_id(&response).map_err(|e| JsValue::from_str(&e))
    }

    pub async fn fetch_json(url: &str, method: &str, body: Option<&str>) -> Result<String, JsValue> {
        use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

        // Avoid mixed-content failures when the page itself is served over HTTPS.
        let mut effective_url = url.to_string();
        if let Some(win) = web_sys::window() {
            if let Ok(protocol) = win.location().protocol() {
                if protocol == "https:" && effective_url.starts_with("http://") {
                    effective_url = effective_url.replacen("http://", "https://", 1);
                }
            }
        }

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new()?;
        headers.append("Accept", "application/json")?;
        if let Some(data) = body {
            opts.set_body(&JsValue::from_str(data));
            headers.append("Content-Type", "application/json")?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(&effective_url, &opts)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        let text = JsFuture::from(resp.text()?).await?;
        let text = text.as_string().unwrap_or_default();
        if !resp.ok() {
            return Err(JsValue::from_str(&format_http_error(
                resp.status(),
                &resp.status_text(),
                &text,
            )));
        }
        Ok(text)
    }
}

/// Pull the workflow id out of a `createWorkflow` response. Accepts
/// `workflowId`, `workflow_id` or `id`, as a string or a number.
pub fn parse_workflow_id(body: &str) -> Result<String, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("invalid createWorkflow response: {e}"))?;
    ["workflowId", "workflow_id", "id"]
        .iter()
        .filter_map(|key| value.get(key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| "createWorkflow response has no workflowId".to_string())
}

/// Human-readable error for a non-2xx response, preferring the server's
/// `detail`/`message`/`error` field when the body is JSON.
pub fn format_http_error(status: u16, status_text: &str, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["detail", "message", "error"]
            .iter()
            .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_string))
    });
    match (detail, body.trim()) {
        (Some(d), _) => format!("HTTP {status}: {d}"),
        (None, "") => format!("HTTP {status} {status_text}").trim_end().to_string(),
        (None, raw) => format!("HTTP {status}: {raw}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_workflow_id_variants() {
        assert_eq!(parse_workflow_id(r#"{"workflowId": "wf-1"}"#), Ok("wf-1".into()));
        assert_eq!(parse_workflow_id(r#"{"workflow_id": 42}"#), Ok("42".into()));
        assert_eq!(parse_workflow_id(r#"{"id": "abc", "status": "queued"}"#), Ok("abc".into()));
        assert!(parse_workflow_id(r#"{"workflowId": ""}"#).is_err());
        assert!(parse_workflow_id(r#"{"status": "ok"}"#).is_err());
        assert!(parse_workflow_id("not json").is_err());
    }

    #[test]
    fn http_errors_prefer_server_detail() {
        assert_eq!(
            format_http_error(422, "Unprocessable Entity", r#"{"detail": "instruction too long"}"#),
            "HTTP 422: instruction too long"
        );
        assert_eq!(format_http_error(502, "Bad Gateway", ""), "HTTP 502 Bad Gateway");
        assert_eq!(format_http_error(500, "", "boom"), "HTTP 500: boom");
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_string(&CreateWorkflowRequest { instruction: "x" }).unwrap();
        assert_eq!(body, r#"{"instruction":"x"}"#);
    }
}

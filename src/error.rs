use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while linearizing a graph into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Topological ordering was requested but connections form a cycle.
    #[error("connections form a cycle through: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Guard failures raised before the execution API is called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("cannot execute an empty workflow")]
    EmptyWorkflow,

    #[error(transparent)]
    Compile(#[from] CompileError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("zoom limits must satisfy 0 < min <= max (got min={min}, max={max})")]
    InvalidZoomLimits { min: f64, max: f64 },

    #[error("{0} must be a positive, finite number")]
    NonPositive(&'static str),
}

impl From<ExecuteError> for JsValue {
    fn from(err: ExecuteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<CompileError> for JsValue {
    fn from(err: CompileError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub mod api_client;
pub mod config;

pub use api_client::ApiClient;

use config::ApiConfig;
use lazy_static::lazy_static;
use std::sync::RwLock;
use wasm_bindgen::prelude::*;

lazy_static! {
    static ref API_CONFIG: RwLock<Option<ApiConfig>> = RwLock::new(None);
}

/// Install the build-time configuration unless one is already set.
pub fn init_api_config() {
    let mut guard = API_CONFIG.write().unwrap_or_else(|e| e.into_inner());
    if guard.is_none() {
        *guard = Some(ApiConfig::new());
    }
}

/// Point the execution client at `api_base_url` at runtime.
#[wasm_bindgen]
pub fn init_api_config_js(api_base_url: &str) -> Result<(), JsValue> {
    crate::debug_log!("Initializing API config from JS: {}", api_base_url);
    set_api_config(ApiConfig::from_url(api_base_url));
    Ok(())
}

pub(crate) fn set_api_config(config: ApiConfig) {
    *API_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = Some(config);
}

/// Current configuration; same-origin when nothing was installed.
pub(crate) fn api_config() -> ApiConfig {
    API_CONFIG
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .unwrap_or_default()
}

/// Execution API location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    // Empty means same-origin: requests go to relative "/api/..." URLs.
    base_url: String,
}

impl ApiConfig {
    /// Base URL baked in at build time through `API_BASE_URL`, falling back
    /// to same-origin.
    pub fn new() -> Self {
        Self::from_url(option_env!("API_BASE_URL").unwrap_or(""))
    }

    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path such as `/workflows`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

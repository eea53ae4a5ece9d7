//! Backend connection settings.

use std::time::Duration;

/// Where the activity backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for BackendConfig {
    /// Defaults with env var overrides (`ACTIVITY_BACKEND_URL`,
    /// `ACTIVITY_BACKEND_TIMEOUT_SECS`).
    fn default() -> Self {
        Self {
            base_url: std::env::var("ACTIVITY_BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ACTIVITY_BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

impl BackendConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

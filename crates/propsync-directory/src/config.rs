//! Directory client configuration.

use std::time::Duration;

use crate::auth::Credentials;
use crate::error::{DirectoryError, DirectoryResult};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API root appended to the instance URL.
pub const API_ROOT: [&str; 3] = ["api", "xm", "1"];

/// Connection settings for a directory instance.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Instance URL, e.g. `https://acme-np.example.com`.
    pub base_url: String,
    /// Credentials applied to every request.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DirectoryConfig {
    /// Create a configuration with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse and normalize the base URL.
    pub fn parsed_base_url(&self) -> DirectoryResult<url::Url> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let url = url::Url::parse(trimmed)
            .map_err(|e| DirectoryError::InvalidConfig(format!("invalid URL '{trimmed}': {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DirectoryError::InvalidConfig(format!(
                    "unsupported scheme '{other}' in '{trimmed}'"
                )))
            }
        }
        if url.cannot_be_a_base() {
            return Err(DirectoryError::InvalidConfig(format!(
                "'{trimmed}' cannot be used as a base URL"
            )));
        }
        Ok(url)
    }
}

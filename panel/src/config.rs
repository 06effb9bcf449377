//! Panel configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://reqres.in/api";
const DEFAULT_STORE_PATH: &str = ".panel/session.json";

/// Settings for reaching the directory and persisting the session.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PANEL")]
pub struct PanelSettings {
    /// Base URL of the users API.
    pub api_base_url: Option<String>,
    /// Value for the `x-api-key` header, if the API wants one.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Location of the session store file.
    pub store_path: Option<PathBuf>,
    /// Lifetime given to sessions created by `login` without `--ttl`.
    #[ortho_config(default = 3600)]
    pub session_ttl_secs: u64,
}

impl PanelSettings {
    /// Return the parsed base URL, falling back to the public demo API.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// Return the API key when one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Return the request timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Return the session store path, falling back to the default.
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    /// Return the default session lifetime in seconds.
    pub const fn session_ttl_secs(&self) -> u64 {
        self.session_ttl_secs
    }
}

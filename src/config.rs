//! Runtime configuration.
//!
//! Service credentials are supplied at process start instead of being embedded in
//! source. A config can come from a TOML file or from the `FIREBASE_CONFIG`
//! environment variable holding the JSON web-app config object that the Firebase
//! console hands out (`apiKey`, `databaseURL`, ...).

use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted by [`DashboardConfig::discover`].
pub const FIREBASE_CONFIG_ENV: &str = "FIREBASE_CONFIG";

const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_ROOT_PATH: &str = "/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Firebase project settings. Field aliases accept the camelCase keys of the web config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    #[serde(alias = "apiKey")]
    pub api_key: String,

    #[serde(alias = "authDomain", default)]
    pub auth_domain: Option<String>,

    #[serde(alias = "databaseURL", alias = "databaseUrl")]
    pub database_url: String,

    #[serde(alias = "projectId", default)]
    pub project_id: Option<String>,

    #[serde(alias = "storageBucket", default)]
    pub storage_bucket: Option<String>,

    #[serde(alias = "messagingSenderId", default)]
    pub messaging_sender_id: Option<String>,

    #[serde(alias = "appId", default)]
    pub app_id: Option<String>,

    /// Base URL of the Identity Toolkit API; point it at the auth emulator for local runs.
    #[serde(alias = "authEndpoint", default = "default_auth_endpoint")]
    pub auth_endpoint: String,
}

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub firebase: FirebaseConfig,

    /// Location the page is sent to when nobody is signed in
    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Per-request timeout for the HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_auth_endpoint() -> String {
    DEFAULT_AUTH_ENDPOINT.to_string()
}

fn default_root_path() -> String {
    DEFAULT_ROOT_PATH.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl FirebaseConfig {
    /// Minimal config pointing at a database, for tests and emulators.
    pub fn new(api_key: impl Into<String>, database_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            auth_domain: None,
            database_url: database_url.into(),
            project_id: None,
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
            auth_endpoint: default_auth_endpoint(),
        }
    }
}

impl DashboardConfig {
    pub fn new(firebase: FirebaseConfig) -> Self {
        Self {
            firebase,
            root_path: default_root_path(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| DashError::IoError {
            message: format!("Failed to read config file {}", path.display()),
            source: err,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| DashError::config(format!("invalid TOML: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config from a JSON web-app config object.
    pub fn from_firebase_json(raw: &str) -> Result<Self> {
        let firebase: FirebaseConfig = serde_json::from_str(raw).map_err(|err| {
            DashError::config(format!("{FIREBASE_CONFIG_ENV} is not a valid config object: {err}"))
        })?;
        let config = Self::new(firebase);
        config.validate()?;
        Ok(config)
    }

    /// Find a config: `$FIREBASE_CONFIG` first, then the per-user config file.
    pub fn discover() -> Result<Self> {
        Self::discover_from(std::env::var(FIREBASE_CONFIG_ENV).ok(), Self::default_path())
    }

    pub fn discover_from(env_value: Option<String>, default_path: Option<PathBuf>) -> Result<Self> {
        if let Some(raw) = env_value.filter(|value| !value.trim().is_empty()) {
            log::debug!("using configuration from {FIREBASE_CONFIG_ENV}");
            return Self::from_firebase_json(&raw);
        }

        match default_path {
            Some(path) if path.is_file() => {
                log::debug!("using configuration from {}", path.display());
                Self::load(&path)
            }
            Some(path) => Err(DashError::config(format!(
                "no configuration found: set {FIREBASE_CONFIG_ENV} or create {}",
                path.display()
            ))),
            None => Err(DashError::config(format!(
                "no configuration found: set {FIREBASE_CONFIG_ENV} or pass --config"
            ))),
        }
    }

    /// `{config_dir}/orderdash/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("orderdash").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.firebase.api_key.trim().is_empty() {
            return Err(DashError::config("api_key must not be empty"));
        }

        let database_url = self.firebase.database_url.trim();
        if database_url.is_empty() {
            return Err(DashError::config("database_url must not be empty"));
        }
        match url::Url::parse(database_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(DashError::config(format!(
                    "database_url must be http(s), got scheme '{}'",
                    parsed.scheme()
                )))
            }
            Err(err) => {
                return Err(DashError::config(format!("database_url is not a URL: {err}")))
            }
        }

        if !self.root_path.starts_with('/') {
            return Err(DashError::config("root_path must start with '/'"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

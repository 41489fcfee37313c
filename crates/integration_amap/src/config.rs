//! AMap client configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{entity::DecodeMode, error::AmapError};

/// Configuration for the AMap web service client
#[derive(Clone, Serialize, Deserialize)]
pub struct AmapConfig {
    /// Web service key
    #[serde(default, skip_serializing)]
    pub key: Option<SecretString>,

    /// Private key; when set every request carries an MD5 `sig`
    #[serde(default, skip_serializing)]
    pub private_key: Option<SecretString>,

    /// Base URL of the web service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Resolve entity properties once at decode time
    #[serde(default = "default_static_mode")]
    pub static_mode: bool,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://restapi.amap.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_static_mode() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("amap-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            key: None,
            private_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            static_mode: default_static_mode(),
            user_agent: default_user_agent(),
        }
    }
}

impl AmapConfig {
    /// Configuration with a key and defaults for everything else
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(SecretString::from(key.into())),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Self::with_key("test-key")
        }
    }

    /// Load from an optional `amap` config file and `AMAP_*` environment
    /// variables (e.g. `AMAP_KEY`, `AMAP_PRIVATE_KEY`, `AMAP_TIMEOUT_SECS`)
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("amap")
    }

    /// Same as [`Self::load`] with a custom config file name
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load_from(file_name: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file_name).required(false))
            .add_source(
                config::Environment::with_prefix("AMAP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an unparsable base URL, a zero
    /// timeout or a blank key.
    pub fn validate(&self) -> Result<(), AmapError> {
        Url::parse(&self.base_url).map_err(|e| {
            AmapError::ConfigurationError(format!("invalid base_url '{}': {e}", self.base_url))
        })?;

        if self.timeout_secs == 0 {
            return Err(AmapError::ConfigurationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self
            .key
            .as_ref()
            .is_some_and(|key| key.expose_secret().trim().is_empty())
        {
            return Err(AmapError::ConfigurationError("key must not be blank".to_string()));
        }

        Ok(())
    }

    /// Entity resolution mode for decoded responses
    #[must_use]
    pub const fn mode(&self) -> DecodeMode {
        DecodeMode::from_static_flag(self.static_mode)
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for AmapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmapConfig")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("static_mode", &self.static_mode)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

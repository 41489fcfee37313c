//! Account credentials shared by every request

use std::fmt;

use domain::RouteKey;
use secrecy::{ExposeSecret, SecretString};

use super::{PreparedRequest, WireParams};
use crate::{config::AmapConfig, error::AmapError, signature::sign};

/// Output format requested from the service
const OUTPUT_FORMAT: &str = "JSON";

/// Account key and optional private signing key
#[derive(Clone, Default)]
pub struct Credentials {
    key: Option<SecretString>,
    private_key: Option<SecretString>,
}

impl Credentials {
    /// Credentials with an account key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(SecretString::from(key.into())),
            private_key: None,
        }
    }

    /// Add a private key; requests are then signed
    #[must_use]
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(SecretString::from(private_key.into()));
        self
    }

    /// Credentials taken from configuration
    #[must_use]
    pub fn from_config(config: &AmapConfig) -> Self {
        Self {
            key: config.key.clone(),
            private_key: config.private_key.clone(),
        }
    }

    /// Account key, exposed for building the request
    #[must_use]
    pub fn key_str(&self) -> Option<&str> {
        self.key.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Whether requests get signed
    #[must_use]
    pub const fn signs(&self) -> bool {
        self.private_key.is_some()
    }

    /// Append key, output format and signature
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when no key is configured.
    pub fn apply(&self, route: RouteKey, mut params: WireParams) -> Result<PreparedRequest, AmapError> {
        let key = self
            .key_str()
            .ok_or_else(|| AmapError::ConfigurationError("AMap key is not configured".to_string()))?;
        params.push("key", key);
        params.push("output", OUTPUT_FORMAT);

        if let Some(private_key) = &self.private_key {
            let sig = sign(params.pairs(), private_key.expose_secret());
            params.push("sig", sig);
        }

        Ok(PreparedRequest { route, params })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

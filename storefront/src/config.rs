//! Storefront configuration.
//!
//! Values are provided by the application or read from the environment;
//! nothing here is hardcoded beyond development defaults.

use std::time::Duration;
use storefront_runtime::StoreConfig;
use thiserror::Error;

/// Environment variable holding the REST base URL
pub const ENV_REST_URL: &str = "STOREFRONT_REST_URL";

/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "STOREFRONT_TIMEOUT_SECS";

/// Environment variable holding the locale, e.g. `en_US`
pub const ENV_LOCALE: &str = "STOREFRONT_LOCALE";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The REST base URL is not an absolute http(s) URL
    #[error("Invalid REST URL: {0}")]
    InvalidRestUrl(String),

    /// The timeout is not a positive number of seconds
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the REST API, e.g. `https://shop.example.com/INTERSHOP/rest/WFS/inSPIRED-inTRONICS-Site/-`
    ///
    /// Resource paths are appended to it.
    pub rest_url: String,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Locale sent as `Accept-Language`; none by default
    pub locale: Option<String>,

    /// Store tuning
    pub store: StoreConfig,
}

impl StorefrontConfig {
    /// Create a configuration for `rest_url` with default settings.
    #[must_use]
    pub fn new(rest_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            ..Self::default()
        }
    }

    /// Read the configuration from the environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_REST_URL) {
            config.rest_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let seconds: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if seconds == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.timeout = Duration::from_secs(seconds);
        }
        config.locale = lookup(ENV_LOCALE).filter(|locale| !locale.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the store configuration.
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRestUrl`] for a URL without an http(s)
    /// scheme and [`ConfigError::InvalidTimeout`] for a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.rest_url.trim();
        let has_host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(ConfigError::InvalidRestUrl(self.rest_url.clone()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        Ok(())
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            rest_url: "http://localhost:8080/INTERSHOP/rest/WFS/inSPIRED-inTRONICS-Site/-".to_string(),
            timeout: Duration::from_secs(30),
            locale: None,
            store: StoreConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.locale, None);
        assert!(config.rest_url.starts_with("http://localhost"));
    }

    #[test]
    fn test_reads_variables() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (ENV_REST_URL, "https://shop.example.com/rest/-"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_LOCALE, "de_DE"),
        ]))
        .unwrap();

        assert_eq!(config.rest_url, "https://shop.example.com/rest/-");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.locale.as_deref(), Some("de_DE"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            StorefrontConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err(),
            ConfigError::InvalidTimeout("soon".to_string())
        );
        assert_eq!(
            StorefrontConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err(),
            ConfigError::InvalidTimeout("0".to_string())
        );
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[(ENV_REST_URL, "shop.example.com")])),
            Err(ConfigError::InvalidRestUrl(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = StorefrontConfig::new("https://shop.example.com")
            .with_timeout(Duration::from_secs(2))
            .with_locale("en_US")
            .with_store(StoreConfig::default().with_broadcast_capacity(16));

        assert!(config.validate().is_ok());
        assert_eq!(config.store.broadcast_capacity, 16);
    }
}

//! Storefront configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Runtime configuration of the state layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Origin of the REST API; routes are appended to it (`/api/...`)
    pub api_base_url: String,

    /// Per-request timeout. `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,

    /// Mailbox capacity of every slice
    pub slice_buffer_size: usize,

    /// Where the UI should navigate once the session expires
    pub login_path: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout: None,
            slice_buffer_size: 32,
            login_path: "/login".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue("API_BASE_URL".to_string()));
        }

        let request_timeout = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("API_TIMEOUT_SECS".to_string()))?;
                // 0 disables the timeout
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let slice_buffer_size = env::var("SLICE_BUFFER_SIZE")
            .unwrap_or_else(|_| defaults.slice_buffer_size.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SLICE_BUFFER_SIZE".to_string()))?;
        if slice_buffer_size == 0 {
            return Err(ConfigError::InvalidValue("SLICE_BUFFER_SIZE".to_string()));
        }

        let login_path = env::var("LOGIN_PATH").unwrap_or(defaults.login_path);

        Ok(Self {
            api_base_url,
            request_timeout,
            slice_buffer_size,
            login_path,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global; keep every env test in this one function.
    #[test]
    fn test_from_env() {
        for key in [
            "API_BASE_URL",
            "API_TIMEOUT_SECS",
            "SLICE_BUFFER_SIZE",
            "LOGIN_PATH",
        ] {
            env::remove_var(key);
        }
        assert_eq!(StorefrontConfig::from_env().unwrap(), StorefrontConfig::default());

        env::set_var("API_BASE_URL", "https://shop.example.com/");
        env::set_var("API_TIMEOUT_SECS", "15");
        env::set_var("SLICE_BUFFER_SIZE", "8");
        let config = StorefrontConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, "https://shop.example.com");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.slice_buffer_size, 8);

        env::set_var("API_TIMEOUT_SECS", "0");
        assert_eq!(StorefrontConfig::from_env().unwrap().request_timeout, None);

        env::set_var("SLICE_BUFFER_SIZE", "lots");
        assert!(matches!(
            StorefrontConfig::from_env(),
            Err(ConfigError::InvalidValue(key)) if key == "SLICE_BUFFER_SIZE"
        ));
        env::remove_var("SLICE_BUFFER_SIZE");

        env::set_var("API_BASE_URL", "shop.example.com");
        assert!(StorefrontConfig::from_env().is_err());
        env::remove_var("API_BASE_URL");
        env::remove_var("API_TIMEOUT_SECS");
    }
}

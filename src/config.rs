//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

/// Backend API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the marketplace backend, no trailing slash.
    pub base_url: String,
    /// Bearer token for the authenticated worker session.
    pub auth_token: SecretString,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Build from `TASKER_API_URL` / `TASKER_API_TOKEN`, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let base_url = std::env::var("TASKER_API_URL")
            .unwrap_or_else(|_| "https://api.taskerapp.example".to_string());
        let auth_token =
            SecretString::from(std::env::var("TASKER_API_TOKEN").unwrap_or_default());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            ..Default::default()
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.taskerapp.example".to_string(),
            auth_token: SecretString::from(""),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path of the local draft database.
    pub db_path: String,
}

impl EngineConfig {
    /// Build from `TASKER_DB_PATH`, defaulting to a local data directory.
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("TASKER_DB_PATH")
                .unwrap_or_else(|_| "./data/onboarding.db".to_string()),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: "./data/onboarding.db".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_config_defaults() {
        let config = ApiConfig::default();
        assert!(!config.base_url.ends_with('/'));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}

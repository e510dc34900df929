//! Process configuration loaded from environment variables.
//!
//! Everything is read once at startup; the values are immutable afterwards.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Insecure fallback so local runs work without setup. Never used when
/// `JWT_SECRET` is set.
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub host_name: String,
    pub listen_port: u16,

    /// KV endpoint list; empty selects the in-memory backend.
    pub kv_endpoints: Vec<String>,
    pub kv_timeout: Duration,

    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    /// Name of the claim carrying the acting owner's id.
    pub owner_claim: String,

    pub github_client_id: String,
    pub github_client_secret: String,
    pub github_oauth_url: String,
    pub github_api_url: String,
    pub github_timeout: Duration,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("host_name", &self.host_name)
            .field("listen_port", &self.listen_port)
            .field("kv_endpoints", &self.kv_endpoints)
            .field("kv_timeout", &self.kv_timeout)
            .field("jwt_ttl", &self.jwt_ttl)
            .field("owner_claim", &self.owner_claim)
            .field("github_client_id", &self.github_client_id)
            .field("github_oauth_url", &self.github_oauth_url)
            .field("github_api_url", &self.github_api_url)
            .field("github_timeout", &self.github_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            host_name: "localhost".to_string(),
            listen_port: 8080,
            kv_endpoints: Vec::new(),
            kv_timeout: Duration::from_millis(5000),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl: Duration::from_secs(60 * 60),
            owner_claim: "userID".to_string(),
            github_client_id: String::new(),
            github_client_secret: String::new(),
            github_oauth_url: "https://github.com/login/oauth".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            github_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = var("LOG_LEVEL") {
            cfg.log_level = v.to_lowercase();
        }
        if let Some(v) = var("HOST_NAME") {
            cfg.host_name = v;
        }
        if let Some(v) = var("LISTEN_PORT") {
            cfg.listen_port = parse("LISTEN_PORT", &v)?;
        }
        if let Some(v) = var("KV_ENDPOINTS") {
            cfg.kv_endpoints = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = var("KV_TIMEOUT_MS") {
            cfg.kv_timeout = Duration::from_millis(parse("KV_TIMEOUT_MS", &v)?);
        }
        match var("JWT_SECRET") {
            Some(v) => cfg.jwt_secret = v,
            None => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }
        if let Some(v) = var("JWT_EXPIRY_MINS") {
            let mins: u64 = parse("JWT_EXPIRY_MINS", &v)?;
            let secs = mins.checked_mul(60).ok_or_else(|| ConfigError::Invalid {
                key: "JWT_EXPIRY_MINS",
                value: v.clone(),
            })?;
            cfg.jwt_ttl = Duration::from_secs(secs);
        }
        if let Some(v) = var("OWNER_CLAIM") {
            cfg.owner_claim = v;
        }
        if let Some(v) = var("GITHUB_CLIENT_ID") {
            cfg.github_client_id = v;
        }
        if let Some(v) = var("GITHUB_CLIENT_SECRET") {
            cfg.github_client_secret = v;
        }
        if let Some(v) = var("GITHUB_OAUTH_URL") {
            cfg.github_oauth_url = v;
        }
        if let Some(v) = var("GITHUB_API_URL") {
            cfg.github_api_url = v;
        }
        if let Some(v) = var("GITHUB_TIMEOUT_SECS") {
            cfg.github_timeout = Duration::from_secs(parse("GITHUB_TIMEOUT_SECS", &v)?);
        }

        Ok(cfg)
    }

    /// Where the identity provider sends the browser back after login.
    pub fn github_callback_url(&self) -> String {
        format!("http://{}:{}/login/github/callback", self.host_name, self.listen_port)
    }
}

fn parse<T: core::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

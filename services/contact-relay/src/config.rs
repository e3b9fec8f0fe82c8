// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay.
//!
//! Values come from an optional JSON file named by `CONFIG_FILE`, then
//! environment variables override individual fields. Anything left unset
//! falls back to the defaults below.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid URL for {key}: {url}")]
    InvalidUrl { key: &'static str, url: String },
}

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Take the client key from `X-Forwarded-For` (default: true)
    #[serde(default = "default_true")]
    pub trust_forwarded_for: bool,

    /// Largest accepted request body in bytes (default: 64 KiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Origins allowed to call the API from a browser. Empty disables CORS.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Spam heuristics configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Outbound mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limiting per client key.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions allowed per window (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often stale records are evicted, in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Deny-lists and thresholds for the heuristic filter.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Case-insensitive user-agent fragments that mark automation tools
    #[serde(default = "default_agent_signatures")]
    pub agent_signatures: Vec<String>,

    /// Whole words that mark a message as spam
    #[serde(default = "default_blocked_keywords")]
    pub blocked_keywords: Vec<String>,

    /// Digit run length in the email that flags it (default: 8)
    #[serde(default = "default_email_digit_run")]
    pub email_digit_run: usize,

    /// Alphanumeric run length in the email that flags it (default: 20)
    #[serde(default = "default_email_token_len")]
    pub email_token_len: usize,
}

/// Transactional mail provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Provider send endpoint. When unset, messages are only logged.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the provider
    #[serde(default)]
    pub api_token: Option<String>,

    /// Endpoint probed by the health check. When unset the provider is
    /// assumed reachable and only real sends can fail.
    #[serde(default)]
    pub health_url: Option<String>,

    /// Sender address
    #[serde(default = "default_mail_from")]
    pub from: String,

    /// Recipient address
    #[serde(default = "default_mail_to")]
    pub to: String,

    /// Upper bound on a single send, in seconds (default: 15)
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    3600
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_agent_signatures() -> Vec<String> {
    [
        "bot",
        "crawler",
        "spider",
        "headless",
        "selenium",
        "puppet",
        "chrome-lighthouse",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_blocked_keywords() -> Vec<String> {
    ["viagra", "cialis", "casino", "poker", "loan", "crypto"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_email_digit_run() -> usize {
    8
}

fn default_email_token_len() -> usize {
    20
}

fn default_mail_from() -> String {
    "contact-relay@localhost".to_string()
}

fn default_mail_to() -> String {
    "inbox@localhost".to_string()
}

fn default_send_timeout_secs() -> u64 {
    15
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            trust_forwarded_for: default_true(),
            max_body_bytes: default_max_body_bytes(),
            cors_allowed_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            filter: FilterConfig::default(),
            mail: MailConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            agent_signatures: default_agent_signatures(),
            blocked_keywords: default_blocked_keywords(),
            email_digit_run: default_email_digit_run(),
            email_token_len: default_email_token_len(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            health_url: None,
            from: default_mail_from(),
            to: default_mail_to(),
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the cleanup interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl MailConfig {
    /// Get the per-send timeout
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}

impl Config {
    /// Load configuration from `CONFIG_FILE` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Apply overrides from a key lookup (normally the environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("TRUST_FORWARDED_FOR") {
            self.trust_forwarded_for = parse_bool("TRUST_FORWARDED_FOR", &v)?;
        }
        if let Some(v) = lookup("MAX_BODY_BYTES") {
            self.max_body_bytes = parse_num("MAX_BODY_BYTES", &v)?;
        }
        if let Some(v) = lookup("CORS_ALLOWED_ORIGINS") {
            self.cors_allowed_origins = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("RATE_LIMIT_MAX") {
            self.rate_limit.max_requests = parse_num("RATE_LIMIT_MAX", &v)?;
        }
        if let Some(v) = lookup("RATE_LIMIT_WINDOW_SECS") {
            self.rate_limit.window_secs = parse_num("RATE_LIMIT_WINDOW_SECS", &v)?;
        }
        if let Some(v) = lookup("MAIL_API_URL") {
            self.mail.api_url = Some(v);
        }
        if let Some(v) = lookup("MAIL_API_TOKEN") {
            self.mail.api_token = Some(v);
        }
        if let Some(v) = lookup("MAIL_HEALTH_URL") {
            self.mail.health_url = Some(v);
        }
        if let Some(v) = lookup("MAIL_FROM") {
            self.mail.from = v;
        }
        if let Some(v) = lookup("MAIL_TO") {
            self.mail.to = v;
        }
        if let Some(v) = lookup("MAIL_TIMEOUT_SECS") {
            self.mail.send_timeout_secs = parse_num("MAIL_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("METRICS_ENABLED") {
            self.metrics.enabled = parse_bool("METRICS_ENABLED", &v)?;
        }
        Ok(())
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                key: "bind_addr",
                value: self.bind_addr.clone(),
            });
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidValue {
                key: "rate_limit.max_requests",
                value: "0".to_string(),
            });
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "rate_limit.window_secs",
                value: "0".to_string(),
            });
        }
        if self.rate_limit.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "rate_limit.cleanup_interval_secs",
                value: "0".to_string(),
            });
        }
        if self.mail.send_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "mail.send_timeout_secs",
                value: "0".to_string(),
            });
        }
        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "metrics.path",
                value: self.metrics.path.clone(),
            });
        }
        if let Some(url) = &self.mail.api_url {
            check_http_url("mail.api_url", url)?;
        }
        if let Some(url) = &self.mail.health_url {
            check_http_url("mail.health_url", url)?;
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn check_http_url(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    match Url::parse(raw) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            key,
            url: raw.to_string(),
        }),
    }
}

//! SDK configuration.
//!
//! The library never installs a tracing subscriber; `log_level` is read by
//! binaries that do. The request/response switches gate the debug logs the
//! client emits.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://glue-api.zapimoveis.com.br/v2/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Settings shared by every request an SDK instance makes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub base_url: String,
    pub log_requests: bool,
    pub log_responses: bool,
    pub log_level: LogLevel,
    /// Timeout applied by the bundled transport.
    #[serde(with = "seconds")]
    pub default_timeout: Duration,
    /// Turn non-success statuses into errors before parsing.
    pub raise_for_status: bool,
    /// Sent as `X-DeviceId`.
    pub device_id: Uuid,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_requests: false,
            log_responses: false,
            log_level: LogLevel::Info,
            default_timeout: Duration::from_secs(10),
            raise_for_status: true,
            device_id: Uuid::new_v4(),
        }
    }
}

impl SdkConfig {
    /// Defaults overlaid with `ZAP_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `ZAP_*` name.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("ZAP_BASE_URL") {
            config.base_url = url;
        }
        if let Some(v) = parse_var(&lookup, "ZAP_LOG_REQUESTS") {
            config.log_requests = v;
        }
        if let Some(v) = parse_var(&lookup, "ZAP_LOG_RESPONSES") {
            config.log_responses = v;
        }
        if let Some(v) = parse_var(&lookup, "ZAP_LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "ZAP_TIMEOUT_SECS") {
            config.default_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = parse_var(&lookup, "ZAP_RAISE_FOR_STATUS") {
            config.raise_for_status = v;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_raise_for_status(mut self, raise: bool) -> Self {
        self.raise_for_status = raise;
        self
    }

    pub fn with_logging(mut self, requests: bool, responses: bool) -> Self {
        self.log_requests = requests;
        self.log_responses = responses;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(variable = name, value = %raw, "Ignoring invalid setting: {}", e);
            None
        }
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

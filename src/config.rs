#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use crate::error::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = ".dispatch/config.toml";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// What happens to a result that completed with nobody registered to receive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnconsumedResultPolicy {
    #[default]
    Log,
    Drop,
}

impl TryFrom<&str> for UnconsumedResultPolicy {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, String> {
        match value {
            "log" => Ok(Self::Log),
            "drop" | "silent" => Ok(Self::Drop),
            _ => Err(format!("Unknown unconsumed result policy: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub request_timeout_ms: Option<u64>,
    pub unconsumed_results: UnconsumedResultPolicy,
    pub log_filter: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: None,
            unconsumed_results: UnconsumedResultPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DispatchConfig {
    /// Zero disables the timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Loads configuration, falling back to defaults when the file does not exist.
///
/// # Errors
///
/// Returns `DispatchError::ConfigError` if the file cannot be read or holds an
/// invalid value.
pub async fn load_config(path: Option<PathBuf>) -> Result<DispatchConfig> {
    let config_path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    if !config_path.exists() {
        return Ok(DispatchConfig::default());
    }

    let content = tokio::fs::read_to_string(&config_path)
        .await
        .map_err(|e| DispatchError::ConfigError(format!("Failed to read config: {e}")))?;

    parse_config_content(&content)
}

/// Parses `key = value` lines; `#` comments and unknown keys are ignored.
///
/// # Errors
///
/// Returns `DispatchError::ConfigError` for values that do not parse.
pub fn parse_config_content(content: &str) -> Result<DispatchConfig> {
    let mut config = DispatchConfig::default();

    for line in content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        if let Some(value) = parse_key_value(line, "request_timeout_ms") {
            let expanded = expand_env_vars(value);
            let millis = expanded.parse::<u64>().map_err(|e| {
                DispatchError::ConfigError(format!("Invalid request_timeout_ms '{expanded}': {e}"))
            })?;
            config.request_timeout_ms = Some(millis);
        }
        if let Some(value) = parse_key_value(line, "unconsumed_results") {
            config.unconsumed_results = UnconsumedResultPolicy::try_from(value)
                .map_err(DispatchError::ConfigError)?;
        }
        if let Some(value) = parse_key_value(line, "log_filter") {
            config.log_filter = expand_env_vars(value);
        }
    }

    Ok(config)
}

fn expand_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_part = &result[start + 2..start + end];
            let (var_name, default) = var_part.split_once(":-").unwrap_or((var_part, ""));
            let value = std::env::var(var_name).unwrap_or_else(|_| default.to_string());
            result.replace_range(start..=(start + end), &value);
        } else {
            break;
        }
    }
    result
}

pub fn parse_key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split_once('=')
        .and_then(|(lhs, rhs)| (lhs.trim() == key).then_some(rhs.trim().trim_matches('"')))
}

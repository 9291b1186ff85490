//! Configuration file management for labscheck.
//!
//! This module handles loading, parsing, and merging configuration from TOML files
//! and command-line arguments. Settings can be specified in multiple places with
//! clear precedence rules.
//!
//! # Configuration Precedence
//!
//! 1. Default values (lowest priority)
//! 2. Configuration file (labscheck.toml or specified with --config)
//! 3. Command-line arguments (highest priority)
//!
//! # Example Configuration File
//!
//! ```toml
//! hosts = ["example.com", "example.org"]
//! retry_attempts = 5
//! api_base = "https://api.ssllabs.com/api/v2"
//! timeout = 30
//! output = "text"
//! exit_code = 2
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::labs::DEFAULT_API_BASE;
use crate::output::OutputFormat;

/// Host checked when nothing else is configured.
pub const DEFAULT_HOST: &str = "elliottmgmt.com";
/// Total attempts per request, including the first one.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Main configuration structure for labscheck.
///
/// All fields are optional to support partial configuration and merging.
/// Missing values will be filled in by defaults or overridden by CLI arguments.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// List of hosts to check
    pub hosts: Option<Vec<String>>,
    /// Total attempts per API request
    pub retry_attempts: Option<u32>,
    /// Base URL of the assessment API
    pub api_base: Option<String>,
    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
    /// Output format: text, json, summary
    pub output: Option<String>,
    /// Exit code to use when a certificate is reported invalid
    pub exit_code: Option<i32>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully parsed configuration
    /// * `Err(ConfigError::Io)` - File could not be read
    /// * `Err(ConfigError::Parse)` - File contains invalid TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Creates a configuration holding the built-in defaults.
    ///
    /// # Default Values
    ///
    /// - `hosts`: ["elliottmgmt.com"]
    /// - `retry_attempts`: 5
    /// - `api_base`: "https://api.ssllabs.com/api/v2"
    /// - `timeout`: 30
    /// - `output`: "text"
    /// - `exit_code`: 0 (don't fail on invalid certificates)
    pub fn default() -> Self {
        Config {
            hosts: Some(vec![DEFAULT_HOST.to_string()]),
            retry_attempts: Some(DEFAULT_RETRY_ATTEMPTS),
            api_base: Some(DEFAULT_API_BASE.to_string()),
            timeout: Some(DEFAULT_TIMEOUT),
            output: Some(OutputFormat::Text.to_string()),
            exit_code: Some(0),
        }
    }

    /// Merges this configuration with another, prioritizing the other's values.
    ///
    /// For each field, if the `other` config has a value (Some), it overrides
    /// this config's value. If the `other` value is None, keeps the current value.
    pub fn merge_with(mut self, other: Config) -> Self {
        if other.hosts.is_some() {
            self.hosts = other.hosts;
        }
        if other.retry_attempts.is_some() {
            self.retry_attempts = other.retry_attempts;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.exit_code.is_some() {
            self.exit_code = other.exit_code;
        }
        self
    }

    /// Creates a Config from command-line arguments for merging.
    ///
    /// Only provided arguments (Some values) will override other configurations.
    pub fn from_cli_args(
        hosts: Option<Vec<String>>,
        retry_attempts: Option<u32>,
        api_base: Option<String>,
        timeout: Option<u64>,
        output: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Config {
            hosts,
            retry_attempts,
            api_base,
            timeout,
            output,
            exit_code,
        }
    }

    /// Generates an example configuration file in TOML format.
    pub fn example_toml() -> String {
        let example = Config {
            hosts: Some(vec![
                DEFAULT_HOST.to_string(),
                "example.com".to_string(),
            ]),
            retry_attempts: Some(DEFAULT_RETRY_ATTEMPTS),
            api_base: Some(DEFAULT_API_BASE.to_string()),
            timeout: Some(DEFAULT_TIMEOUT),
            output: Some(OutputFormat::Summary.to_string()),
            exit_code: Some(2),
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Error generating example".to_string())
    }
}

/// Fully resolved settings handed to the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub hosts: Vec<String>,
    pub retry_attempts: u32,
    pub api_base: String,
    pub timeout: Duration,
    pub output: OutputFormat,
    pub exit_code: i32,
}

impl TryFrom<Config> for Settings {
    type Error = ConfigError;

    /// Fills gaps from [`Config::default`] and validates the result.
    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let config = Config::default().merge_with(config);

        let hosts: Vec<String> = config
            .hosts
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        if hosts.is_empty() {
            return Err(ConfigError::Validation(
                "at least one host is required".to_string(),
            ));
        }

        let retry_attempts = config.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS);
        if retry_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry_attempts must be at least 1".to_string(),
            ));
        }

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let parsed = Url::parse(&api_base)
            .map_err(|e| ConfigError::Validation(format!("api_base '{}': {}", api_base, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::Validation(format!(
                "api_base '{}' is not a base URL",
                api_base
            )));
        }

        let output = match config.output {
            Some(name) => OutputFormat::from_str(&name).map_err(|_| {
                ConfigError::Validation(format!(
                    "unknown output format '{}' (expected text, json or summary)",
                    name
                ))
            })?,
            None => OutputFormat::Text,
        };

        Ok(Settings {
            hosts,
            retry_attempts,
            api_base,
            timeout: Duration::from_secs(config.timeout.unwrap_or(DEFAULT_TIMEOUT)),
            output,
            exit_code: config.exit_code.unwrap_or(0),
        })
    }
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Validation error (missing required fields, invalid values, etc.)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

//! Structured logging initialization
//!
//! Sets up a `tracing` subscriber with an `EnvFilter` and either JSON or
//! pretty-printed output. Library code only emits events; binaries call
//! [`init_logging`] once at startup.
//!
//! ## Environment Variables
//!
//! - `EDMB_LOG_LEVEL` - trace/debug/info/warn/error (default: `warn`)
//! - `EDMB_LOG_FORMAT` - json/pretty (default: `pretty`)
//! - `EDMB_LOG_TARGET_FILTER` - extra comma-separated filter directives
//! - `EDMB_LOG_INCLUDE_LOCATION` - include file:line (default: `false`)
//!
//! `RUST_LOG`, when set, takes precedence over `EDMB_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machine consumption, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Module filter (comma-separated directives)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("EDMB_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("EDMB_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: env::var("EDMB_LOG_TARGET_FILTER").ok(),
            include_location: env::var("EDMB_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Verbose configuration used by `--verbose` on the CLI
    pub fn verbose() -> Self {
        Self {
            log_level: "debug".to_string(),
            include_location: true,
            ..Self::default()
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }

        env_filter
    }
}

/// Initialize logging from `EDMB_LOG_*` environment variables.
///
/// # Example
///
/// ```no_run
/// edmbuilder::logging::init_logging().expect("Failed to initialize logging");
/// ```
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())
}

/// Initialize logging with an explicit configuration.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    // logs go to stderr so command output on stdout stays machine readable
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Pretty); // Default
    }

    #[test]
    fn test_level_parse_defaults_to_warn() {
        let mut config = LogConfig::default();
        assert_eq!(config.level(), Level::WARN);
        config.log_level = "DEBUG".to_string();
        assert_eq!(config.level(), Level::DEBUG);
        config.log_level = "chatty".to_string();
        assert_eq!(config.level(), Level::WARN);
    }

    #[test]
    fn test_verbose_config() {
        let config = LogConfig::verbose();
        assert_eq!(config.log_level, "debug");
        assert!(config.include_location);
        assert_eq!(config.format, LogFormat::Pretty);
    }
}

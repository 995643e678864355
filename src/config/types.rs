//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_CANCEL_GRACE_SECS, DEFAULT_MAX_CONCURRENCY, DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Rejected configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero ceiling would never schedule anything.
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    /// A zero timeout fails every attempt before it starts.
    #[error("timeout_seconds must be at least 1")]
    ZeroTimeout,

    /// An empty User-Agent is rejected by the HTTP client builder.
    #[error("user_agent must not be empty")]
    EmptyUserAgent,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use domain_reach::Config;
///
/// let config = Config {
///     max_concurrency: 50,
///     timeout_seconds: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Maximum concurrent domain orchestrations
    pub max_concurrency: usize,

    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,

    /// Extra tries granted to a transient failure
    pub retries: usize,

    /// Stop collecting candidates after this many valid domains
    pub max_domains: Option<usize>,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Seconds in-flight work may continue after cancellation
    pub cancel_grace_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            max_domains: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cancel_grace_seconds: DEFAULT_CANCEL_GRACE_SECS,
        }
    }
}

impl Config {
    /// Checks the values a run cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(())
    }

    /// Per-attempt timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Cancellation grace period as a `Duration`.
    pub fn cancel_grace(&self) -> Duration {
        Duration::from_secs(self.cancel_grace_seconds)
    }
}

/// Command-line options for the `domain_reach` binary.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// domain_reach domains.txt
///
/// # Probe the first 1000 valid domains with a tighter timeout
/// domain_reach domains.txt --max-domains 1000 --timeout-seconds 10
///
/// # Read candidates from stdin
/// cat domains.txt | domain_reach -
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "domain_reach",
    about = "Probes a list of domains over HTTP, falling back to HTTPS, and summarizes reachability."
)]
pub struct Opt {
    /// File with one domain per line (`-` reads stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Maximum concurrent domain orchestrations
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-attempt timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Extra tries for transient failures (timeouts, resets, 5xx/429)
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    pub retries: usize,

    /// Only probe the first N valid domains
    #[arg(long)]
    pub max_domains: Option<usize>,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds in-flight probes may finish after Ctrl-C before being aborted
    #[arg(long, default_value_t = DEFAULT_CANCEL_GRACE_SECS)]
    pub cancel_grace_seconds: u64,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            log_level: opt.log_level,
            log_format: opt.log_format,
            max_concurrency: opt.max_concurrency,
            timeout_seconds: opt.timeout_seconds,
            retries: opt.retries,
            max_domains: opt.max_domains,
            user_agent: opt.user_agent,
            cancel_grace_seconds: opt.cancel_grace_seconds,
        }
    }
}

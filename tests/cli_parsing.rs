//! Tests for CLI option parsing into the library configuration.

use clap::Parser;
use domain_reach::config::{DEFAULT_USER_AGENT, LogFormat, LogLevel};
use domain_reach::{Config, Opt};
use std::path::PathBuf;

#[test]
fn test_stdin_marker_is_accepted() {
    let opt = Opt::try_parse_from(["domain_reach", "-"]).expect("'-' should parse");
    assert_eq!(opt.file, PathBuf::from("-"));
}

#[test]
fn test_defaults_round_trip_into_valid_config() {
    let opt = Opt::try_parse_from(["domain_reach", "domains.txt"]).expect("should parse");
    let config = Config::from(opt);

    assert_eq!(config.max_concurrency, 100);
    assert_eq!(config.timeout_seconds, 30);
    assert_eq!(config.retries, 1);
    assert_eq!(config.max_domains, None);
    assert_eq!(config.cancel_grace_seconds, 3);
    assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    assert!(matches!(config.log_level, LogLevel::Info));
    assert!(matches!(config.log_format, LogFormat::Plain));
    assert!(config.validate().is_ok());
}

#[test]
fn test_all_flags() {
    let opt = Opt::try_parse_from([
        "domain_reach",
        "domains.txt",
        "--max-concurrency",
        "8",
        "--timeout-seconds",
        "5",
        "--retries",
        "0",
        "--max-domains",
        "250",
        "--user-agent",
        "probe/1.0",
        "--cancel-grace-seconds",
        "1",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("should parse");
    let config = Config::from(opt);

    assert_eq!(config.max_concurrency, 8);
    assert_eq!(config.timeout_seconds, 5);
    assert_eq!(config.retries, 0);
    assert_eq!(config.max_domains, Some(250));
    assert_eq!(config.user_agent, "probe/1.0");
    assert_eq!(config.cancel_grace_seconds, 1);
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
}

#[test]
fn test_zero_concurrency_parses_but_fails_validation() {
    let opt = Opt::try_parse_from(["domain_reach", "d.txt", "--max-concurrency", "0"])
        .expect("should parse");
    assert!(Config::from(opt).validate().is_err());
}

#[test]
fn test_missing_file_argument_is_rejected() {
    assert!(Opt::try_parse_from(["domain_reach"]).is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    assert!(Opt::try_parse_from(["domain_reach", "d.txt", "--log-level", "loud"]).is_err());
}

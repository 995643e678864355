//! HTTP client initialization.
//!
//! This module builds the pooled client every probe of a run goes through.

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, POOL_IDLE_TIMEOUT, POOL_MAX_IDLE_PER_HOST, TCP_KEEPALIVE};

/// Initializes the HTTP client used for probing.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Connect timeout (name resolution plus TCP/TLS setup) from the config
/// - Read timeout (waiting for the response) from the config, restarted for
///   every request, with no total deadline across redirect hops
/// - Redirects disabled; the prober follows them hop by hop
/// - Keep-alive pooling with a bounded idle set per host
///
/// # Arguments
///
/// * `config` - Run configuration containing user-agent and timeout settings
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .connect_timeout(config.timeout())
        .read_timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .tcp_keepalive(TCP_KEEPALIVE)
        .build()
}

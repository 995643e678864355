//! reqwest-backed probe client.

use std::time::Instant;

use async_trait::async_trait;
use log::debug;
use reqwest::header::LOCATION;
use reqwest::Url;
use tokio_retry::RetryIf;

use super::redirects::redirect_target;
use super::{ProbeAttempt, Prober};
use crate::config::{Config, MAX_REDIRECT_HOPS};
use crate::domain::Endpoint;
use crate::error_handling::{
    categorize_reqwest_error, error_chain_message, get_retry_strategy, is_retryable_status,
    InitializationError, ProbeError, ProbeErrorKind,
};
use crate::initialization::init_client;

/// Probes endpoints with a pooled, keep-alive HTTP client.
///
/// One `HttpProber` is created per run; every orchestration of the run shares
/// its connection pool, and the pool is released when the prober is dropped.
///
/// Each probe issues a GET, follows up to `MAX_REDIRECT_HOPS` redirects hop by
/// hop, and treats any final response as reachable. Every hop is a separate
/// request with its own connect and read timeouts. Timeouts, refused or reset
/// connections, and the statuses in `RETRYABLE_STATUS_CODES` are retried
/// according to `get_retry_strategy`.
pub struct HttpProber {
    client: reqwest::Client,
    retries: usize,
}

impl HttpProber {
    /// Builds the prober and its connection pool from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be
    /// built (e.g. an invalid User-Agent header value).
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        Ok(Self {
            client,
            retries: config.retries,
        })
    }

    async fn send_once(&self, url: Url) -> Result<u16, ProbeError> {
        let mut visited = vec![url.clone()];
        let mut current = url;
        loop {
            let response = self.client.get(current.clone()).send().await.map_err(|e| {
                ProbeError::network(categorize_reqwest_error(&e), error_chain_message(&e))
            })?;

            let status = response.status().as_u16();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok());
            let Some(next) = redirect_target(&current, status, location)? else {
                if is_retryable_status(status) {
                    return Err(ProbeError::RetryableStatus(status));
                }
                return Ok(status);
            };

            if visited.contains(&next) {
                return Err(ProbeError::network(
                    ProbeErrorKind::TooManyRedirects,
                    format!("redirect loop back to {next}"),
                ));
            }
            if visited.len() > MAX_REDIRECT_HOPS {
                return Err(ProbeError::network(
                    ProbeErrorKind::TooManyRedirects,
                    format!("more than {MAX_REDIRECT_HOPS} hops from {}", visited[0]),
                ));
            }
            debug!("{} redirected ({}) to {}", current, status, next);
            visited.push(next.clone());
            current = next;
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeAttempt {
        let start = Instant::now();

        let url = match endpoint.to_url() {
            Ok(url) => url,
            Err(e) => {
                let error = ProbeError::network(ProbeErrorKind::InvalidEndpoint, e.to_string());
                return ProbeAttempt::unreachable(
                    endpoint.clone(),
                    error.to_string(),
                    start.elapsed(),
                    0,
                );
            }
        };

        let mut tries = 0usize;
        let result = RetryIf::start(
            get_retry_strategy(self.retries),
            || {
                tries += 1;
                self.send_once(url.clone())
            },
            |e: &ProbeError| {
                let retry = e.is_transient();
                if retry {
                    debug!("Retrying {} after transient failure: {}", endpoint, e);
                }
                retry
            },
        )
        .await;

        let retries = tries.saturating_sub(1);
        let elapsed = start.elapsed();
        match result {
            Ok(status) | Err(ProbeError::RetryableStatus(status)) => {
                debug!("{} responded {} in {:?}", endpoint, status, elapsed);
                ProbeAttempt::reachable(endpoint.clone(), status, elapsed, retries)
            }
            Err(e) => {
                debug!("{} unreachable after {} retries: {}", endpoint, retries, e);
                ProbeAttempt::unreachable(endpoint.clone(), e.to_string(), elapsed, retries)
            }
        }
    }
}

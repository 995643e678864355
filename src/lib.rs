//! domain_reach library: bulk HTTP/HTTPS reachability probing
//!
//! This library probes large lists of domains for basic reachability. Each
//! domain is tried over HTTP first and over HTTPS only when HTTP failed; every
//! resolved domain is streamed out as an event and folded into a run summary
//! with success rates, response-time statistics, status-code and error-pattern
//! histograms.
//!
//! # Example
//!
//! ```no_run
//! use domain_reach::{run_probe, Config, RunControl};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     max_concurrency: 50,
//!     timeout_seconds: 10,
//!     ..Default::default()
//! };
//!
//! let control = RunControl::new();
//! let on_event = Some(Arc::new(|event: domain_reach::DomainEvent| {
//!     println!("{} -> {:?}", event.domain, event.final_status);
//! }) as Arc<dyn Fn(domain_reach::DomainEvent) + Send + Sync>);
//!
//! let report = run_probe(&config, ["example.com", "rust-lang.org"], &control, on_event).await?;
//! println!("Probed {} domains: {} reachable, {} unreachable",
//!          report.summary.total_domains, report.summary.successful, report.summary.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod aggregate;
mod app;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod fallback;
pub mod initialization;
pub mod input;
pub mod probe;
mod run;

// Re-export public API
pub use aggregate::{RunAggregate, RunSummary, SharedAggregate};
pub use app::ProgressCounter;
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use domain::{build_endpoint, normalize_domain, prepare_candidates, Endpoint, Protocol};
pub use fallback::{resolve_domain, DomainOutcome, Resolution};
pub use probe::{HttpProber, ProbeAttempt, Prober};
pub use run::{
    run_probe, run_probe_with, DomainEvent, EventCallback, FinalStatus, ProbeReport,
    ProtocolStatus, RunControl,
};

//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_reach` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C wiring to run cancellation
//! - Output: one JSON line per resolved domain, then the pretty-printed report
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use domain_reach::initialization::init_logger_with;
use domain_reach::input::read_candidate_lines;
use domain_reach::{run_probe, Config, DomainEvent, EventCallback, Opt, RunControl};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let input = opt.file.clone();
    let config = Config::from(opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let raw = read_candidate_lines(&input).await?;

    let control = Arc::new(RunControl::new());
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    warn!("Unable to listen for Ctrl-C; cancellation disabled");
                    return;
                }
                if !control.cancel() {
                    warn!("Cancellation already in progress");
                }
            }
        });
    }

    let on_event: EventCallback = Some(Arc::new(|event: DomainEvent| {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Failed to serialize event for {}: {}", event.domain, e),
        }
    }));

    match run_probe(&config, raw, &control, on_event).await {
        Ok(report) => {
            let rendered =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{rendered}");
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_reach error: {:#}", e);
            process::exit(1);
        }
    }
}

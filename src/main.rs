use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use followup_relay::config::Config;
use followup_relay::events::{init_logging, EventEmitter};
use followup_relay::harness::Harness;
use followup_relay::sim::SimHost;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::parse();
    init_logging(&cfg.log_level).context("failed to initialize logging")?;

    let emitter = EventEmitter::new(!cfg.quiet);
    let host = Arc::new(SimHost::new(cfg.origin.clone()).with_emitter(emitter));
    let mut harness = Harness::new(host);

    tracing::info!(target = "relay::main", origin = %cfg.origin, "relay harness started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("stdin read failed")? {
        harness.handle_line(&line).await;
    }

    // Keep the process alive until every anchored side effect has settled.
    harness.drain().await;

    Ok(())
}

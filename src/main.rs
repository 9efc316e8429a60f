//! Main entry point for the pumpwatch graduation scanner.
//!
//! One invocation performs one full scan pass: fetch recent transactions
//! for the watched program, report newly graduated tokens, persist the
//! seen-ledger. Intended to run on a schedule; exits non-zero only when
//! the run's confirmations could not be made durable.

use anyhow::Result;
use pumpwatch::scanner::{DexScreenerOracle, HeliusSource, Scanner, ScannerConfig, WebhookSink};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ScannerConfig::from_env()?;
    info!(
        "Starting scan: {} watched program(s), fetch limit {}, oracle budget {}",
        config.watched_program_ids.len(),
        config.fetch_limit,
        config.oracle_query_budget
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let source = Arc::new(HeliusSource::new(
        client.clone(),
        &config.source_base_url,
        &config.source_api_key,
    ));
    let oracle = Arc::new(DexScreenerOracle::new(client.clone(), &config));
    let sink = Arc::new(WebhookSink::new(client, &config.report_endpoint));

    let mut scanner = Scanner::new(config, source, oracle, sink);
    let summary = scanner.run().await?;

    info!(
        "Scan done: {} new token(s) reported, ledger holds {} entries",
        summary.tokens_reported,
        scanner.ledger_len()
    );
    Ok(())
}

//! Pipeline orchestrator.
//!
//! One run: fetch a batch of enriched transactions for each watched
//! program, extract and classify evidence per record, report first-time
//! confirmed mints, persist the seen-ledger. The orchestrator owns the
//! ledger for the run's duration; per-record failures are isolated and only
//! a ledger persistence failure is fatal.

use crate::scanner::classifier::BondingClassifier;
use crate::scanner::data_sources::{PoolOracle, ReportingSink, TransactionSource};
use crate::scanner::extractor::extract_evidence;
use crate::scanner::ledger::SeenLedger;
use crate::scanner::types::{RunSummary, ScannerConfig};
use crate::types::NewTokenEvent;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct Scanner {
    config: ScannerConfig,
    source: Arc<dyn TransactionSource>,
    sink: Arc<dyn ReportingSink>,
    classifier: BondingClassifier,
    ledger: SeenLedger,
}

impl Scanner {
    /// Build a scanner for one run, loading the seen-ledger from the
    /// configured path (a missing or corrupt ledger starts empty).
    pub fn new(
        config: ScannerConfig,
        source: Arc<dyn TransactionSource>,
        oracle: Arc<dyn PoolOracle>,
        sink: Arc<dyn ReportingSink>,
    ) -> Self {
        let ledger = SeenLedger::load(&config.ledger_path);
        let classifier = BondingClassifier::new(
            config.confirming_set(),
            oracle,
            config.oracle_query_budget,
        );

        Self { config, source, sink, classifier, ledger }
    }

    /// Process one full batch and persist the ledger.
    ///
    /// The only error this returns is a ledger persistence failure; source,
    /// record and sink problems degrade locally and show up as counters in
    /// the summary.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let watched = self.config.watched_program_ids.clone();

        for program_id in &watched {
            let records = self.fetch_batch(program_id).await;
            info!("{} -> {} full txs", program_id, records.len());

            for record in &records {
                self.process_record(record, &mut summary).await;
            }
        }

        summary.oracle_queries_used = self.classifier.queries_used();

        self.ledger
            .save()
            .context("Failed to persist seen-ledger; run confirmations are not durable")?;

        info!(
            "Run complete: {} txs, {} reported, {} record errors, {} sink errors, {} oracle queries",
            summary.transactions_processed,
            summary.tokens_reported,
            summary.record_errors,
            summary.sink_errors,
            summary.oracle_queries_used
        );
        Ok(summary)
    }

    /// Two-phase fetch for one watched program. Source failures degrade to
    /// an empty batch.
    async fn fetch_batch(&self, program_id: &str) -> Vec<Value> {
        let signatures = match self
            .source
            .list_signatures(program_id, self.config.fetch_limit)
            .await
        {
            Ok(signatures) => signatures,
            Err(e) => {
                warn!("Signature listing failed for {}: {:#}", program_id, e);
                return Vec::new();
            }
        };

        if signatures.is_empty() {
            return Vec::new();
        }

        match self.source.fetch_full(&signatures).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Full transaction fetch failed for {}: {:#}", program_id, e);
                Vec::new()
            }
        }
    }

    async fn process_record(&mut self, record: &Value, summary: &mut RunSummary) {
        summary.transactions_processed += 1;

        if !record.is_object() {
            warn!("Skipping malformed transaction record (not an object)");
            summary.record_errors += 1;
            return;
        }

        let evidence = extract_evidence(record);
        let signature = evidence.signature.as_deref().unwrap_or("(no sig)");

        if evidence.mints.is_empty() {
            debug!("tx {}: no candidate mints", signature);
            return;
        }

        let classification = self.classifier.classify(&evidence).await;
        if !classification.confirmed {
            debug!("tx {}: no migration evidence", signature);
            return;
        }
        debug!("tx {}: confirmed via {:?}", signature, classification.rule);

        for mint in &evidence.mints {
            if self.ledger.is_seen(mint) {
                debug!("already seen {}", mint);
                continue;
            }

            // Mark before reporting: a sink failure must never cause a
            // second attempt for the same mint within this run.
            let now = chrono::Utc::now().timestamp_millis();
            self.ledger.mark_seen(mint, now);

            let event = NewTokenEvent::from_mint(mint);
            match self.sink.report(&event).await {
                Ok(()) => {
                    info!("Reported new token {}", mint);
                    summary.tokens_reported += 1;
                }
                Err(e) => {
                    warn!("Report failed for {} (will not retry this run): {:#}", mint, e);
                    summary.sink_errors += 1;
                }
            }
        }
    }

    /// Entries currently in the seen-ledger.
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }
}

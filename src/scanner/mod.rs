//! Scanner module - detection-and-dedup pipeline for graduated tokens.
//!
//! The pipeline composes five pieces: mint validation, evidence extraction
//! from enriched transaction records, bonding classification (venue match
//! or pool oracle fallback), the persisted seen-ledger, and the
//! orchestrator that drives one run over a fetched batch.

pub mod classifier;
pub mod data_sources;
pub mod extractor;
pub mod ledger;
pub mod pipeline;
pub mod types;
pub mod validator;

// Re-export main public types
pub use classifier::BondingClassifier;
pub use data_sources::{
    DexScreenerOracle, HeliusSource, PoolOracle, ReportingSink, TransactionSource, WebhookSink,
};
pub use extractor::extract_evidence;
pub use ledger::SeenLedger;
pub use pipeline::Scanner;
pub use types::{BondingEvidence, EvidenceRule, RunSummary, ScannerConfig, TxEvidence};
pub use validator::is_valid_mint;

/// Scanner builder for convenient construction with sensible defaults.
pub struct ScannerBuilder {
    config: ScannerConfig,
}

impl ScannerBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self { config: ScannerConfig::default() }
    }

    /// Set the watched program addresses.
    pub fn with_watched_programs(mut self, programs: Vec<String>) -> Self {
        self.config.watched_program_ids = programs;
        self
    }

    /// Set the confirming venue program addresses.
    pub fn with_confirming_programs(mut self, programs: Vec<String>) -> Self {
        self.config.confirming_program_ids = programs;
        self
    }

    /// Set the pool oracle endpoint templates.
    pub fn with_oracle_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.config.oracle_endpoints = endpoints;
        self
    }

    /// Set the per-program signature fetch limit.
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.config.fetch_limit = limit;
        self
    }

    /// Set the per-run oracle query budget.
    pub fn with_oracle_budget(mut self, budget: u32) -> Self {
        self.config.oracle_query_budget = budget;
        self
    }

    /// Set the seen-ledger file path.
    pub fn with_ledger_path<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.config.ledger_path = path.into();
        self
    }

    /// Set the transaction provider credentials.
    pub fn with_source(mut self, base_url: String, api_key: String) -> Self {
        self.config.source_base_url = base_url;
        self.config.source_api_key = api_key;
        self
    }

    /// Set the reporting endpoint.
    pub fn with_report_endpoint(mut self, endpoint: String) -> Self {
        self.config.report_endpoint = endpoint;
        self
    }

    /// Build the scanner configuration.
    pub fn build_config(self) -> ScannerConfig {
        self.config
    }
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

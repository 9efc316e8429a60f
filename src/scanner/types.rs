//! Core types and configuration for the scanner.

use crate::types::Pubkey;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Confirmed pump.fun bonding curve program.
pub const PUMP_BONDING_PROGRAM: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";

/// Raydium Liquidity Pool V4 - the venue graduated tokens migrate to.
pub const RAYDIUM_AMM_V4: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

/// PumpSwap AMM - the native migration venue.
pub const PUMPSWAP_AMM: &str = "pAMMBay6oceH9fJKBRHGP5D4sWpmSwMn52FMfXEA";

/// Scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Program addresses whose transaction history is polled
    pub watched_program_ids: Vec<Pubkey>,
    /// Program addresses whose presence in a transaction confirms migration
    pub confirming_program_ids: Vec<Pubkey>,
    /// Pool oracle endpoint templates (`{mint}` placeholder)
    pub oracle_endpoints: Vec<String>,
    /// Signatures fetched per watched program per run
    pub fetch_limit: usize,
    /// Hard cap on pool oracle queries per run
    pub oracle_query_budget: u32,
    /// Pool oracle request rate (per second)
    pub oracle_requests_per_second: u32,
    /// Pool oracle response cache TTL in seconds
    pub oracle_cache_ttl_seconds: u64,
    /// Maximum pool oracle cache entries
    pub oracle_max_cache_entries: u64,
    /// Path of the persisted seen-ledger file
    pub ledger_path: PathBuf,
    /// Base URL of the enriched-transaction provider
    pub source_base_url: String,
    /// API key for the enriched-transaction provider
    pub source_api_key: String,
    /// Endpoint the reporting sink POSTs confirmed tokens to
    pub report_endpoint: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            watched_program_ids: vec![PUMP_BONDING_PROGRAM.to_string()],
            confirming_program_ids: vec![
                RAYDIUM_AMM_V4.to_string(),
                PUMPSWAP_AMM.to_string(),
            ],
            oracle_endpoints: vec![
                "https://api.dexscreener.com/latest/dex/tokens/{mint}".to_string(),
            ],
            fetch_limit: 25,
            oracle_query_budget: 30,
            oracle_requests_per_second: 5,
            oracle_cache_ttl_seconds: 300,
            oracle_max_cache_entries: 10_000,
            ledger_path: PathBuf::from("last-pump.json"),
            source_base_url: "https://api.helius.xyz".to_string(),
            source_api_key: String::new(),
            report_endpoint: String::new(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from the environment.
    ///
    /// `HELIUS_KEY` and `APPS_SCRIPT_API` are required; `FETCH_LIMIT`,
    /// `ORACLE_BUDGET` and `LEDGER_PATH` override the defaults when set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.source_api_key = std::env::var("HELIUS_KEY")
            .map_err(|_| anyhow!("HELIUS_KEY env var is required"))?;
        config.report_endpoint = std::env::var("APPS_SCRIPT_API")
            .map_err(|_| anyhow!("APPS_SCRIPT_API env var is required"))?;

        if let Ok(limit) = std::env::var("FETCH_LIMIT") {
            config.fetch_limit = limit.parse()?;
        }
        if let Ok(budget) = std::env::var("ORACLE_BUDGET") {
            config.oracle_query_budget = budget.parse()?;
        }
        if let Ok(path) = std::env::var("LEDGER_PATH") {
            config.ledger_path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Confirming program ids as a set, for membership tests.
    pub fn confirming_set(&self) -> HashSet<Pubkey> {
        self.confirming_program_ids.iter().cloned().collect()
    }
}

/// Evidence extracted from a single transaction record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxEvidence {
    /// Transaction signature, when the record carries one
    pub signature: Option<String>,
    /// Valid candidate mints, deduplicated, in extraction precedence order
    pub mints: Vec<Pubkey>,
    /// Every program address referenced by the transaction
    pub programs: HashSet<Pubkey>,
}

/// Which rule produced a positive classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceRule {
    /// The transaction itself touches a confirming venue program
    ProgramMatch,
    /// A pool oracle confirmed liquidity exists for a candidate mint
    PoolLookup,
}

/// Classification outcome for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondingEvidence {
    /// Whether migration evidence was found
    pub confirmed: bool,
    /// The rule that fired, when confirmed
    pub rule: Option<EvidenceRule>,
}

impl BondingEvidence {
    pub fn negative() -> Self {
        Self { confirmed: false, rule: None }
    }

    pub fn positive(rule: EvidenceRule) -> Self {
        Self { confirmed: true, rule: Some(rule) }
    }
}

/// Counters produced by one scanner run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Transaction records processed
    pub transactions_processed: usize,
    /// New-token events handed to the sink
    pub tokens_reported: usize,
    /// Records that failed extraction/classification (isolated, not fatal)
    pub record_errors: usize,
    /// Sink deliveries that failed (identifier stays marked seen)
    pub sink_errors: usize,
    /// Pool oracle queries consumed from the per-run budget
    pub oracle_queries_used: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ScannerConfig::default();

        assert_eq!(config.watched_program_ids, vec![PUMP_BONDING_PROGRAM]);
        assert_eq!(config.fetch_limit, 25);
        assert_eq!(config.oracle_query_budget, 30);
        assert!(config.confirming_set().contains(RAYDIUM_AMM_V4));
    }

    #[test]
    fn test_evidence_constructors() {
        assert!(!BondingEvidence::negative().confirmed);

        let positive = BondingEvidence::positive(EvidenceRule::ProgramMatch);
        assert!(positive.confirmed);
        assert_eq!(positive.rule, Some(EvidenceRule::ProgramMatch));
    }
}

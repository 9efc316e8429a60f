//! External collaborators: transaction source, pool oracle, reporting sink.
//!
//! Each collaborator is a trait so the pipeline can be driven by mocks in
//! tests; the production implementations here are thin reqwest clients.

use crate::scanner::types::ScannerConfig;
use crate::types::NewTokenEvent;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use moka::future::Cache;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Source of raw transaction records for a watched program.
///
/// Two-phase: a lightweight signature listing, then full enriched records
/// by signature.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// List recent transaction signatures for a program address.
    async fn list_signatures(&self, program_id: &str, limit: usize) -> Result<Vec<String>>;

    /// Fetch full enriched records for the given signatures. An empty
    /// signature list must make zero downstream calls.
    async fn fetch_full(&self, signatures: &[String]) -> Result<Vec<Value>>;
}

/// Fallback lookup: does a liquidity pool exist for this mint?
///
/// Implementations must tolerate unreachable endpoints and degrade to
/// `false`; a lookup is never fatal.
#[async_trait]
pub trait PoolOracle: Send + Sync {
    async fn has_pool(&self, mint: &str) -> bool;
}

/// Downstream consumer of confirmed new-token events.
#[async_trait]
pub trait ReportingSink: Send + Sync {
    async fn report(&self, event: &NewTokenEvent) -> Result<()>;
}

/// Enriched-transaction provider client (Helius v0 API).
pub struct HeliusSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HeliusSource {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TransactionSource for HeliusSource {
    #[instrument(skip(self), fields(program = %program_id))]
    async fn list_signatures(&self, program_id: &str, limit: usize) -> Result<Vec<String>> {
        let url = format!(
            "{}/v0/addresses/{}/transactions?api-key={}&limit={}",
            self.base_url, program_id, self.api_key, limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Address transactions request failed")?;

        if !response.status().is_success() {
            warn!("Address transactions error {} for {}", response.status(), program_id);
            return Ok(Vec::new());
        }

        let light: Vec<Value> = response
            .json()
            .await
            .context("Failed to parse address transactions response")?;

        let signatures: Vec<String> = light
            .iter()
            .filter_map(|tx| tx.get("signature").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        debug!("{} -> {} light txs", program_id, signatures.len());
        Ok(signatures)
    }

    #[instrument(skip(self, signatures), fields(count = signatures.len()))]
    async fn fetch_full(&self, signatures: &[String]) -> Result<Vec<Value>> {
        if signatures.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v0/transactions?api-key={}", self.base_url, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "transactions": signatures }))
            .send()
            .await
            .context("Full transactions request failed")?;

        if !response.status().is_success() {
            warn!("Full transactions error {}", response.status());
            return Ok(Vec::new());
        }

        let full: Vec<Value> = response
            .json()
            .await
            .context("Failed to parse full transactions response")?;

        debug!("Fetched {} full txs", full.len());
        Ok(full)
    }
}

/// DEX screener pool oracle.
///
/// Queries each configured endpoint template in order until one reports a
/// pool. Responses are cached per mint and requests are rate-smoothed so a
/// burst of lookups does not hammer the public API.
pub struct DexScreenerOracle {
    client: Client,
    endpoints: Vec<String>,
    cache: Cache<String, bool>,
    limiter: DefaultDirectRateLimiter,
}

impl DexScreenerOracle {
    pub fn new(client: Client, config: &ScannerConfig) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(config.oracle_requests_per_second)
                .unwrap_or_else(|| NonZeroU32::new(1).expect("1 is non-zero")),
        );

        let cache = Cache::builder()
            .max_capacity(config.oracle_max_cache_entries)
            .time_to_live(Duration::from_secs(config.oracle_cache_ttl_seconds))
            .build();

        Self {
            client,
            endpoints: config.oracle_endpoints.clone(),
            cache,
            limiter: RateLimiter::direct(quota),
        }
    }

    async fn query_endpoint(&self, endpoint: &str, mint: &str) -> Result<bool> {
        let url = endpoint.replace("{mint}", mint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Pool lookup request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Pool lookup returned {}", response.status()));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse pool lookup response")?;

        let has_pairs = body
            .get("pairs")
            .and_then(Value::as_array)
            .map_or(false, |pairs| !pairs.is_empty());

        Ok(has_pairs)
    }
}

#[async_trait]
impl PoolOracle for DexScreenerOracle {
    #[instrument(skip(self), fields(mint = %mint))]
    async fn has_pool(&self, mint: &str) -> bool {
        if let Some(cached) = self.cache.get(mint).await {
            debug!("Pool lookup cache hit: {}", cached);
            return cached;
        }

        self.limiter.until_ready().await;

        let mut found = false;
        for endpoint in &self.endpoints {
            match self.query_endpoint(endpoint, mint).await {
                Ok(true) => {
                    found = true;
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    // Unreachable endpoint degrades to "no pool"
                    warn!("Pool lookup failed for {}: {:#}", mint, e);
                }
            }
        }

        self.cache.insert(mint.to_string(), found).await;
        found
    }
}

/// Reporting sink posting confirmed tokens to a webhook endpoint.
pub struct WebhookSink {
    client: Client,
    endpoint: String,
}

impl WebhookSink {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self { client, endpoint: endpoint.to_string() }
    }
}

#[async_trait]
impl ReportingSink for WebhookSink {
    #[instrument(skip(self, event), fields(mint = %event.mint))]
    async fn report(&self, event: &NewTokenEvent) -> Result<()> {
        let body = json!({
            "addCoin": {
                "mint": event.mint,
                "name": event.name,
                "symbol": event.symbol,
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("Report request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Report endpoint returned {}", response.status()));
        }

        debug!("Reported {}", event.mint);
        Ok(())
    }
}

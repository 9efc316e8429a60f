//! Bonding/migration classification.

use crate::scanner::data_sources::PoolOracle;
use crate::scanner::types::{BondingEvidence, EvidenceRule, TxEvidence};
use crate::types::Pubkey;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Decides whether a transaction constitutes proof of bonding completion.
///
/// The primary rule is local and synchronous: the transaction touches a
/// confirming venue program. Only when that rule is negative does the
/// classifier fall back to pool oracle lookups, bounded by a per-run query
/// budget.
pub struct BondingClassifier {
    confirming_programs: HashSet<Pubkey>,
    oracle: Arc<dyn PoolOracle>,
    budget_remaining: u32,
    queries_used: u32,
}

impl BondingClassifier {
    pub fn new(
        confirming_programs: HashSet<Pubkey>,
        oracle: Arc<dyn PoolOracle>,
        query_budget: u32,
    ) -> Self {
        Self {
            confirming_programs,
            oracle,
            budget_remaining: query_budget,
            queries_used: 0,
        }
    }

    /// Apply the synchronous program-membership rule.
    ///
    /// Returns `Some(negative)` for a transaction with no candidate mints
    /// (nothing to report, regardless of program touches), `Some(positive)`
    /// on a venue match, and `None` when the oracle fallback is needed.
    pub fn classify_local(&self, evidence: &TxEvidence) -> Option<BondingEvidence> {
        if evidence.mints.is_empty() {
            return Some(BondingEvidence::negative());
        }
        if evidence
            .programs
            .iter()
            .any(|p| self.confirming_programs.contains(p))
        {
            return Some(BondingEvidence::positive(EvidenceRule::ProgramMatch));
        }
        None
    }

    /// Classify a transaction, falling back to the pool oracle when the
    /// program-membership rule is negative.
    ///
    /// Fallback queries run per candidate mint in extraction order and stop
    /// at the first positive hit. Each query consumes one unit of the
    /// per-run budget; once exhausted, remaining candidates are left
    /// unconfirmed.
    pub async fn classify(&mut self, evidence: &TxEvidence) -> BondingEvidence {
        if let Some(local) = self.classify_local(evidence) {
            return local;
        }

        for mint in &evidence.mints {
            if self.budget_remaining == 0 {
                debug!("Oracle query budget exhausted, skipping remaining lookups");
                break;
            }
            self.budget_remaining -= 1;
            self.queries_used += 1;

            if self.oracle.has_pool(mint).await {
                return BondingEvidence::positive(EvidenceRule::PoolLookup);
            }
        }

        BondingEvidence::negative()
    }

    /// Oracle queries consumed so far this run.
    pub fn queries_used(&self) -> u32 {
        self.queries_used
    }
}

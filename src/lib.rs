//! pumpwatch - bonding-curve graduation scanner for pump.fun tokens
//!
//! This crate polls a watched on-chain program's recent transactions,
//! detects tokens whose bonding curve has completed and migrated liquidity
//! to a DEX, deduplicates against a persisted seen-ledger, and reports each
//! newly confirmed token exactly once to a downstream sink.

pub mod scanner;
pub mod types;

// Re-export main types for convenience
pub use types::{NewTokenEvent, Pubkey};

//! Core types shared across the scanner.

use serde::{Deserialize, Serialize};

/// A simple public key representation (string form, as delivered by the
/// enriched-transaction API).
pub type Pubkey = String;

/// A newly confirmed token, ready to hand to the reporting sink.
///
/// The name and symbol are synthesized for display only; the mint is the
/// authoritative field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTokenEvent {
    /// The mint address of the token
    pub mint: Pubkey,
    /// Derived display name (non-authoritative)
    pub name: String,
    /// Derived display symbol (may be empty)
    pub symbol: String,
}

impl NewTokenEvent {
    /// Build an event for a confirmed mint, synthesizing the display name
    /// from its first characters.
    pub fn from_mint(mint: &str) -> Self {
        let prefix: String = mint.chars().take(4).collect();
        Self {
            mint: mint.to_string(),
            name: format!("Pump {}", prefix),
            symbol: String::new(),
        }
    }
}

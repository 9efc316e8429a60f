//! Evidence extraction from enriched transaction records.
//!
//! Records arrive as opaque JSON from the transaction provider and every
//! field of interest is optional. Each extraction branch is isolated: a
//! missing or wrongly-typed field contributes nothing and never suppresses
//! data available from another branch.

use crate::scanner::types::TxEvidence;
use crate::scanner::validator::is_valid_mint;
use serde_json::Value;

/// Extract candidate mints and the set of touched programs from one record.
///
/// Mints are unioned over every known source in precedence order:
/// `tokenTransfers`, `meta.postTokenBalances`, `meta.preTokenBalances`,
/// `events.token`, `events.nft`. Duplicates collapse to the first
/// occurrence; invalid candidates are silently dropped.
pub fn extract_evidence(tx: &Value) -> TxEvidence {
    let mut evidence = TxEvidence {
        signature: tx
            .get("signature")
            .and_then(Value::as_str)
            .map(str::to_string),
        ..Default::default()
    };

    collect_mints(tx, &mut evidence);
    collect_programs(tx, &mut evidence);
    evidence
}

fn collect_mints(tx: &Value, evidence: &mut TxEvidence) {
    let mut push = |candidate: Option<&str>| {
        if let Some(mint) = candidate {
            if is_valid_mint(mint) && !evidence.mints.iter().any(|m| m == mint) {
                evidence.mints.push(mint.to_string());
            }
        }
    };

    // 1) tokenTransfers
    if let Some(transfers) = tx.get("tokenTransfers").and_then(Value::as_array) {
        for transfer in transfers {
            push(transfer.get("mint").and_then(Value::as_str));
        }
    }

    // 2) meta.postTokenBalances / preTokenBalances
    for balance_field in ["postTokenBalances", "preTokenBalances"] {
        let balances = tx
            .get("meta")
            .and_then(|m| m.get(balance_field))
            .and_then(Value::as_array);
        if let Some(balances) = balances {
            for balance in balances {
                push(balance.get("mint").and_then(Value::as_str));
            }
        }
    }

    // 3) events.token / events.nft
    if let Some(events) = tx.get("events") {
        for event_field in ["token", "nft"] {
            push(
                events
                    .get(event_field)
                    .and_then(|e| e.get("mint"))
                    .and_then(Value::as_str),
            );
        }
    }
}

fn collect_programs(tx: &Value, evidence: &mut TxEvidence) {
    let message = tx.get("transaction").and_then(|t| t.get("message"));

    // Top-level instructions
    if let Some(instructions) = message
        .and_then(|m| m.get("instructions"))
        .and_then(Value::as_array)
    {
        for instruction in instructions {
            if let Some(program) = instruction.get("programId").and_then(Value::as_str) {
                evidence.programs.insert(program.to_string());
            }
        }
    }

    // Inner instruction groups
    if let Some(groups) = tx
        .get("meta")
        .and_then(|m| m.get("innerInstructions"))
        .and_then(Value::as_array)
    {
        for group in groups {
            if let Some(instructions) = group.get("instructions").and_then(Value::as_array) {
                for instruction in instructions {
                    if let Some(program) = instruction.get("programId").and_then(Value::as_str) {
                        evidence.programs.insert(program.to_string());
                    }
                }
            }
        }
    }

    // Account keys: plain strings or { "pubkey": ... } objects
    if let Some(keys) = message
        .and_then(|m| m.get("accountKeys"))
        .and_then(Value::as_array)
    {
        for key in keys {
            let resolved = key
                .as_str()
                .or_else(|| key.get("pubkey").and_then(Value::as_str));
            if let Some(key) = resolved {
                evidence.programs.insert(key.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MINT_A: &str = "4Nd1mKvZta7Bnx2PeXc5M8DqzWJuGy3RfEHsA9Tv";
    const MINT_B: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    const PROG_X: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

    #[test]
    fn test_same_mint_from_three_sources_dedups() {
        let tx = json!({
            "tokenTransfers": [{ "mint": MINT_A }],
            "meta": { "postTokenBalances": [{ "mint": MINT_A }] },
            "events": { "token": { "mint": MINT_A } }
        });

        let evidence = extract_evidence(&tx);
        assert_eq!(evidence.mints, vec![MINT_A]);
    }

    #[test]
    fn test_empty_record_yields_empty_sets() {
        let evidence = extract_evidence(&json!({}));
        assert!(evidence.mints.is_empty());
        assert!(evidence.programs.is_empty());
        assert!(evidence.signature.is_none());

        let evidence = extract_evidence(&Value::Null);
        assert!(evidence.mints.is_empty());
        assert!(evidence.programs.is_empty());
    }

    #[test]
    fn test_malformed_branch_does_not_suppress_others() {
        // tokenTransfers is the wrong type entirely; balances still contribute
        let tx = json!({
            "tokenTransfers": "garbage",
            "meta": {
                "postTokenBalances": [{ "mint": MINT_A }, { "amount": 3 }],
                "preTokenBalances": [{ "mint": MINT_B }]
            }
        });

        let evidence = extract_evidence(&tx);
        assert_eq!(evidence.mints, vec![MINT_A, MINT_B]);
    }

    #[test]
    fn test_invalid_candidates_silently_dropped() {
        let tx = json!({
            "tokenTransfers": [
                { "mint": "tooshort" },
                { "mint": "4Nd1mKvZta7Bnx2PeXc5M8DqzWJuGy3RfEHspump" },
                { "mint": MINT_A }
            ]
        });

        let evidence = extract_evidence(&tx);
        assert_eq!(evidence.mints, vec![MINT_A]);
    }

    #[test]
    fn test_precedence_order_is_stable() {
        let tx = json!({
            "tokenTransfers": [{ "mint": MINT_B }],
            "meta": { "postTokenBalances": [{ "mint": MINT_A }] }
        });

        let evidence = extract_evidence(&tx);
        assert_eq!(evidence.mints, vec![MINT_B, MINT_A]);
    }

    #[test]
    fn test_programs_from_all_levels() {
        let tx = json!({
            "transaction": {
                "message": {
                    "instructions": [{ "programId": "TopLevelProgram" }],
                    "accountKeys": [
                        "PlainStringKey",
                        { "pubkey": "StructuredKey" },
                        { "writable": true }
                    ]
                }
            },
            "meta": {
                "innerInstructions": [
                    { "instructions": [{ "programId": PROG_X }] },
                    { "instructions": "garbage" }
                ]
            }
        });

        let evidence = extract_evidence(&tx);
        assert!(evidence.programs.contains("TopLevelProgram"));
        assert!(evidence.programs.contains(PROG_X));
        assert!(evidence.programs.contains("PlainStringKey"));
        assert!(evidence.programs.contains("StructuredKey"));
        assert_eq!(evidence.programs.len(), 4);
    }

    #[test]
    fn test_signature_extraction() {
        let tx = json!({ "signature": "5sig" });
        assert_eq!(extract_evidence(&tx).signature.as_deref(), Some("5sig"));
    }
}

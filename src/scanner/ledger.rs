//! Persisted seen-ledger.
//!
//! The ledger is the durable record of every mint already reported. Once an
//! identifier is in, it is never removed or reported again; the file grows
//! monotonically over the life of the deployment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk shape of the ledger file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    /// mint -> first-seen Utc timestamp (millis)
    seen: HashMap<String, i64>,
}

/// In-memory seen-ledger with a JSON file backing it.
///
/// Loaded once at run start, mutated in memory, persisted once at run end.
/// The orchestrator owns it for the run's duration; no locking is needed.
#[derive(Debug)]
pub struct SeenLedger {
    path: PathBuf,
    seen: HashMap<String, i64>,
}

impl SeenLedger {
    /// Load the ledger from `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty ledger;
    /// loading never fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let seen = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<LedgerFile>(&contents) {
                Ok(file) => file.seen,
                Err(e) => {
                    warn!("Ledger file {} is malformed ({}), starting empty", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) => {
                info!("No ledger at {} ({}), starting empty", path.display(), e);
                HashMap::new()
            }
        };

        Self { path, seen }
    }

    /// Whether a mint has already been reported.
    pub fn is_seen(&self, mint: &str) -> bool {
        self.seen.contains_key(mint)
    }

    /// Record a mint as reported. The first-seen timestamp is kept if the
    /// mint was already present.
    pub fn mark_seen(&mut self, mint: &str, timestamp: i64) {
        self.seen.entry(mint.to_string()).or_insert(timestamp);
    }

    /// First-seen timestamp for a mint, when present.
    pub fn first_seen(&self, mint: &str) -> Option<i64> {
        self.seen.get(mint).copied()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Persist the ledger, crash-atomically.
    ///
    /// The serialized file is written to `<path>.tmp`, synced, then renamed
    /// over the real path. A crash mid-save leaves the previous complete
    /// file intact.
    pub fn save(&self) -> Result<()> {
        let file = LedgerFile { seen: self.seen.clone() };
        let contents = serde_json::to_string_pretty(&file)
            .context("Failed to serialize ledger")?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp = std::fs::File::create(&tmp_path).with_context(|| {
                format!("Failed to create temp ledger file {}", tmp_path.display())
            })?;
            tmp.write_all(contents.as_bytes())
                .context("Failed to write temp ledger file")?;
            tmp.sync_all().context("Failed to sync temp ledger file")?;
        }
        std::fs::rename(&tmp_path, &self.path).with_context(|| {
            format!("Failed to move ledger into place at {}", self.path.display())
        })?;

        info!("Persisted seen-ledger with {} entries to {}", self.seen.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ledger_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pumpwatch-ledger-{}-{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let ledger = SeenLedger::load(temp_ledger_path("missing-nonexistent"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let path = temp_ledger_path("corrupt");
        std::fs::write(&path, "{ not json").unwrap();

        let ledger = SeenLedger::load(&path);
        assert!(ledger.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_mark_seen_first_write_wins() {
        let mut ledger = SeenLedger::load(temp_ledger_path("firstwrite-nonexistent"));
        ledger.mark_seen("MintA", 100);
        ledger.mark_seen("MintA", 200);

        assert_eq!(ledger.first_seen("MintA"), Some(100));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_save_load_round_trip_empty() {
        let path = temp_ledger_path("roundtrip-empty");
        let ledger = SeenLedger::load(&path);
        ledger.save().unwrap();

        let reloaded = SeenLedger::load(&path);
        assert!(reloaded.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_load_round_trip_hundred_entries() {
        let path = temp_ledger_path("roundtrip-100");
        let mut ledger = SeenLedger::load(&path);
        for i in 0..100 {
            ledger.mark_seen(&format!("Mint{:03}", i), 1_700_000_000_000 + i);
        }
        ledger.save().unwrap();

        let reloaded = SeenLedger::load(&path);
        assert_eq!(reloaded.len(), 100);
        for i in 0..100 {
            assert_eq!(
                reloaded.first_seen(&format!("Mint{:03}", i)),
                Some(1_700_000_000_000 + i)
            );
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_saved_file_is_parseable_json() {
        let path = temp_ledger_path("parseable");
        let mut ledger = SeenLedger::load(&path);
        ledger.mark_seen("MintA", 42);
        ledger.save().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["seen"]["MintA"], 42);

        std::fs::remove_file(&path).ok();
    }
}

use crate::fixture::DEFAULT_CENTURY_PIVOT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SNAPSHOT_PATH: &str = "match_fees.json";
pub const DEFAULT_WIPE_CONFIRMATION: &str = "DELETE ALL DATA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Where the snapshot lives.
    pub snapshot_path: PathBuf,
    /// Two-digit years below this are 20xx, the rest 19xx.
    pub century_pivot: u32,
    /// Exact text the operator must type before a full wipe.
    pub wipe_confirmation: String,
    /// Display only; the ledger itself is single-currency and unit-less.
    pub currency_symbol: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            century_pivot: DEFAULT_CENTURY_PIVOT,
            wipe_confirmation: DEFAULT_WIPE_CONFIRMATION.to_string(),
            currency_symbol: "£".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load from a JSON config file. Missing keys fall back to defaults.
    /// In tests, use LedgerConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: LedgerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.century_pivot > 99 {
            anyhow::bail!("century_pivot must be between 0 and 99, got {}", config.century_pivot);
        }
        if config.wipe_confirmation.trim().is_empty() {
            anyhow::bail!("wipe_confirmation cannot be empty");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            snapshot_path: PathBuf::from("test_match_fees.json"),
            wipe_confirmation: "WIPE".to_string(),
            ..Self::default()
        }
    }
}

//! Tally configuration stored in `tally.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::record::RecordFormat;
use crate::core::registry::DEFAULT_CAPACITY;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Default data file name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "voting_results.txt";

/// Tally configuration (TOML).
///
/// Every field is optional; a missing file or field falls back to the
/// defaults that match the historical `voting_results.txt` layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TallyConfig {
    /// Where the registry is loaded from and saved to.
    pub data_file: PathBuf,

    /// Upper bound on the number of candidates.
    pub max_candidates: usize,

    /// Record layout of the data file.
    pub format: RecordFormat,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            max_candidates: DEFAULT_CAPACITY,
            format: RecordFormat::Csv,
        }
    }
}

impl TallyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(anyhow!("max_candidates must be > 0"));
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("data_file must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TallyConfig::default()`.
pub fn load_config(path: &Path) -> Result<TallyConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        let cfg = TallyConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TallyConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), ?cfg, "config loaded");
    Ok(cfg)
}

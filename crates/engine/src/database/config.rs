//! Ledger configuration via `pactledger.toml`
//!
//! On first open in a directory, a default `pactledger.toml` is created. To
//! change settings, edit the file and reopen.

use pactledger_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the ledger directory.
pub const CONFIG_FILE_NAME: &str = "pactledger.toml";

/// Ledger configuration loaded from `pactledger.toml`.
///
/// # Example
///
/// ```toml
/// # Keys present only in the newer contract do not count as a change
/// allow_unexpected_keys = false
///
/// # Examine at most this many WIP candidates per call (0 = unbounded)
/// wip_candidate_limit = 0
///
/// # Rebuild latest pointers when opening over an existing store
/// repair_on_open = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Diff mode used by `distinct_previous`.
    #[serde(default)]
    pub allow_unexpected_keys: bool,
    /// Upper bound on WIP candidates examined per call; 0 means unbounded.
    #[serde(default)]
    pub wip_candidate_limit: usize,
    /// Run the latest-pointer repair pass when a database handle opens.
    #[serde(default = "default_repair_on_open")]
    pub repair_on_open: bool,
}

fn default_repair_on_open() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            allow_unexpected_keys: false,
            wip_candidate_limit: 0,
            repair_on_open: default_repair_on_open(),
        }
    }
}

impl LedgerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Pact ledger configuration
#
# Diff mode for distinct_previous: when true, keys that appear only in the
# newer contract are not counted as a change (default: false)
allow_unexpected_keys = false

# Maximum number of WIP candidates examined per resolution call.
# 0 means unbounded (default: 0)
wip_candidate_limit = 0

# Recompute every latest pointer from publications when opening a database
# over an existing store (default: true)
repair_on_open = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on malformed TOML, unknown keys or values of
    /// the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The candidate limit as an `Option`, `None` when unbounded
    pub fn candidate_limit(&self) -> Option<usize> {
        (self.wip_candidate_limit > 0).then_some(self.wip_candidate_limit)
    }
}

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::logging::LoggingConfig;

// ---------------------------------------------------------------------------
// PlannerOptions — [planner]
// ---------------------------------------------------------------------------

/// Rule toggles for the physical planner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerOptions {
    /// Convert time-bounded joins into interval joins. When disabled every
    /// join falls through to the regular join rule.
    pub interval_join: bool,
    /// Insert explicit exchange nodes when a join input must be
    /// redistributed. When disabled the input is relabelled in place.
    pub emit_exchanges: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            interval_join: true,
            emit_exchanges: true,
        }
    }
}

// ---------------------------------------------------------------------------
// PlannerConfig — planner.toml
// ---------------------------------------------------------------------------

/// Top-level planner configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub planner: PlannerOptions,
    pub logging: LoggingConfig,
}

impl PlannerConfig {
    /// Read and parse a `planner.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for PlannerConfig {
    type Err = anyhow::Error;

    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let config: PlannerConfig = toml::from_str(toml_str)?;
        if config.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level must not be empty");
        }
        Ok(config)
    }
}

#[macro_use]
mod log_macros;

pub mod cmd_check;
pub mod cmd_explain;
pub mod tracing_init;

use std::path::{Path, PathBuf};

use anyhow::Result;
use ij_config::{PlannerConfig, QueryFile};
use ij_rel::LogicalNode;

/// Load `planner.toml` (defaults when absent) and the directory that relative
/// paths inside it resolve against.
pub fn load_config(path: Option<&Path>) -> Result<(PlannerConfig, PathBuf)> {
    match path {
        Some(path) => {
            let path = path
                .canonicalize()
                .map_err(|e| anyhow::anyhow!("config path '{}': {e}", path.display()))?;
            let config = PlannerConfig::load(&path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| anyhow::anyhow!("config path has no parent directory"))?;
            Ok((config, base_dir))
        }
        None => Ok((PlannerConfig::default(), std::env::current_dir()?)),
    }
}

/// Read a query description and build its logical plan.
pub fn load_query(path: &Path) -> Result<LogicalNode> {
    let query = QueryFile::load(path)?;
    query.to_logical()
}

use std::path::Path;

use anyhow::Result;

use ij_config::PlannerConfig;
use ij_planner::Planner;

use crate::load_query;

pub fn run(file: &Path, config: &PlannerConfig) -> Result<()> {
    print!("{}", render(file, config)?);
    Ok(())
}

/// Physical plan of the query in `file`, as printed by `ij-plan explain`.
pub fn render(file: &Path, config: &PlannerConfig) -> Result<String> {
    let logical = load_query(file)?;

    let plan = Planner::from_config(config)
        .optimize(&logical)
        .map_err(|e| anyhow::anyhow!("planning {}: {e}", file.display()))?;
    ij_info!(cli, file = %file.display(), "query planned");

    Ok(plan.explain())
}

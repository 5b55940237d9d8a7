use std::fmt;
use std::path::Path;

use anyhow::Result;

use ij_config::PlannerConfig;
use ij_planner::explain::{format_expr, joined_field_names};
use ij_planner::{IntervalJoinRule, PhysicalNode, Planner, extract_window_bounds};
use ij_rel::{LogicalJoin, LogicalNode};

use crate::load_query;

/// Outcome of `ij-plan check`: one `key: value` line per finding.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub lines: Vec<(String, String)>,
    pub ok: bool,
}

impl CheckReport {
    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.lines.push((key.to_string(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.lines {
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

/// Print the report; `Ok(false)` when planning failed.
pub fn run(file: &Path, config: &PlannerConfig) -> Result<bool> {
    let report = check(file, config)?;
    print!("{report}");
    Ok(report.ok)
}

pub fn check(file: &Path, config: &PlannerConfig) -> Result<CheckReport> {
    let logical = load_query(file)?;
    let LogicalNode::Join(join) = &logical else {
        anyhow::bail!("{} does not describe a join", file.display());
    };

    let planner = Planner::from_config(config);
    let names = joined_field_names(join.left.row_type(), join.right.row_type());
    let mut report = CheckReport::default();
    report.push("join", join.kind.explain_name());
    report.push("condition", format_expr(&join.condition, &names));

    let rule = match planner.rules().select(join) {
        Ok(Some(rule)) => rule,
        Ok(None) => {
            report.push("error", "no join rule accepts this join");
            return Ok(report);
        }
        Err(e) => {
            report.push("error", e.to_string());
            return Ok(report);
        }
    };
    report.push("rule", rule.name());

    if rule.name() == IntervalJoinRule::NAME {
        describe_window(&mut report, join, &names);
    }

    match planner.convert(&logical) {
        Ok(plan) => {
            if let PhysicalNode::IntervalJoin(ij) = &plan {
                report.push("early fire", ij.early_fire.to_string());
            }
            report.push("status", "ok");
            report.ok = true;
        }
        Err(e) => {
            ij_warn!(cli, file = %file.display(), error = %e, "planning failed");
            report.push("error", e.to_string());
        }
    }
    Ok(report)
}

fn describe_window(report: &mut CheckReport, join: &LogicalJoin, names: &[String]) {
    let (bounds, residual) = extract_window_bounds(join);
    if let Some(bounds) = bounds {
        let left_count = join.left_field_count();
        report.push(
            "time semantics",
            if bounds.is_event_time { "rowtime" } else { "proctime" },
        );
        report.push(
            "time attributes",
            format!(
                "{} - {}",
                field_name(names, bounds.left_time_idx),
                field_name(names, left_count + bounds.right_time_idx)
            ),
        );
        report.push(
            "window",
            format!("[{}, {}] ms", bounds.left_lower_bound, bounds.left_upper_bound),
        );
    }
    report.push(
        "residual",
        residual.map_or_else(|| "true".to_string(), |r| format_expr(&r, names)),
    );
}

fn field_name(names: &[String], idx: usize) -> String {
    names.get(idx).cloned().unwrap_or_else(|| format!("${idx}"))
}

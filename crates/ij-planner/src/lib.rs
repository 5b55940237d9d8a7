#[macro_use]
mod log_macros;

pub mod early_fire;
pub mod error;
pub mod explain;
pub mod physical;
pub mod planner;
pub mod rules;
pub mod window_bounds;

#[cfg(test)]
mod testing;

pub use early_fire::EarlyFireParameters;
pub use error::{PlannerError, PlannerReason, PlannerResult, RuleError, RuleResult};
pub use physical::{
    Distribution, PhysicalExchange, PhysicalIntervalJoin, PhysicalJoin, PhysicalNode,
    PhysicalScan, TraitSet, require_distribution,
};
pub use planner::Planner;
pub use rules::{IntervalJoinRule, JoinRuleSet, PhysicalJoinRule, RegularJoinRule};
pub use window_bounds::{WindowBounds, extract_window_bounds, satisfy_interval_join};

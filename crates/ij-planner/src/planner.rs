use ij_config::{PlannerConfig, PlannerOptions};
use ij_rel::{LogicalJoin, LogicalNode};

use crate::error::{PlannerResult, RuleError, RuleResult};
use crate::physical::{PhysicalNode, PhysicalScan, TraitSet};
use crate::rules::JoinRuleSet;

/// Converts logical plans into physical plans, bottom-up.
pub struct Planner {
    rules: JoinRuleSet,
}

impl Planner {
    pub fn new(options: &PlannerOptions) -> Self {
        ij_debug!(
            plan,
            interval_join = options.interval_join,
            emit_exchanges = options.emit_exchanges,
            "planner configured"
        );
        Self {
            rules: JoinRuleSet::standard(options.interval_join, options.emit_exchanges),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(&config.planner)
    }

    pub fn rules(&self) -> &JoinRuleSet {
        &self.rules
    }

    /// Plan `node`, reporting failures as structured planner errors.
    pub fn optimize(&self, node: &LogicalNode) -> PlannerResult<PhysicalNode> {
        let plan = self.convert(node).map_err(RuleError::into_planner_error)?;
        ij_info!(plan, root = node_name(&plan), "physical plan ready");
        Ok(plan)
    }

    /// Plan `node`, keeping the rule-level error.
    pub fn convert(&self, node: &LogicalNode) -> RuleResult<PhysicalNode> {
        match node {
            LogicalNode::Scan(scan) => Ok(PhysicalNode::TableSourceScan(PhysicalScan {
                table: scan.table.clone(),
                row_type: scan.row_type.clone(),
                traits: TraitSet::default(),
            })),
            LogicalNode::Join(join) => self.convert_join(join),
        }
    }

    fn convert_join(&self, join: &LogicalJoin) -> RuleResult<PhysicalNode> {
        let left = self.convert(&join.left)?;
        let right = self.convert(&join.right)?;
        self.rules.convert(join, left, right)
    }
}

fn node_name(node: &PhysicalNode) -> &'static str {
    match node {
        PhysicalNode::TableSourceScan(_) => "TableSourceScan",
        PhysicalNode::Exchange(_) => "Exchange",
        PhysicalNode::IntervalJoin(_) => "IntervalJoin",
        PhysicalNode::Join(_) => "Join",
    }
}

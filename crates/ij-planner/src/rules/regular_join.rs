use ij_rel::LogicalJoin;

use crate::error::RuleResult;
use crate::physical::{PhysicalJoin, PhysicalNode, TraitSet};
use crate::rules::PhysicalJoinRule;
use crate::window_bounds::satisfy_interval_join;

/// Converts a join into an unbounded [`PhysicalJoin`] partitioned on its
/// equi-join keys.
#[derive(Debug, Clone, Copy)]
pub struct RegularJoinRule {
    accept_interval_joins: bool,
}

impl RegularJoinRule {
    pub const NAME: &'static str = "RegularJoinRule";

    /// Sibling of the interval rule: leaves time-bounded joins to it.
    pub fn excluding_interval_joins() -> Self {
        Self {
            accept_interval_joins: false,
        }
    }

    /// Sole join rule: converts every join.
    pub fn accepting_all() -> Self {
        Self {
            accept_interval_joins: true,
        }
    }
}

impl PhysicalJoinRule for RegularJoinRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn matches(&self, join: &LogicalJoin) -> RuleResult<bool> {
        Ok(self.accept_interval_joins || !satisfy_interval_join(join))
    }

    fn compute_left_keys(&self, join: &LogicalJoin) -> RuleResult<Vec<usize>> {
        Ok(join.analyze_condition().left_keys)
    }

    fn compute_right_keys(&self, join: &LogicalJoin) -> RuleResult<Vec<usize>> {
        Ok(join.analyze_condition().right_keys)
    }

    fn transform(
        &self,
        join: &LogicalJoin,
        left: PhysicalNode,
        right: PhysicalNode,
        traits: TraitSet,
    ) -> RuleResult<PhysicalNode> {
        let info = join.analyze_condition();
        ij_debug!(
            rule,
            kind = %join.kind,
            keys = info.left_keys.len(),
            "regular join planned"
        );
        Ok(PhysicalNode::Join(Box::new(PhysicalJoin {
            kind: join.kind,
            left,
            right,
            condition: join.condition.clone(),
            left_keys: info.left_keys,
            right_keys: info.right_keys,
            row_type: join.row_type().clone(),
            traits,
        })))
    }
}

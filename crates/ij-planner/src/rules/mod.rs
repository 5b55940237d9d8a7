mod interval_join;
mod regular_join;


pub use interval_join::IntervalJoinRule;
pub use regular_join::RegularJoinRule;

use ij_rel::LogicalJoin;

use crate::error::{RuleError, RuleResult};
use crate::physical::{Distribution, PhysicalNode, TraitSet, require_distribution};

// ---------------------------------------------------------------------------
// PhysicalJoinRule
// ---------------------------------------------------------------------------

/// A strategy converting a logical join into a physical one.
///
/// `matches` returning `Ok(false)` means the join does not have this rule's
/// shape; an `Err` aborts planning of the query.
pub trait PhysicalJoinRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, join: &LogicalJoin) -> RuleResult<bool>;

    /// Left-input fields the input must be hash-partitioned on.
    fn compute_left_keys(&self, join: &LogicalJoin) -> RuleResult<Vec<usize>>;

    /// Right-input fields (relative to the right input) the input must be
    /// hash-partitioned on.
    fn compute_right_keys(&self, join: &LogicalJoin) -> RuleResult<Vec<usize>>;

    /// Build the physical node from already-distributed children.
    fn transform(
        &self,
        join: &LogicalJoin,
        left: PhysicalNode,
        right: PhysicalNode,
        traits: TraitSet,
    ) -> RuleResult<PhysicalNode>;
}

// ---------------------------------------------------------------------------
// JoinRuleSet
// ---------------------------------------------------------------------------

/// Ordered join rules; the first rule that matches converts the join.
pub struct JoinRuleSet {
    rules: Vec<Box<dyn PhysicalJoinRule>>,
    emit_exchanges: bool,
}

impl JoinRuleSet {
    pub fn new(rules: Vec<Box<dyn PhysicalJoinRule>>, emit_exchanges: bool) -> Self {
        Self {
            rules,
            emit_exchanges,
        }
    }

    /// Interval rule first when enabled, regular join as the fallback.
    pub fn standard(interval_join: bool, emit_exchanges: bool) -> Self {
        let mut rules: Vec<Box<dyn PhysicalJoinRule>> = Vec::new();
        if interval_join {
            rules.push(Box::new(IntervalJoinRule));
            rules.push(Box::new(RegularJoinRule::excluding_interval_joins()));
        } else {
            rules.push(Box::new(RegularJoinRule::accepting_all()));
        }
        Self::new(rules, emit_exchanges)
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// The first rule that matches `join`, if any.
    pub fn select(&self, join: &LogicalJoin) -> RuleResult<Option<&dyn PhysicalJoinRule>> {
        for rule in &self.rules {
            if rule.matches(join)? {
                ij_debug!(rule, rule = rule.name(), kind = %join.kind, "rule matched");
                return Ok(Some(rule.as_ref()));
            }
            ij_trace!(rule, rule = rule.name(), "rule skipped");
        }
        Ok(None)
    }

    /// Convert `join` with the first matching rule.
    pub fn convert(
        &self,
        join: &LogicalJoin,
        left: PhysicalNode,
        right: PhysicalNode,
    ) -> RuleResult<PhysicalNode> {
        match self.select(join)? {
            Some(rule) => self.on_match(rule, join, left, right),
            None => Err(RuleError::Planning(format!(
                "no physical join rule accepts the {} join on {}",
                join.kind, join.condition
            ))),
        }
    }

    /// Distribute the children on the rule's keys and run its transform.
    pub fn on_match(
        &self,
        rule: &dyn PhysicalJoinRule,
        join: &LogicalJoin,
        left: PhysicalNode,
        right: PhysicalNode,
    ) -> RuleResult<PhysicalNode> {
        let left_keys = rule.compute_left_keys(join)?;
        let right_keys = rule.compute_right_keys(join)?;
        if left_keys.len() != right_keys.len() {
            return Err(RuleError::Planning(format!(
                "rule {} derived {} left keys but {} right keys; join keys must pair up",
                rule.name(),
                left_keys.len(),
                right_keys.len()
            )));
        }
        ij_debug!(
            rule,
            rule = rule.name(),
            left_keys = ?left_keys,
            right_keys = ?right_keys,
            "join keys derived"
        );

        let left = require_distribution(
            left,
            &TraitSet::new(Distribution::for_keys(&left_keys)),
            self.emit_exchanges,
        );
        let right = require_distribution(
            right,
            &TraitSet::new(Distribution::for_keys(&right_keys)),
            self.emit_exchanges,
        );
        rule.transform(join, left, right, TraitSet::default())
    }
}

use ij_rel::{Expr, LogicalJoin};

use crate::early_fire::EarlyFireParameters;
use crate::error::{RuleError, RuleResult};
use crate::physical::{PhysicalIntervalJoin, PhysicalNode, TraitSet};
use crate::rules::PhysicalJoinRule;
use crate::window_bounds::{WindowBounds, extract_window_bounds, satisfy_interval_join};

/// Converts a time-bounded stream join into a [`PhysicalIntervalJoin`].
///
/// Event-time joins require both time attributes to share a type; a
/// processing-time join must not carry any rowtime attribute in its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalJoinRule;

impl IntervalJoinRule {
    pub const NAME: &'static str = "IntervalJoinRule";

    /// Bounds and residual of a join that passed the shape check.
    fn window_bounds(join: &LogicalJoin) -> RuleResult<(WindowBounds, Option<Expr>)> {
        match extract_window_bounds(join) {
            (Some(bounds), residual) => Ok((bounds, residual)),
            (None, _) => Err(RuleError::Internal(format!(
                "window bounds must exist for an interval join on {}",
                join.condition
            ))),
        }
    }
}

impl PhysicalJoinRule for IntervalJoinRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn matches(&self, join: &LogicalJoin) -> RuleResult<bool> {
        if !satisfy_interval_join(join) {
            return Ok(false);
        }
        let (bounds, _) = Self::window_bounds(join)?;

        if bounds.is_event_time {
            let left_type = time_attribute_type(join, true, bounds.left_time_idx)?;
            let right_type = time_attribute_type(join, false, bounds.right_time_idx)?;
            if left_type.type_name() != right_type.type_name() {
                return Err(RuleError::Validation(format!(
                    "Interval join with rowtime attribute requires same rowtime types, \
                     but the types are {left_type} and {right_type}."
                )));
            }
        } else if join
            .row_type()
            .fields
            .iter()
            .any(|f| f.field_type.is_rowtime_indicator())
        {
            return Err(RuleError::Planning(
                "Interval join with proctime attribute requires no event-time attributes \
                 are in the join inputs."
                    .to_string(),
            ));
        }
        Ok(true)
    }

    fn compute_left_keys(&self, join: &LogicalJoin) -> RuleResult<Vec<usize>> {
        let (bounds, _) = Self::window_bounds(join)?;
        Ok(join
            .analyze_condition()
            .left_keys
            .into_iter()
            .filter(|k| *k != bounds.left_time_idx)
            .collect())
    }

    fn compute_right_keys(&self, join: &LogicalJoin) -> RuleResult<Vec<usize>> {
        let (bounds, _) = Self::window_bounds(join)?;
        Ok(join
            .analyze_condition()
            .right_keys
            .into_iter()
            .filter(|k| *k != bounds.right_time_idx)
            .collect())
    }

    fn transform(
        &self,
        join: &LogicalJoin,
        left: PhysicalNode,
        right: PhysicalNode,
        traits: TraitSet,
    ) -> RuleResult<PhysicalNode> {
        let (window_bounds, residual) = Self::window_bounds(join)?;
        let early_fire = EarlyFireParameters::from_hints(&join.hints)?;
        ij_debug!(
            rule,
            bounds = %window_bounds,
            early_fire = %early_fire,
            "interval join planned"
        );

        Ok(PhysicalNode::IntervalJoin(Box::new(PhysicalIntervalJoin {
            kind: join.kind,
            left,
            right,
            condition: join.condition.clone(),
            remaining: residual.unwrap_or_else(Expr::lit_true),
            window_bounds,
            early_fire,
            row_type: join.row_type().clone(),
            traits,
        })))
    }
}

/// Type of a time attribute taken from its own input's row type.
fn time_attribute_type(
    join: &LogicalJoin,
    left_side: bool,
    idx: usize,
) -> RuleResult<ij_rel::FieldType> {
    let input = if left_side { &join.left } else { &join.right };
    input
        .row_type()
        .field(idx)
        .map(|f| f.field_type)
        .ok_or_else(|| {
            RuleError::Internal(format!(
                "time attribute index {idx} is out of range for the {} input",
                if left_side { "left" } else { "right" }
            ))
        })
}

use std::fmt;

use ij_rel::{Expr, JoinKind, RowType};

use crate::early_fire::EarlyFireParameters;
use crate::window_bounds::WindowBounds;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// How rows of a physical node are spread across parallel instances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Distribution {
    /// No requirement / unknown.
    #[default]
    Any,
    /// All rows on a single instance.
    Singleton,
    /// Rows hash-partitioned on these field indices.
    Hash(Vec<usize>),
}

impl Distribution {
    /// Hash on `keys`, or singleton when there are none.
    pub fn for_keys(keys: &[usize]) -> Self {
        if keys.is_empty() {
            Self::Singleton
        } else {
            Self::Hash(keys.to_vec())
        }
    }

    /// `true` if rows already laid out as `self` meet `required`.
    pub fn satisfies(&self, required: &Distribution) -> bool {
        matches!(required, Distribution::Any) || self == required
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Singleton => f.write_str("single"),
            Self::Hash(keys) => {
                let keys: Vec<String> = keys.iter().map(|k| format!("${k}")).collect();
                write!(f, "hash[{}]", keys.join(", "))
            }
        }
    }
}

/// Physical properties carried by a node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitSet {
    pub distribution: Distribution,
}

impl TraitSet {
    pub fn new(distribution: Distribution) -> Self {
        Self { distribution }
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Executable plan tree produced by the planner.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalNode {
    TableSourceScan(PhysicalScan),
    Exchange(PhysicalExchange),
    IntervalJoin(Box<PhysicalIntervalJoin>),
    Join(Box<PhysicalJoin>),
}

impl PhysicalNode {
    pub fn row_type(&self) -> &RowType {
        match self {
            Self::TableSourceScan(s) => &s.row_type,
            Self::Exchange(e) => e.input.row_type(),
            Self::IntervalJoin(j) => &j.row_type,
            Self::Join(j) => &j.row_type,
        }
    }

    pub fn traits(&self) -> &TraitSet {
        match self {
            Self::TableSourceScan(s) => &s.traits,
            Self::Exchange(e) => &e.traits,
            Self::IntervalJoin(j) => &j.traits,
            Self::Join(j) => &j.traits,
        }
    }

    pub fn distribution(&self) -> &Distribution {
        &self.traits().distribution
    }

    /// Same node, labelled with `traits`.
    pub fn with_traits(mut self, traits: TraitSet) -> Self {
        match &mut self {
            Self::TableSourceScan(s) => s.traits = traits,
            Self::Exchange(e) => e.traits = traits,
            Self::IntervalJoin(j) => j.traits = traits,
            Self::Join(j) => j.traits = traits,
        }
        self
    }

    pub fn children(&self) -> Vec<&PhysicalNode> {
        match self {
            Self::TableSourceScan(_) => Vec::new(),
            Self::Exchange(e) => vec![&e.input],
            Self::IntervalJoin(j) => vec![&j.left, &j.right],
            Self::Join(j) => vec![&j.left, &j.right],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalScan {
    pub table: String,
    pub row_type: RowType,
    pub traits: TraitSet,
}

/// Redistributes its input to `traits.distribution`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalExchange {
    pub input: Box<PhysicalNode>,
    pub traits: TraitSet,
}

/// Stream-stream join bounded by a relative time window.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalIntervalJoin {
    pub kind: JoinKind,
    pub left: PhysicalNode,
    pub right: PhysicalNode,
    /// The full original join condition.
    pub condition: Expr,
    /// Condition left after removing the time predicates; literal `true` when
    /// nothing remains.
    pub remaining: Expr,
    pub window_bounds: WindowBounds,
    pub early_fire: EarlyFireParameters,
    pub row_type: RowType,
    pub traits: TraitSet,
}

/// Unbounded stream-stream join keeping both inputs in state.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalJoin {
    pub kind: JoinKind,
    pub left: PhysicalNode,
    pub right: PhysicalNode,
    pub condition: Expr,
    pub left_keys: Vec<usize>,
    pub right_keys: Vec<usize>,
    pub row_type: RowType,
    pub traits: TraitSet,
}

// ---------------------------------------------------------------------------
// Trait conversion
// ---------------------------------------------------------------------------

/// Bring `node` to the `required` traits.
///
/// A node that already satisfies the requirement is returned unchanged.
/// Otherwise it is wrapped in an exchange, or, with `emit_exchanges` off,
/// relabelled in place.
pub fn require_distribution(
    node: PhysicalNode,
    required: &TraitSet,
    emit_exchanges: bool,
) -> PhysicalNode {
    if node.distribution().satisfies(&required.distribution) {
        return node;
    }
    ij_trace!(
        plan,
        from = %node.distribution(),
        to = %required.distribution,
        exchange = emit_exchanges,
        "redistributing join input"
    );
    if emit_exchanges {
        PhysicalNode::Exchange(PhysicalExchange {
            input: Box::new(node),
            traits: required.clone(),
        })
    } else {
        node.with_traits(required.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ij_rel::{Field, FieldType, SqlType};

    fn scan() -> PhysicalNode {
        PhysicalNode::TableSourceScan(PhysicalScan {
            table: "t".into(),
            row_type: RowType::new(vec![Field::new("a", FieldType::not_null(SqlType::Int))]),
            traits: TraitSet::default(),
        })
    }

    #[test]
    fn distribution_for_keys() {
        assert_eq!(Distribution::for_keys(&[]), Distribution::Singleton);
        assert_eq!(Distribution::for_keys(&[0, 2]), Distribution::Hash(vec![0, 2]));
        assert_eq!(Distribution::Hash(vec![0, 2]).to_string(), "hash[$0, $2]");
    }

    #[test]
    fn any_is_always_satisfied() {
        assert!(Distribution::Singleton.satisfies(&Distribution::Any));
        assert!(!Distribution::Any.satisfies(&Distribution::Singleton));
        assert!(!Distribution::Hash(vec![1]).satisfies(&Distribution::Hash(vec![0])));
    }

    #[test]
    fn require_wraps_in_exchange() {
        let required = TraitSet::new(Distribution::Hash(vec![0]));
        let node = require_distribution(scan(), &required, true);
        let PhysicalNode::Exchange(ex) = &node else {
            panic!("expected exchange, got {node:?}");
        };
        assert_eq!(ex.traits, required);
        assert_eq!(*ex.input, scan());
        assert_eq!(node.row_type(), scan().row_type());
    }

    #[test]
    fn require_relabels_without_exchanges() {
        let required = TraitSet::new(Distribution::Singleton);
        let node = require_distribution(scan(), &required, false);
        assert!(matches!(node, PhysicalNode::TableSourceScan(_)));
        assert_eq!(node.traits(), &required);
    }

    #[test]
    fn satisfied_requirement_is_a_no_op() {
        let node = require_distribution(scan(), &TraitSet::default(), true);
        assert_eq!(node, scan());
    }
}

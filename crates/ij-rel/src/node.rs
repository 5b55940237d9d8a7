use std::fmt;

use crate::expr::{Expr, Op};
use crate::hint::RelHint;
use crate::types::RowType;

// ---------------------------------------------------------------------------
// JoinKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
}

impl JoinKind {
    /// Semi and anti joins only emit rows of the left input.
    pub fn projects_right(&self) -> bool {
        !matches!(self, Self::Semi | Self::Anti)
    }

    /// Display name used in plan explain output (`InnerJoin`, `LeftOuterJoin`, ...).
    pub fn explain_name(&self) -> &'static str {
        match self {
            Self::Inner => "InnerJoin",
            Self::Left => "LeftOuterJoin",
            Self::Right => "RightOuterJoin",
            Self::Full => "FullOuterJoin",
            Self::Semi => "LeftSemiJoin",
            Self::Anti => "LeftAntiJoin",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Full => "full",
            Self::Semi => "semi",
            Self::Anti => "anti",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for JoinKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "full" => Ok(Self::Full),
            "semi" => Ok(Self::Semi),
            "anti" => Ok(Self::Anti),
            other => anyhow::bail!(
                "unknown join kind {other:?} (expected inner/left/right/full/semi/anti)"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// LogicalNode
// ---------------------------------------------------------------------------

/// Logical plan tree: the input the planner converts into a physical plan.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalNode {
    Scan(TableScan),
    Join(Box<LogicalJoin>),
}

impl LogicalNode {
    pub fn row_type(&self) -> &RowType {
        match self {
            Self::Scan(scan) => &scan.row_type,
            Self::Join(join) => join.row_type(),
        }
    }
}

/// Leaf node reading a named table or stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TableScan {
    pub table: String,
    pub row_type: RowType,
}

impl TableScan {
    pub fn new(table: impl Into<String>, row_type: RowType) -> Self {
        Self {
            table: table.into(),
            row_type,
        }
    }
}

// ---------------------------------------------------------------------------
// LogicalJoin
// ---------------------------------------------------------------------------

/// Logical join awaiting a physical strategy.
///
/// The output row type is derived once at construction from the two inputs
/// and the join kind.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalJoin {
    pub kind: JoinKind,
    pub left: LogicalNode,
    pub right: LogicalNode,
    pub condition: Expr,
    pub hints: Vec<RelHint>,
    row_type: RowType,
}

impl LogicalJoin {
    pub fn new(kind: JoinKind, left: LogicalNode, right: LogicalNode, condition: Expr) -> Self {
        let row_type = RowType::join(left.row_type(), right.row_type(), kind);
        Self {
            kind,
            left,
            right,
            condition,
            hints: Vec::new(),
            row_type,
        }
    }

    pub fn with_hints(mut self, hints: Vec<RelHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Joined output row type.
    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }

    pub fn left_field_count(&self) -> usize {
        self.left.row_type().field_count()
    }

    /// Split the condition into equi-join key pairs and the remaining
    /// conjuncts.
    ///
    /// A conjunct `$a = $b` is an equi pair when one operand references the
    /// left input and the other the right input, in either order. Right-side
    /// keys are reported relative to the right input.
    pub fn analyze_condition(&self) -> JoinInfo {
        let left_count = self.left_field_count();
        let total = left_count + self.right.row_type().field_count();
        let mut info = JoinInfo::default();

        for conjunct in self.condition.conjunctions() {
            if let Expr::Call {
                op: Op::Eq,
                operands,
            } = &conjunct
                && let [Expr::InputRef(a), Expr::InputRef(b)] = operands.as_slice()
            {
                let (a, b) = (*a, *b);
                if a < left_count && (left_count..total).contains(&b) {
                    info.left_keys.push(a);
                    info.right_keys.push(b - left_count);
                    continue;
                }
                if b < left_count && (left_count..total).contains(&a) {
                    info.left_keys.push(b);
                    info.right_keys.push(a - left_count);
                    continue;
                }
            }
            info.non_equi.push(conjunct);
        }
        info
    }
}

/// Result of [`LogicalJoin::analyze_condition`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinInfo {
    pub left_keys: Vec<usize>,
    pub right_keys: Vec<usize>,
    pub non_equi: Vec<Expr>,
}

impl JoinInfo {
    pub fn is_equi(&self) -> bool {
        self.non_equi.is_empty()
    }
}

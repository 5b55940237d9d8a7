use std::collections::BTreeMap;
use std::fmt;

use ij_rel::{Expr, Literal, LogicalJoin, Op, RowType};

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// WindowBounds
// ---------------------------------------------------------------------------

/// Relative time window between the two join inputs.
///
/// A left row at time `l` joins a right row at time `r` when
/// `left_lower_bound <= l - r <= left_upper_bound` (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub is_event_time: bool,
    pub left_lower_bound: i64,
    pub left_upper_bound: i64,
    /// Index of the time attribute in the left input's row type.
    pub left_time_idx: usize,
    /// Index of the time attribute in the right input's row type.
    pub right_time_idx: usize,
}

impl WindowBounds {
    /// The inclusive time predicate these bounds stand for, over the joined
    /// row: `$l >= $r + lower AND $l <= $r + upper`.
    pub fn time_predicate(&self, left_field_count: usize) -> Expr {
        let left = Expr::input(self.left_time_idx);
        let right = Expr::input(left_field_count + self.right_time_idx);
        let lower = Expr::binary(
            Op::Ge,
            left.clone(),
            Expr::binary(
                Op::Plus,
                right.clone(),
                Expr::interval_ms(self.left_lower_bound),
            ),
        );
        let upper = Expr::binary(
            Op::Le,
            left,
            Expr::binary(Op::Plus, right, Expr::interval_ms(self.left_upper_bound)),
        );
        Expr::and_all(vec![lower, upper])
    }
}

impl fmt::Display for WindowBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "isRowTime={}, leftLowerBound={}, leftUpperBound={}, ",
            self.is_event_time, self.left_lower_bound, self.left_upper_bound
        )?;
        write!(
            f,
            "leftTimeIndex={}, rightTimeIndex={}",
            self.left_time_idx, self.right_time_idx
        )
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// `true` when the join can run as an interval join: it projects both sides
/// and its condition bounds the two inputs' time attributes.
pub fn satisfy_interval_join(join: &LogicalJoin) -> bool {
    join.kind.projects_right() && extract_window_bounds(join).0.is_some()
}

/// Split the join condition into window bounds and the residual condition.
///
/// Returns `(None, Some(condition))` when no bounded time predicate exists.
/// The residual is `None` when the time predicates were the whole condition.
pub fn extract_window_bounds(join: &LogicalJoin) -> (Option<WindowBounds>, Option<Expr>) {
    let conjuncts = join.condition.conjunctions();
    let sides = Sides {
        left: join.left.row_type(),
        right: join.right.row_type(),
    };

    let mut candidates: BTreeMap<(usize, usize), Candidate> = BTreeMap::new();
    let mut order: Vec<(usize, usize)> = Vec::new();
    for (pos, conjunct) in conjuncts.iter().enumerate() {
        let Some(bound) = time_bound(conjunct, &sides) else {
            continue;
        };
        let pair = (bound.left_idx, bound.right_idx);
        let entry = candidates.entry(pair).or_insert_with(|| {
            order.push(pair);
            Candidate {
                is_event_time: bound.is_event_time,
                lower: None,
                upper: None,
                consumed: Vec::new(),
            }
        });
        entry.absorb(bound, pos);
    }

    // First attribute pair (in condition order) bounded on both sides.
    let chosen = order.iter().find_map(|pair| {
        let c = &candidates[pair];
        match (c.lower, c.upper) {
            (Some(lower), Some(upper)) => Some((*pair, c, lower, upper)),
            _ => None,
        }
    });
    let Some(((left_idx, right_idx), candidate, lower, upper)) = chosen else {
        return (None, Some(join.condition.clone()));
    };

    let bounds = WindowBounds {
        is_event_time: candidate.is_event_time,
        left_lower_bound: lower,
        left_upper_bound: upper,
        left_time_idx: left_idx,
        right_time_idx: right_idx,
    };
    let remaining: Vec<Expr> = conjuncts
        .into_iter()
        .enumerate()
        .filter(|(pos, _)| !candidate.consumed.contains(pos))
        .map(|(_, c)| c)
        .collect();
    let residual = if remaining.is_empty() {
        None
    } else {
        Some(Expr::and_all(remaining))
    };
    (Some(bounds), residual)
}

struct Sides<'a> {
    left: &'a RowType,
    right: &'a RowType,
}

impl Sides<'_> {
    fn left_count(&self) -> usize {
        self.left.field_count()
    }

    /// Time-indicator kind of joined-row field `idx`: `Some(true)` for
    /// rowtime, `Some(false)` for proctime, `None` for anything else.
    fn time_kind(&self, idx: usize) -> Option<bool> {
        let field = if idx < self.left_count() {
            self.left.field(idx)?
        } else {
            self.right.field(idx - self.left_count())?
        };
        let ft = &field.field_type;
        if ft.is_rowtime_indicator() {
            Some(true)
        } else if ft.is_proctime_indicator() {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct Candidate {
    is_event_time: bool,
    lower: Option<i64>,
    upper: Option<i64>,
    consumed: Vec<usize>,
}

impl Candidate {
    fn absorb(&mut self, bound: TimeBound, pos: usize) {
        match bound.side {
            BoundSide::Lower(v) => self.lower = Some(self.lower.map_or(v, |cur| cur.max(v))),
            BoundSide::Upper(v) => self.upper = Some(self.upper.map_or(v, |cur| cur.min(v))),
        }
        self.consumed.push(pos);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundSide {
    Lower(i64),
    Upper(i64),
}

#[derive(Debug, Clone, Copy)]
struct TimeBound {
    left_idx: usize,
    right_idx: usize,
    is_event_time: bool,
    side: BoundSide,
}

/// Recognise `a OP b` where, after moving everything to one side, the
/// expression is `left.t - right.t + k OP 0` for two time attributes of the
/// same kind.
fn time_bound(conjunct: &Expr, sides: &Sides<'_>) -> Option<TimeBound> {
    let Expr::Call { op, operands } = conjunct else {
        return None;
    };
    if !matches!(op, Op::Lt | Op::Le | Op::Gt | Op::Ge) {
        return None;
    }
    let [a, b] = operands.as_slice() else {
        return None;
    };
    let mut diff = Linear::of(a, sides)?;
    diff.subtract(Linear::of(b, sides)?)?;
    diff.refs.retain(|_, coeff| *coeff != 0);

    let mut refs = diff.refs.iter();
    let (Some((&first, &c1)), Some((&second, &c2)), None) = (refs.next(), refs.next(), refs.next())
    else {
        return None;
    };
    // BTreeMap keys are ordered, so `first` is the left-side candidate.
    let left_count = sides.left_count();
    if first >= left_count || second < left_count || c1 + c2 != 0 || c1.abs() != 1 {
        return None;
    }
    let kind = sides.time_kind(first)?;
    if sides.time_kind(second)? != kind {
        return None;
    }

    // Normalise to `l - r + k OP 0` with a +1 coefficient on the left.
    let (op, k) = if c1 == 1 {
        (*op, diff.constant)
    } else {
        (op.reverse(), diff.constant.checked_neg()?)
    };
    // l - r OP -k
    let c = k.checked_neg()?;
    let side = match op {
        Op::Ge => BoundSide::Lower(c),
        Op::Gt => BoundSide::Lower(c.checked_add(1)?),
        Op::Le => BoundSide::Upper(c),
        Op::Lt => BoundSide::Upper(c.checked_sub(1)?),
        _ => return None,
    };
    Some(TimeBound {
        left_idx: first,
        right_idx: second - left_count,
        is_event_time: kind,
        side,
    })
}

/// `sum(coeff * $ref) + constant`, restricted to time-attribute references.
#[derive(Debug, Default)]
struct Linear {
    refs: BTreeMap<usize, i64>,
    constant: i64,
}

impl Linear {
    fn of(expr: &Expr, sides: &Sides<'_>) -> Option<Linear> {
        match expr {
            Expr::InputRef(idx) => {
                sides.time_kind(*idx)?;
                let mut lin = Linear::default();
                lin.refs.insert(*idx, 1);
                Some(lin)
            }
            Expr::Literal(Literal::Int(v) | Literal::Interval(v)) => Some(Linear {
                refs: BTreeMap::new(),
                constant: *v,
            }),
            Expr::Call {
                op: Op::Plus,
                operands,
            } => {
                let [l, r] = operands.as_slice() else {
                    return None;
                };
                let mut lin = Linear::of(l, sides)?;
                lin.add(Linear::of(r, sides)?)?;
                Some(lin)
            }
            Expr::Call {
                op: Op::Minus,
                operands,
            } => {
                let [l, r] = operands.as_slice() else {
                    return None;
                };
                let mut lin = Linear::of(l, sides)?;
                lin.subtract(Linear::of(r, sides)?)?;
                Some(lin)
            }
            _ => None,
        }
    }

    fn add(&mut self, other: Linear) -> Option<()> {
        self.combine(other, 1)
    }

    fn subtract(&mut self, other: Linear) -> Option<()> {
        self.combine(other, -1)
    }

    fn combine(&mut self, other: Linear, sign: i64) -> Option<()> {
        for (idx, coeff) in other.refs {
            let slot = self.refs.entry(idx).or_insert(0);
            *slot = slot.checked_add(coeff.checked_mul(sign)?)?;
        }
        self.constant = self
            .constant
            .checked_add(other.constant.checked_mul(sign)?)?;
        Some(())
    }
}

use std::fmt;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
}

impl Op {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }

    /// The comparison obtained by swapping the operands (`a < b` ⇔ `b > a`).
    pub fn reverse(&self) -> Op {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            other => *other,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Day-time interval in milliseconds.
    Interval(i64),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Interval(ms) => write!(f, "{ms}:INTERVAL"),
            Self::Null => f.write_str("null"),
        }
    }
}

// ---------------------------------------------------------------------------
// Expr
// ---------------------------------------------------------------------------

/// Row expression over the joined input row.
///
/// `InputRef(i)` addresses field `i` of the concatenated `left ++ right` row;
/// right-side fields start at `left.field_count()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    InputRef(usize),
    Literal(Literal),
    Call { op: Op, operands: Vec<Expr> },
}

impl Expr {
    pub fn input(idx: usize) -> Expr {
        Expr::InputRef(idx)
    }

    pub fn lit_true() -> Expr {
        Expr::Literal(Literal::Bool(true))
    }

    pub fn int(v: i64) -> Expr {
        Expr::Literal(Literal::Int(v))
    }

    pub fn interval_ms(ms: i64) -> Expr {
        Expr::Literal(Literal::Interval(ms))
    }

    pub fn call(op: Op, operands: Vec<Expr>) -> Expr {
        Expr::Call { op, operands }
    }

    pub fn binary(op: Op, left: Expr, right: Expr) -> Expr {
        Expr::Call {
            op,
            operands: vec![left, right],
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Expr {
        Self::binary(Op::Eq, left, right)
    }

    pub fn is_always_true(&self) -> bool {
        matches!(self, Expr::Literal(Literal::Bool(true)))
    }

    /// Flatten nested ANDs into their conjuncts. A literal `true` yields none.
    pub fn conjunctions(&self) -> Vec<Expr> {
        let mut out = Vec::new();
        collect_conjunctions(self, &mut out);
        out
    }

    /// Combine conjuncts with AND; an empty list is the literal `true`.
    pub fn and_all(mut conjuncts: Vec<Expr>) -> Expr {
        match conjuncts.len() {
            0 => Expr::lit_true(),
            1 => conjuncts.remove(0),
            _ => Expr::Call {
                op: Op::And,
                operands: conjuncts,
            },
        }
    }

    /// All input indices referenced by this expression, in visit order.
    pub fn input_refs(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_refs(&mut |i| out.push(i));
        out
    }

    fn visit_refs(&self, f: &mut impl FnMut(usize)) {
        match self {
            Expr::InputRef(i) => f(*i),
            Expr::Literal(_) => {}
            Expr::Call { operands, .. } => {
                for o in operands {
                    o.visit_refs(f);
                }
            }
        }
    }
}

fn collect_conjunctions(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Call {
            op: Op::And,
            operands,
        } => {
            for o in operands {
                collect_conjunctions(o, out);
            }
        }
        e if e.is_always_true() => {}
        e => out.push(e.clone()),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::InputRef(i) => write!(f, "${i}"),
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Call { op, operands } => match (op, operands.as_slice()) {
                (Op::Not, [inner]) => write!(f, "NOT({inner})"),
                (op, [l, r]) if *op != Op::And && *op != Op::Or => {
                    write!(f, "{}({l}, {r})", op.symbol())
                }
                (op, operands) => {
                    write!(f, "{}(", op.symbol())?;
                    for (i, o) in operands.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{o}")?;
                    }
                    f.write_str(")")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjunctions_flatten_nested_and() {
        let e = Expr::and_all(vec![
            Expr::eq(Expr::input(0), Expr::input(2)),
            Expr::and_all(vec![
                Expr::binary(Op::Ge, Expr::input(1), Expr::input(3)),
                Expr::lit_true(),
            ]),
        ]);
        let parts = e.conjunctions();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], Expr::binary(Op::Ge, Expr::input(1), Expr::input(3)));
    }

    #[test]
    fn and_all_of_nothing_is_true() {
        assert!(Expr::and_all(vec![]).is_always_true());
        assert!(Expr::lit_true().conjunctions().is_empty());
    }

    #[test]
    fn display_is_prefix_form() {
        let e = Expr::and_all(vec![
            Expr::eq(Expr::input(0), Expr::input(2)),
            Expr::binary(
                Op::Ge,
                Expr::input(1),
                Expr::binary(Op::Minus, Expr::input(3), Expr::interval_ms(5000)),
            ),
        ]);
        assert_eq!(
            e.to_string(),
            "AND(=($0, $2), >=($1, -($3, 5000:INTERVAL)))"
        );
    }

    #[test]
    fn input_refs_in_visit_order() {
        let e = Expr::binary(
            Op::Le,
            Expr::input(3),
            Expr::binary(Op::Plus, Expr::input(1), Expr::int(1)),
        );
        assert_eq!(e.input_refs(), vec![3, 1]);
    }
}

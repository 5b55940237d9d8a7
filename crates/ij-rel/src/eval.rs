use crate::expr::{Expr, Literal, Op};

/// Runtime value used when evaluating a condition against a concrete row.
///
/// Timestamps and intervals are both carried as `Int` milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Null,
}

impl Value {
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) | Literal::Interval(i) => Value::Int(*i),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Null => Value::Null,
        }
    }
}

/// Evaluate `expr` against `row` (the concatenated `left ++ right` values).
///
/// Uses SQL three-valued logic: `NULL` propagates through comparisons and
/// arithmetic, `AND`/`OR` follow Kleene semantics. Out-of-range references and
/// type mismatches evaluate to `NULL`.
pub fn eval(expr: &Expr, row: &[Value]) -> Value {
    match expr {
        Expr::InputRef(i) => row.get(*i).cloned().unwrap_or(Value::Null),
        Expr::Literal(lit) => Value::from(lit),
        Expr::Call { op, operands } => eval_call(*op, operands, row),
    }
}

fn eval_call(op: Op, operands: &[Expr], row: &[Value]) -> Value {
    match op {
        Op::And => {
            let mut saw_null = false;
            for o in operands {
                match eval(o, row) {
                    Value::Bool(false) => return Value::Bool(false),
                    Value::Bool(true) => {}
                    _ => saw_null = true,
                }
            }
            if saw_null { Value::Null } else { Value::Bool(true) }
        }
        Op::Or => {
            let mut saw_null = false;
            for o in operands {
                match eval(o, row) {
                    Value::Bool(true) => return Value::Bool(true),
                    Value::Bool(false) => {}
                    _ => saw_null = true,
                }
            }
            if saw_null { Value::Null } else { Value::Bool(false) }
        }
        Op::Not => match operands.first().map(|o| eval(o, row)) {
            Some(Value::Bool(b)) => Value::Bool(!b),
            _ => Value::Null,
        },
        Op::Plus | Op::Minus => {
            let [l, r] = operands else {
                return Value::Null;
            };
            match (eval(l, row), eval(r, row)) {
                (Value::Int(a), Value::Int(b)) => {
                    let v = if op == Op::Plus {
                        a.checked_add(b)
                    } else {
                        a.checked_sub(b)
                    };
                    v.map(Value::Int).unwrap_or(Value::Null)
                }
                _ => Value::Null,
            }
        }
        cmp => {
            let [l, r] = operands else {
                return Value::Null;
            };
            let ordering = match (eval(l, row), eval(r, row)) {
                (Value::Int(a), Value::Int(b)) => a.cmp(&b),
                (Value::Str(a), Value::Str(b)) => a.cmp(&b),
                (Value::Bool(a), Value::Bool(b)) => a.cmp(&b),
                _ => return Value::Null,
            };
            let result = match cmp {
                Op::Eq => ordering.is_eq(),
                Op::Ne => ordering.is_ne(),
                Op::Lt => ordering.is_lt(),
                Op::Le => ordering.is_le(),
                Op::Gt => ordering.is_gt(),
                Op::Ge => ordering.is_ge(),
                _ => return Value::Null,
            };
            Value::Bool(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_and_comparison() {
        let e = Expr::binary(
            Op::Ge,
            Expr::input(0),
            Expr::binary(Op::Minus, Expr::input(1), Expr::interval_ms(5000)),
        );
        assert!(eval(&e, &[Value::Int(10_000), Value::Int(14_000)]).is_true());
        assert!(!eval(&e, &[Value::Int(8_000), Value::Int(14_000)]).is_true());
    }

    #[test]
    fn null_propagates_but_and_short_circuits_on_false() {
        let cmp = Expr::eq(Expr::input(0), Expr::input(1));
        assert_eq!(eval(&cmp, &[Value::Null, Value::Int(1)]), Value::Null);

        let and = Expr::and_all(vec![
            cmp.clone(),
            Expr::Literal(Literal::Bool(false)),
        ]);
        assert_eq!(eval(&and, &[Value::Null, Value::Int(1)]), Value::Bool(false));

        let or = Expr::call(Op::Or, vec![cmp, Expr::lit_true()]);
        assert_eq!(eval(&or, &[Value::Null, Value::Int(1)]), Value::Bool(true));
    }

    #[test]
    fn mismatched_types_are_null() {
        let cmp = Expr::eq(Expr::input(0), Expr::input(1));
        assert_eq!(
            eval(&cmp, &[Value::Str("a".into()), Value::Int(1)]),
            Value::Null
        );
    }
}

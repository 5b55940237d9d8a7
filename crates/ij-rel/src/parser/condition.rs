use winnow::combinator::{alt, cut_err, opt};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::literal;

use crate::expr::{Expr, Literal, Op};
use crate::types::RowType;

use super::primitives::{ident, kw, single_quoted, unsigned_int, ws};

// ---------------------------------------------------------------------------
// Unresolved syntax tree
// ---------------------------------------------------------------------------

/// Condition as written, before names are bound to input positions.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Ast {
    Name(Option<String>, String),
    Lit(Literal),
    Call(Op, Vec<Ast>),
}

// ---------------------------------------------------------------------------
// JoinScope — name resolution
// ---------------------------------------------------------------------------

/// Names visible in a join condition: `left_alias.field` and
/// `right_alias.field`. Unqualified names resolve when unique across sides.
#[derive(Debug, Clone, Copy)]
pub struct JoinScope<'a> {
    pub left_alias: &'a str,
    pub left: &'a RowType,
    pub right_alias: &'a str,
    pub right: &'a RowType,
}

impl JoinScope<'_> {
    fn resolve_name(&self, qualifier: Option<&str>, field: &str) -> anyhow::Result<usize> {
        let offset = self.left.field_count();
        match qualifier {
            Some(q) if q == self.left_alias => self
                .left
                .index_of(field)
                .ok_or_else(|| anyhow::anyhow!("field `{field}` not found in `{q}`")),
            Some(q) if q == self.right_alias => self
                .right
                .index_of(field)
                .map(|i| i + offset)
                .ok_or_else(|| anyhow::anyhow!("field `{field}` not found in `{q}`")),
            Some(q) => anyhow::bail!(
                "unknown qualifier `{q}` (expected `{}` or `{}`)",
                self.left_alias,
                self.right_alias
            ),
            None => match (self.left.index_of(field), self.right.index_of(field)) {
                (Some(i), None) => Ok(i),
                (None, Some(i)) => Ok(i + offset),
                (Some(_), Some(_)) => anyhow::bail!("field `{field}` is ambiguous"),
                (None, None) => anyhow::bail!("field `{field}` not found"),
            },
        }
    }

    pub(super) fn resolve(&self, ast: &Ast) -> anyhow::Result<Expr> {
        Ok(match ast {
            Ast::Name(q, f) => Expr::InputRef(self.resolve_name(q.as_deref(), f)?),
            Ast::Lit(lit) => Expr::Literal(lit.clone()),
            Ast::Call(op, operands) => Expr::Call {
                op: *op,
                operands: operands
                    .iter()
                    .map(|o| self.resolve(o))
                    .collect::<anyhow::Result<_>>()?,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Grammar (lowest to highest precedence)
// ---------------------------------------------------------------------------

pub(super) fn condition(input: &mut &str) -> ModalResult<Ast> {
    ws.parse_next(input)?;
    let expr = or_expr.parse_next(input)?;
    ws.parse_next(input)?;
    Ok(expr)
}

/// `or_expr = and_expr { OR and_expr }`
fn or_expr(input: &mut &str) -> ModalResult<Ast> {
    let mut parts = vec![and_expr.parse_next(input)?];
    loop {
        ws.parse_next(input)?;
        if opt(kw("or")).parse_next(input)?.is_none() {
            break;
        }
        ws.parse_next(input)?;
        parts.push(cut_err(and_expr).parse_next(input)?);
    }
    Ok(fold(Op::Or, parts))
}

/// `and_expr = not_expr { AND not_expr }`
fn and_expr(input: &mut &str) -> ModalResult<Ast> {
    let mut parts = vec![not_expr.parse_next(input)?];
    loop {
        ws.parse_next(input)?;
        if opt(kw("and")).parse_next(input)?.is_none() {
            break;
        }
        ws.parse_next(input)?;
        parts.push(cut_err(not_expr).parse_next(input)?);
    }
    Ok(fold(Op::And, parts))
}

fn fold(op: Op, mut parts: Vec<Ast>) -> Ast {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        Ast::Call(op, parts)
    }
}

/// `not_expr = NOT not_expr | cmp_expr`
fn not_expr(input: &mut &str) -> ModalResult<Ast> {
    if opt(kw("not")).parse_next(input)?.is_some() {
        ws.parse_next(input)?;
        let inner = cut_err(not_expr).parse_next(input)?;
        return Ok(Ast::Call(Op::Not, vec![inner]));
    }
    cmp_expr.parse_next(input)
}

/// `cmp_expr = add_expr [cmp_op add_expr]`
fn cmp_expr(input: &mut &str) -> ModalResult<Ast> {
    let left = add_expr.parse_next(input)?;
    ws.parse_next(input)?;
    if let Some(op) = opt(cmp_op).parse_next(input)? {
        ws.parse_next(input)?;
        let right = cut_err(add_expr).parse_next(input)?;
        return Ok(Ast::Call(op, vec![left, right]));
    }
    Ok(left)
}

fn cmp_op(input: &mut &str) -> ModalResult<Op> {
    alt((
        literal("==").value(Op::Eq),
        literal("<>").value(Op::Ne),
        literal("!=").value(Op::Ne),
        literal("<=").value(Op::Le),
        literal(">=").value(Op::Ge),
        literal("=").value(Op::Eq),
        literal("<").value(Op::Lt),
        literal(">").value(Op::Gt),
    ))
    .parse_next(input)
}

/// `add_expr = primary { ("+" | "-") primary }`
fn add_expr(input: &mut &str) -> ModalResult<Ast> {
    let mut left = primary.parse_next(input)?;
    loop {
        ws.parse_next(input)?;
        let op = opt(alt((
            literal("+").value(Op::Plus),
            literal("-").value(Op::Minus),
        )))
        .parse_next(input)?;
        let Some(op) = op else {
            break;
        };
        ws.parse_next(input)?;
        let right = cut_err(primary).parse_next(input)?;
        left = Ast::Call(op, vec![left, right]);
    }
    Ok(left)
}

// ---------------------------------------------------------------------------
// Primary
// ---------------------------------------------------------------------------

fn primary(input: &mut &str) -> ModalResult<Ast> {
    alt((
        paren_expr,
        interval_literal,
        kw("true").map(|_| Ast::Lit(Literal::Bool(true))),
        kw("false").map(|_| Ast::Lit(Literal::Bool(false))),
        kw("null").map(|_| Ast::Lit(Literal::Null)),
        signed_int.map(|v| Ast::Lit(Literal::Int(v))),
        single_quoted.map(|s| Ast::Lit(Literal::Str(s))),
        name,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn paren_expr(input: &mut &str) -> ModalResult<Ast> {
    literal("(").parse_next(input)?;
    ws.parse_next(input)?;
    let inner = cut_err(or_expr).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(literal(")")).parse_next(input)?;
    Ok(inner)
}

fn signed_int(input: &mut &str) -> ModalResult<i64> {
    let negative = opt(literal("-")).parse_next(input)?.is_some();
    let v = unsigned_int.parse_next(input)?;
    Ok(if negative { -v } else { v })
}

/// `INTERVAL '<n>' <unit>` — folded to milliseconds.
fn interval_literal(input: &mut &str) -> ModalResult<Ast> {
    kw("interval").parse_next(input)?;
    ws.parse_next(input)?;
    let raw = cut_err(single_quoted).parse_next(input)?;
    ws.parse_next(input)?;
    let unit = cut_err(alt((
        alt((kw("millisecond"), kw("milliseconds"))).value(1i64),
        alt((kw("second"), kw("seconds"))).value(1_000i64),
        alt((kw("minute"), kw("minutes"))).value(60_000i64),
        alt((kw("hour"), kw("hours"))).value(3_600_000i64),
        alt((kw("day"), kw("days"))).value(86_400_000i64),
    )))
    .context(StrContext::Expected(StrContextValue::Description(
        "interval unit (MILLISECOND|SECOND|MINUTE|HOUR|DAY)",
    )))
    .parse_next(input)?;
    let n: i64 = raw.trim().parse().map_err(|_| cut_with("interval amount"))?;
    let ms = n
        .checked_mul(unit)
        .ok_or_else(|| cut_with("interval within the range of i64 milliseconds"))?;
    Ok(Ast::Lit(Literal::Interval(ms)))
}

fn cut_with(expected: &'static str) -> ErrMode<ContextError> {
    let mut err = ContextError::new();
    err.push(StrContext::Expected(StrContextValue::Description(expected)));
    ErrMode::Cut(err)
}

/// `ident [ "." ident ]`
fn name(input: &mut &str) -> ModalResult<Ast> {
    let first = ident.parse_next(input)?;
    if opt(literal(".")).parse_next(input)?.is_some() {
        let second = cut_err(ident).parse_next(input)?;
        return Ok(Ast::Name(Some(first.to_string()), second.to_string()));
    }
    Ok(Ast::Name(None, first.to_string()))
}

use winnow::combinator::{alt, cut_err, opt};
use winnow::prelude::*;
use winnow::token::literal;

use crate::types::{SqlType, TimeIndicator};

use super::primitives::{kw, unsigned_int, ws};

/// Raw pieces of a type declaration; validated by [`super::parse_field_type`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TypeDecl {
    pub sql_type: SqlType,
    pub not_null: bool,
    pub indicator: Option<TimeIndicator>,
}

/// `sql_type [NOT NULL] [*ROWTIME* | *PROCTIME*]`
pub(super) fn type_decl(input: &mut &str) -> ModalResult<TypeDecl> {
    ws.parse_next(input)?;
    let sql_type = sql_type.parse_next(input)?;
    ws.parse_next(input)?;
    let not_null = opt((kw("not"), ws, cut_err(kw("null"))))
        .parse_next(input)?
        .is_some();
    ws.parse_next(input)?;
    let indicator = opt(alt((
        literal("*ROWTIME*").value(TimeIndicator::Rowtime),
        literal("*PROCTIME*").value(TimeIndicator::Proctime),
    )))
    .parse_next(input)?;
    ws.parse_next(input)?;
    Ok(TypeDecl {
        sql_type,
        not_null,
        indicator,
    })
}

fn sql_type(input: &mut &str) -> ModalResult<SqlType> {
    alt((
        kw("boolean").value(SqlType::Boolean),
        alt((kw("int"), kw("integer"))).value(SqlType::Int),
        kw("bigint").value(SqlType::BigInt),
        kw("double").value(SqlType::Double),
        alt((kw("varchar"), kw("string"))).value(SqlType::Varchar),
        (kw("timestamp_ltz"), precision).map(|(_, p)| SqlType::TimestampLtz(p)),
        (kw("timestamp"), precision).map(|(_, p)| SqlType::Timestamp(p)),
    ))
    .parse_next(input)
}

/// Optional `(p)`; defaults to millisecond precision.
fn precision(input: &mut &str) -> ModalResult<u8> {
    ws.parse_next(input)?;
    if opt(literal("(")).parse_next(input)?.is_none() {
        return Ok(3);
    }
    ws.parse_next(input)?;
    let p = cut_err(unsigned_int).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(literal(")")).parse_next(input)?;
    Ok(p.clamp(0, 9) as u8)
}

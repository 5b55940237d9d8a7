use winnow::combinator::{alt, cut_err, opt, separated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::literal;

use crate::hint::RelHint;

use super::primitives::{ident, single_quoted, ws};

/// `[/*+] hint { "," hint } [*/]`
pub(super) fn hint_block(input: &mut &str) -> ModalResult<Vec<RelHint>> {
    ws.parse_next(input)?;
    let framed = opt(literal("/*+")).parse_next(input)?.is_some();
    ws.parse_next(input)?;
    let hints: Vec<RelHint> =
        separated(1.., hint, (ws, literal(","), ws)).parse_next(input)?;
    ws.parse_next(input)?;
    if framed {
        cut_err(literal("*/"))
            .context(StrContext::Expected(StrContextValue::Description(
                "closing `*/`",
            )))
            .parse_next(input)?;
        ws.parse_next(input)?;
    }
    Ok(hints)
}

/// `NAME [ "(" option { "," option } ")" ]`
fn hint(input: &mut &str) -> ModalResult<RelHint> {
    let name = ident.parse_next(input)?;
    ws.parse_next(input)?;
    let mut hint = RelHint::new(name);
    if opt(literal("(")).parse_next(input)?.is_some() {
        ws.parse_next(input)?;
        let options: Vec<(String, String)> =
            separated(0.., option, (ws, literal(","), ws)).parse_next(input)?;
        ws.parse_next(input)?;
        cut_err(literal(")")).parse_next(input)?;
        hint.kv_options = options;
    }
    Ok(hint)
}

/// `key = 'value'` where the key is quoted or a bare identifier.
fn option(input: &mut &str) -> ModalResult<(String, String)> {
    let key = alt((single_quoted, ident.map(str::to_string))).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(literal("=")).parse_next(input)?;
    ws.parse_next(input)?;
    let value = cut_err(single_quoted)
        .context(StrContext::Expected(StrContextValue::Description(
            "quoted option value",
        )))
        .parse_next(input)?;
    Ok((key, value))
}

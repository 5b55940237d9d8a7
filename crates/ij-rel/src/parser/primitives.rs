use winnow::ascii::multispace0;
use winnow::combinator::cut_err;
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

// ---------------------------------------------------------------------------
// Whitespace
// ---------------------------------------------------------------------------

pub(super) fn ws(input: &mut &str) -> ModalResult<()> {
    let _ = multispace0.parse_next(input)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Identifiers & keywords
// ---------------------------------------------------------------------------

pub(super) fn ident<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    if !input.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

/// Match a whole identifier equal to `keyword`, ignoring ASCII case.
pub(super) fn kw<'a>(keyword: &'static str) -> impl FnMut(&mut &'a str) -> ModalResult<()> {
    move |input: &mut &'a str| {
        let saved = *input;
        let word = ident.parse_next(input)?;
        if word.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            *input = saved;
            Err(ErrMode::Backtrack(ContextError::new()))
        }
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// `'...'` without escapes.
pub(super) fn single_quoted(input: &mut &str) -> ModalResult<String> {
    literal("'").parse_next(input)?;
    let content = take_while(0.., |c: char| c != '\'').parse_next(input)?;
    cut_err(literal("'"))
        .context(StrContext::Expected(StrContextValue::Description(
            "closing quote",
        )))
        .parse_next(input)?;
    Ok(content.to_string())
}

pub(super) fn unsigned_int(input: &mut &str) -> ModalResult<i64> {
    let digits = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    digits
        .parse::<i64>()
        .map_err(|_| ErrMode::Cut(ContextError::new()))
}

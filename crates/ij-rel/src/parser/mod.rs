use winnow::prelude::*;

mod condition;
mod field_type;
mod hints;
mod primitives;

pub use condition::JoinScope;

use crate::expr::Expr;
use crate::hint::RelHint;
use crate::types::FieldType;


// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Parse a join condition such as
/// `o.id = s.order_id AND o.ts >= s.ts - INTERVAL '5' SECOND`, binding names
/// against `scope`.
pub fn parse_condition(text: &str, scope: &JoinScope<'_>) -> anyhow::Result<Expr> {
    let ast = condition::condition
        .parse(text)
        .map_err(|e| anyhow::anyhow!("condition parse error: {e}"))?;
    scope.resolve(&ast)
}

/// Parse a declared field type such as `TIMESTAMP(3) *ROWTIME*` or
/// `BIGINT NOT NULL`.
pub fn parse_field_type(text: &str) -> anyhow::Result<FieldType> {
    let decl = field_type::type_decl
        .parse(text)
        .map_err(|e| anyhow::anyhow!("type parse error: {e}"))?;
    if let Some(indicator) = decl.indicator {
        if !decl.sql_type.is_timestamp() {
            anyhow::bail!(
                "time attribute `{text}` must be declared on a TIMESTAMP or TIMESTAMP_LTZ type"
            );
        }
        return Ok(FieldType {
            sql_type: decl.sql_type,
            nullable: false,
            time_indicator: Some(indicator),
        });
    }
    Ok(FieldType {
        sql_type: decl.sql_type,
        nullable: !decl.not_null,
        time_indicator: None,
    })
}

/// Parse a hint block: `/*+ EARLY_FIRE('delay'='500'), OTHER */`. The comment
/// delimiters are optional.
pub fn parse_hints(text: &str) -> anyhow::Result<Vec<RelHint>> {
    hints::hint_block
        .parse(text)
        .map_err(|e| anyhow::anyhow!("hint parse error: {e}"))
}

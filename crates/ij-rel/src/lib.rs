pub mod eval;
pub mod expr;
pub mod hint;
pub mod node;
pub mod parser;
pub mod types;

pub use eval::{Value, eval};
pub use expr::{Expr, Literal, Op};
pub use hint::{EARLY_FIRE_HINT, RelHint, is_early_fire_hint};
pub use node::{JoinInfo, JoinKind, LogicalJoin, LogicalNode, TableScan};
pub use parser::{JoinScope, parse_condition, parse_field_type, parse_hints};
pub use types::{Field, FieldType, RowType, SqlType, TimeIndicator};

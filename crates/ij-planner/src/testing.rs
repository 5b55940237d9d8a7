//! Fixtures shared by the planner's unit tests.

use ij_rel::{
    Field, JoinKind, JoinScope, LogicalJoin, LogicalNode, RowType, TableScan, Value, eval,
    parse_condition, parse_field_type,
};

/// Scan over `name` with `(field, type declaration)` pairs.
pub(crate) fn table(name: &str, fields: &[(&str, &str)]) -> LogicalNode {
    let fields = fields
        .iter()
        .map(|(n, t)| Field::new(*n, parse_field_type(t).unwrap()))
        .collect();
    LogicalNode::Scan(TableScan::new(name, RowType::new(fields)))
}

/// `l(id, ts *ROWTIME*, amount)`
pub(crate) fn rowtime_left() -> LogicalNode {
    table(
        "l",
        &[
            ("id", "BIGINT NOT NULL"),
            ("ts", "TIMESTAMP(3) *ROWTIME*"),
            ("amount", "INT"),
        ],
    )
}

/// `r(order_id, ts *ROWTIME*)`
pub(crate) fn rowtime_right() -> LogicalNode {
    table(
        "r",
        &[
            ("order_id", "BIGINT NOT NULL"),
            ("ts", "TIMESTAMP(3) *ROWTIME*"),
        ],
    )
}

/// `l(id, pt *PROCTIME*)`
pub(crate) fn proctime_left() -> LogicalNode {
    table("l", &[("id", "BIGINT NOT NULL"), ("pt", "TIMESTAMP_LTZ(3) *PROCTIME*")])
}

/// `r(order_id, pt *PROCTIME*)`
pub(crate) fn proctime_right() -> LogicalNode {
    table(
        "r",
        &[("order_id", "BIGINT NOT NULL"), ("pt", "TIMESTAMP_LTZ(3) *PROCTIME*")],
    )
}

/// Join `left` (alias `l`) and `right` (alias `r`) on `condition`.
pub(crate) fn join(
    kind: JoinKind,
    left: LogicalNode,
    right: LogicalNode,
    condition: &str,
) -> LogicalJoin {
    let scope = JoinScope {
        left_alias: "l",
        left: left.row_type(),
        right_alias: "r",
        right: right.row_type(),
    };
    let condition = parse_condition(condition, &scope).unwrap();
    LogicalJoin::new(kind, left, right, condition)
}

/// Inner join of the two rowtime tables.
pub(crate) fn rowtime_join(condition: &str) -> LogicalJoin {
    join(JoinKind::Inner, rowtime_left(), rowtime_right(), condition)
}

/// Rows of `(l.id, l.ts, l.amount, r.order_id, r.ts)` covering equal and
/// unequal keys and a spread of time differences around typical bounds.
pub(crate) fn rowtime_grid() -> Vec<Vec<Value>> {
    let deltas = [
        -20_000, -10_001, -10_000, -5_001, -5_000, -4_999, -1, 0, 1, 999, 1_000, 1_001, 4_999,
        5_000, 5_001, 10_000, 10_001, 20_000,
    ];
    let mut rows = Vec::new();
    for (l_id, r_id) in [(1, 1), (1, 2)] {
        for amount in [Value::Int(5), Value::Int(50), Value::Null] {
            for d in deltas {
                let r_ts = 1_000_000;
                rows.push(vec![
                    Value::Int(l_id),
                    Value::Int(r_ts + d),
                    amount.clone(),
                    Value::Int(r_id),
                    Value::Int(r_ts),
                ]);
            }
        }
    }
    rows
}

/// Evaluate `expr` on `row`, treating anything but TRUE as "no match".
pub(crate) fn holds(expr: &ij_rel::Expr, row: &[Value]) -> bool {
    eval(expr, row).is_true()
}

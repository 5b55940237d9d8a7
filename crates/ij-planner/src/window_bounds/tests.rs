use ij_rel::{Expr, JoinKind, Op};

use super::*;
use crate::testing::{
    holds, join, proctime_left, proctime_right, rowtime_grid, rowtime_join, rowtime_left, table,
};

fn bounds_of(condition: &str) -> (Option<WindowBounds>, Option<Expr>) {
    extract_window_bounds(&rowtime_join(condition))
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

#[test]
fn symmetric_interval_with_key() {
    let (bounds, residual) = bounds_of(
        "l.id = r.order_id AND l.ts >= r.ts - INTERVAL '5' SECOND \
         AND l.ts <= r.ts + INTERVAL '10' SECOND",
    );
    assert_eq!(
        bounds,
        Some(WindowBounds {
            is_event_time: true,
            left_lower_bound: -5_000,
            left_upper_bound: 10_000,
            left_time_idx: 1,
            right_time_idx: 1,
        })
    );
    assert_eq!(residual, Some(Expr::eq(Expr::input(0), Expr::input(3))));
}

#[test]
fn time_only_condition_leaves_no_residual() {
    let (bounds, residual) = bounds_of("l.ts >= r.ts AND l.ts <= r.ts + INTERVAL '1' MINUTE");
    let bounds = bounds.unwrap();
    assert_eq!((bounds.left_lower_bound, bounds.left_upper_bound), (0, 60_000));
    assert_eq!(residual, None);
}

#[test]
fn operands_may_be_flipped() {
    // r.ts <= l.ts + 5s  ⇔  l.ts - r.ts >= -5s
    let (bounds, _) =
        bounds_of("r.ts <= l.ts + INTERVAL '5' SECOND AND r.ts > l.ts - INTERVAL '2' SECOND");
    let bounds = bounds.unwrap();
    assert_eq!(bounds.left_lower_bound, -5_000);
    assert_eq!(bounds.left_upper_bound, 1_999);
}

#[test]
fn strict_comparisons_tighten_by_one_millisecond() {
    let (bounds, _) =
        bounds_of("l.ts > r.ts - INTERVAL '1' SECOND AND l.ts < r.ts + INTERVAL '1' SECOND");
    let bounds = bounds.unwrap();
    assert_eq!((bounds.left_lower_bound, bounds.left_upper_bound), (-999, 999));
}

#[test]
fn difference_form_is_recognised() {
    let (bounds, _) = bounds_of("l.ts - r.ts >= -3000 AND l.ts - r.ts <= 3000");
    let bounds = bounds.unwrap();
    assert_eq!((bounds.left_lower_bound, bounds.left_upper_bound), (-3_000, 3_000));
}

#[test]
fn tightest_bounds_win_and_all_are_consumed() {
    let (bounds, residual) = bounds_of(
        "l.ts >= r.ts - INTERVAL '10' SECOND AND l.ts >= r.ts - INTERVAL '5' SECOND \
         AND l.ts <= r.ts + INTERVAL '10' SECOND AND l.ts <= r.ts + INTERVAL '20' SECOND",
    );
    let bounds = bounds.unwrap();
    assert_eq!((bounds.left_lower_bound, bounds.left_upper_bound), (-5_000, 10_000));
    assert_eq!(residual, None);
}

#[test]
fn proctime_bounds() {
    let j = join(
        JoinKind::Left,
        proctime_left(),
        proctime_right(),
        "l.id = r.order_id AND l.pt >= r.pt - INTERVAL '1' MINUTE AND l.pt <= r.pt",
    );
    let (bounds, residual) = extract_window_bounds(&j);
    let bounds = bounds.unwrap();
    assert!(!bounds.is_event_time);
    assert_eq!((bounds.left_lower_bound, bounds.left_upper_bound), (-60_000, 0));
    assert_eq!((bounds.left_time_idx, bounds.right_time_idx), (1, 1));
    assert_eq!(residual, Some(Expr::eq(Expr::input(0), Expr::input(2))));
}

// ---------------------------------------------------------------------------
// Non-recognition
// ---------------------------------------------------------------------------

#[test]
fn single_bound_is_not_a_window() {
    let (bounds, residual) = bounds_of("l.id = r.order_id AND l.ts >= r.ts");
    assert_eq!(bounds, None);
    assert_eq!(residual, Some(rowtime_join("l.id = r.order_id AND l.ts >= r.ts").condition));
}

#[test]
fn equi_only_is_not_a_window() {
    let (bounds, _) = bounds_of("l.id = r.order_id");
    assert_eq!(bounds, None);
}

#[test]
fn non_time_attributes_are_ignored() {
    let (bounds, residual) = bounds_of("l.amount >= r.order_id AND l.amount <= r.order_id + 5");
    assert_eq!(bounds, None);
    assert!(residual.is_some());
}

#[test]
fn same_side_comparison_is_not_a_window() {
    let left = table(
        "l",
        &[
            ("t1", "TIMESTAMP(3) *ROWTIME*"),
            ("t2", "TIMESTAMP(3) *ROWTIME*"),
        ],
    );
    let j = join(
        JoinKind::Inner,
        left,
        crate::testing::rowtime_right(),
        "l.t1 >= l.t2 AND l.t1 <= l.t2 + 10",
    );
    assert_eq!(extract_window_bounds(&j).0, None);
}

#[test]
fn mixed_time_kinds_are_not_a_window() {
    let j = join(
        JoinKind::Inner,
        rowtime_left(),
        proctime_right(),
        "l.ts >= r.pt AND l.ts <= r.pt + INTERVAL '1' SECOND",
    );
    assert_eq!(extract_window_bounds(&j).0, None);
}

#[test]
fn disjunction_is_not_decomposed() {
    let (bounds, _) = bounds_of("l.ts >= r.ts OR l.ts <= r.ts + 10");
    assert_eq!(bounds, None);
}

#[test]
fn semi_join_is_not_an_interval_join() {
    let j = join(
        JoinKind::Semi,
        rowtime_left(),
        crate::testing::rowtime_right(),
        "l.ts >= r.ts AND l.ts <= r.ts + 10",
    );
    assert!(extract_window_bounds(&j).0.is_some());
    assert!(!satisfy_interval_join(&j));

    let inner = rowtime_join("l.ts >= r.ts AND l.ts <= r.ts + 10");
    assert!(satisfy_interval_join(&inner));
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn residual_and_time_predicate_reconstruct_the_condition() {
    let conditions = [
        "l.id = r.order_id AND l.ts >= r.ts - INTERVAL '5' SECOND AND l.ts <= r.ts + INTERVAL '10' SECOND",
        "l.ts > r.ts - INTERVAL '5' SECOND AND l.amount > 10 AND l.ts < r.ts + INTERVAL '1' SECOND",
        "r.ts <= l.ts AND l.id = r.order_id AND r.ts + INTERVAL '5' SECOND >= l.ts",
        "l.ts - r.ts >= -10000 AND l.ts - r.ts <= 0 AND l.ts >= r.ts - 5000",
    ];
    let grid = rowtime_grid();
    for text in conditions {
        let j = rowtime_join(text);
        let (bounds, residual) = extract_window_bounds(&j);
        let bounds = bounds.unwrap_or_else(|| panic!("no bounds for {text}"));
        let mut parts = residual.map(|r| r.conjunctions()).unwrap_or_default();
        parts.push(bounds.time_predicate(j.left_field_count()));
        let rebuilt = Expr::and_all(parts);
        for row in &grid {
            assert_eq!(
                holds(&j.condition, row),
                holds(&rebuilt, row),
                "condition {text} row {row:?} rebuilt {rebuilt}"
            );
        }
    }
}

#[test]
fn time_predicate_shape() {
    let bounds = WindowBounds {
        is_event_time: true,
        left_lower_bound: -5_000,
        left_upper_bound: 0,
        left_time_idx: 1,
        right_time_idx: 1,
    };
    assert_eq!(
        bounds.time_predicate(3).to_string(),
        "AND(>=($1, +($4, -5000:INTERVAL)), <=($1, +($4, 0:INTERVAL)))"
    );
    assert!(matches!(
        bounds.time_predicate(3),
        Expr::Call { op: Op::And, .. }
    ));
}

#[test]
fn display_lists_all_bounds() {
    let (bounds, _) = bounds_of("l.ts >= r.ts AND l.ts <= r.ts + 10");
    assert_eq!(
        bounds.unwrap().to_string(),
        "isRowTime=true, leftLowerBound=0, leftUpperBound=10, leftTimeIndex=1, rightTimeIndex=1"
    );
}

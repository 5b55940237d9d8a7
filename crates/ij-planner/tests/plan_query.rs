use ij_config::{PlannerConfig, QueryFile};
use ij_planner::{Distribution, EarlyFireParameters, PhysicalNode, Planner, RuleError};

const TABLES: &str = r#"
[[table]]
name = "orders"
fields = [
  { name = "id", type = "BIGINT NOT NULL" },
  { name = "ts", type = "TIMESTAMP(3) *ROWTIME*" },
  { name = "amount", type = "INT" },
]

[[table]]
name = "shipments"
fields = [
  { name = "order_id", type = "BIGINT NOT NULL" },
  { name = "ts", type = "TIMESTAMP(3) *ROWTIME*" },
]

[[table]]
name = "clicks"
fields = [
  { name = "user_id", type = "BIGINT" },
  { name = "pt", type = "TIMESTAMP_LTZ(3) *PROCTIME*" },
]

[[table]]
name = "views"
fields = [
  { name = "user_id", type = "BIGINT" },
  { name = "pt", type = "TIMESTAMP_LTZ(3) *PROCTIME*" },
]

[[table]]
name = "impressions"
fields = [
  { name = "user_id", type = "BIGINT" },
  { name = "pt", type = "TIMESTAMP_LTZ(3) *PROCTIME*" },
  { name = "served_at", type = "TIMESTAMP(3) *ROWTIME*" },
]
"#;

fn query(join: &str) -> QueryFile {
    format!("{TABLES}\n[join]\n{join}")
        .parse()
        .expect("query file should parse")
}

fn plan_with(config: &PlannerConfig, join: &str) -> Result<PhysicalNode, RuleError> {
    let logical = query(join).to_logical().expect("logical plan");
    Planner::from_config(config).convert(&logical)
}

fn plan(join: &str) -> Result<PhysicalNode, RuleError> {
    plan_with(&PlannerConfig::default(), join)
}

#[test]
fn event_time_interval_join_with_early_fire() {
    let node = plan(
        r#"
kind = "left"
left = "orders"
right = "shipments"
condition = "orders.id = shipments.order_id AND orders.ts >= shipments.ts - INTERVAL '5' SECOND AND orders.ts <= shipments.ts + INTERVAL '10' SECOND"
hints = ["/*+ EARLY_FIRE('Delay'='500', 'FREQUENCY'='1000') */"]
"#,
    )
    .unwrap();
    let PhysicalNode::IntervalJoin(ij) = &node else {
        panic!("expected interval join:\n{node}");
    };
    assert!(ij.window_bounds.is_event_time);
    assert_eq!(ij.window_bounds.left_lower_bound, -5_000);
    assert_eq!(ij.window_bounds.left_upper_bound, 10_000);
    assert_eq!(ij.early_fire, EarlyFireParameters::new(500, 1000));
    assert_eq!(ij.left.distribution(), &Distribution::Hash(vec![0]));
    assert!(node.explain().starts_with("IntervalJoin(joinType=[LeftOuterJoin]"));
}

#[test]
fn proctime_interval_join() {
    let node = plan(
        r#"
left = "clicks"
right = "views"
condition = "clicks.user_id = views.user_id AND clicks.pt >= views.pt - INTERVAL '1' MINUTE AND clicks.pt <= views.pt"
"#,
    )
    .unwrap();
    let PhysicalNode::IntervalJoin(ij) = node else {
        panic!("expected interval join");
    };
    assert!(!ij.window_bounds.is_event_time);
    assert_eq!(ij.early_fire, EarlyFireParameters::default());
}

#[test]
fn proctime_join_carrying_rowtime_is_rejected() {
    let err = plan(
        r#"
left = "clicks"
right = "impressions"
condition = "clicks.pt >= impressions.pt AND clicks.pt <= impressions.pt + INTERVAL '5' SECOND"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, RuleError::Planning(ref m) if m.contains("proctime attribute")));
}

#[test]
fn mismatched_rowtime_types_are_rejected() {
    let text = TABLES.replace(
        r#"{ name = "ts", type = "TIMESTAMP(3) *ROWTIME*" },
]

[[table]]
name = "clicks""#,
        r#"{ name = "ts", type = "TIMESTAMP_LTZ(3) *ROWTIME*" },
]

[[table]]
name = "clicks""#,
    );
    let q: QueryFile = format!(
        "{text}\n[join]\nleft = \"orders\"\nright = \"shipments\"\n\
         condition = \"orders.ts >= shipments.ts AND orders.ts <= shipments.ts\"\n"
    )
    .parse()
    .unwrap();
    let logical = q.to_logical().unwrap();
    let err = Planner::from_config(&PlannerConfig::default())
        .convert(&logical)
        .unwrap_err();
    assert_eq!(
        err,
        RuleError::Validation(
            "Interval join with rowtime attribute requires same rowtime types, \
             but the types are TIMESTAMP(3) *ROWTIME* and TIMESTAMP_LTZ(3) *ROWTIME*."
                .to_string()
        )
    );
}

#[test]
fn unbounded_join_uses_regular_join() {
    let node = plan(
        r#"
kind = "semi"
left = "orders"
right = "shipments"
condition = "orders.id = shipments.order_id AND orders.ts >= shipments.ts AND orders.ts <= shipments.ts"
"#,
    )
    .unwrap();
    assert!(matches!(node, PhysicalNode::Join(_)), "{node}");
}

#[test]
fn malformed_early_fire_fails_planning() {
    let err = plan(
        r#"
left = "orders"
right = "shipments"
condition = "orders.ts >= shipments.ts AND orders.ts <= shipments.ts + 1000"
hints = ["/*+ EARLY_FIRE('delay'='abc') */"]
"#,
    )
    .unwrap_err();
    assert!(matches!(err, RuleError::Planning(_)));
}

#[test]
fn interval_rule_can_be_disabled() {
    let config: PlannerConfig = "[planner]\ninterval_join = false\nemit_exchanges = false\n"
        .parse()
        .unwrap();
    let node = plan_with(
        &config,
        r#"
left = "orders"
right = "shipments"
condition = "orders.id = shipments.order_id AND orders.ts >= shipments.ts AND orders.ts <= shipments.ts"
"#,
    )
    .unwrap();
    let PhysicalNode::Join(j) = &node else {
        panic!("expected regular join:\n{node}");
    };
    assert!(matches!(j.left, PhysicalNode::TableSourceScan(_)));
    assert_eq!(j.left.distribution(), &Distribution::Hash(vec![0]));
}

#[test]
fn optimize_reports_structured_errors() {
    let logical = query(
        r#"
left = "orders"
right = "shipments"
condition = "orders.ts >= shipments.ts AND orders.ts <= shipments.ts"
hints = ["/*+ EARLY_FIRE('frequency'='-1') */"]
"#,
    )
    .to_logical()
    .unwrap();
    let planner = Planner::from_config(&PlannerConfig::default());
    assert!(planner.optimize(&logical).is_err());
}

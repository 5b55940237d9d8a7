use std::fmt;

use ij_rel::{Expr, Op, RowType};

use crate::physical::{Distribution, PhysicalNode};

// ---------------------------------------------------------------------------
// Tree rendering
// ---------------------------------------------------------------------------

impl PhysicalNode {
    /// Indented plan tree, one node per line.
    pub fn explain(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PhysicalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self, "", "")
    }
}

fn write_tree(
    f: &mut fmt::Formatter<'_>,
    node: &PhysicalNode,
    head: &str,
    indent: &str,
) -> fmt::Result {
    writeln!(f, "{head}{}", describe(node))?;
    let children = node.children();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let (branch, cont) = if i + 1 == count {
            ("+- ", "   ")
        } else {
            (":- ", ":  ")
        };
        write_tree(
            f,
            child,
            &format!("{indent}{branch}"),
            &format!("{indent}{cont}"),
        )?;
    }
    Ok(())
}

fn describe(node: &PhysicalNode) -> String {
    match node {
        PhysicalNode::TableSourceScan(scan) => format!(
            "TableSourceScan(table=[{}], fields=[{}])",
            scan.table,
            scan.row_type.field_names().join(", ")
        ),
        PhysicalNode::Exchange(ex) => format!(
            "Exchange(distribution=[{}])",
            format_distribution(&ex.traits.distribution, ex.input.row_type())
        ),
        PhysicalNode::IntervalJoin(j) => {
            let names = joined_field_names(j.left.row_type(), j.right.row_type());
            let mut parts = vec![
                format!("joinType=[{}]", j.kind.explain_name()),
                format!("windowBounds=[{}]", j.window_bounds),
                format!("where=[{}]", format_expr(&j.condition, &names)),
            ];
            if j.early_fire.is_enabled() {
                parts.push(format!("earlyFire=[{}]", j.early_fire));
            }
            parts.push(format!("select=[{}]", j.row_type.field_names().join(", ")));
            format!("IntervalJoin({})", parts.join(", "))
        }
        PhysicalNode::Join(j) => {
            let names = joined_field_names(j.left.row_type(), j.right.row_type());
            format!(
                "Join(joinType=[{}], where=[{}], select=[{}])",
                j.kind.explain_name(),
                format_expr(&j.condition, &names),
                j.row_type.field_names().join(", ")
            )
        }
    }
}

/// Field names of `left ++ right`, with the same de-duplication the joined
/// row type applies. Indexes line up with join-condition input references.
pub fn joined_field_names(left: &RowType, right: &RowType) -> Vec<String> {
    RowType::join(left, right, ij_rel::JoinKind::Inner)
        .field_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn format_distribution(dist: &Distribution, row_type: &RowType) -> String {
    match dist {
        Distribution::Hash(keys) => {
            let names: Vec<String> = keys
                .iter()
                .map(|k| {
                    row_type
                        .field(*k)
                        .map_or_else(|| format!("${k}"), |f| f.name.clone())
                })
                .collect();
            format!("hash[{}]", names.join(", "))
        }
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Expression formatting
// ---------------------------------------------------------------------------

/// Like `Expr`'s `Display`, with input references replaced by field names.
pub fn format_expr(expr: &Expr, names: &[String]) -> String {
    match expr {
        Expr::InputRef(i) => names
            .get(*i)
            .cloned()
            .unwrap_or_else(|| format!("${i}")),
        Expr::Literal(lit) => lit.to_string(),
        Expr::Call { op, operands } => {
            let args: Vec<String> = operands.iter().map(|o| format_expr(o, names)).collect();
            match op {
                Op::Not => format!("NOT({})", args.join(", ")),
                op => format!("{}({})", op.symbol(), args.join(", ")),
            }
        }
    }
}

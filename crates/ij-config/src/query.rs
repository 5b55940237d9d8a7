use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use ij_rel::{
    Field, JoinKind, JoinScope, LogicalJoin, LogicalNode, RelHint, RowType, TableScan,
    parse_condition, parse_field_type, parse_hints,
};

// ---------------------------------------------------------------------------
// Raw TOML structure
// ---------------------------------------------------------------------------

/// A query description: input tables plus one join over two of them.
///
/// ```toml
/// [[table]]
/// name = "orders"
/// fields = [
///   { name = "id", type = "BIGINT NOT NULL" },
///   { name = "ts", type = "TIMESTAMP(3) *ROWTIME*" },
/// ]
///
/// [join]
/// kind = "inner"
/// left = "orders"
/// right = "shipments"
/// condition = "orders.id = shipments.order_id AND orders.ts >= shipments.ts - INTERVAL '5' SECOND"
/// hints = ["/*+ EARLY_FIRE('delay'='500') */"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryFile {
    #[serde(rename = "table", default)]
    pub tables: Vec<TableDef>,
    pub join: JoinDef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_decl: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinDef {
    #[serde(default = "default_join_kind")]
    pub kind: String,
    pub left: String,
    pub right: String,
    pub condition: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

fn default_join_kind() -> String {
    "inner".to_string()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl QueryFile {
    /// Read and parse a query description file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        content.parse()
    }

    /// Build the logical plan: two scans joined by the described condition.
    pub fn to_logical(&self) -> anyhow::Result<LogicalNode> {
        let left = self.table_row_type(&self.join.left)?;
        let right = self.table_row_type(&self.join.right)?;
        let kind: JoinKind = self.join.kind.parse()?;

        let scope = JoinScope {
            left_alias: &self.join.left,
            left: &left,
            right_alias: &self.join.right,
            right: &right,
        };
        let condition = parse_condition(&self.join.condition, &scope)
            .with_context(|| format!("join condition {:?}", self.join.condition))?;

        let mut hints: Vec<RelHint> = Vec::new();
        for text in &self.join.hints {
            hints.extend(parse_hints(text).with_context(|| format!("join hint {text:?}"))?);
        }

        let join = LogicalJoin::new(
            kind,
            LogicalNode::Scan(TableScan::new(self.join.left.clone(), left)),
            LogicalNode::Scan(TableScan::new(self.join.right.clone(), right)),
            condition,
        )
        .with_hints(hints);
        Ok(LogicalNode::Join(Box::new(join)))
    }

    fn table_row_type(&self, name: &str) -> anyhow::Result<RowType> {
        let table = self
            .tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| anyhow::anyhow!("join references unknown table `{name}`"))?;
        let fields = table
            .fields
            .iter()
            .map(|f| {
                let field_type = parse_field_type(&f.type_decl)
                    .with_context(|| format!("table `{}` field `{}`", table.name, f.name))?;
                Ok(Field::new(f.name.clone(), field_type))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(RowType::new(fields))
    }
}

impl FromStr for QueryFile {
    type Err = anyhow::Error;

    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let query: QueryFile = toml::from_str(toml_str)?;
        validate(&query)?;
        Ok(query)
    }
}

fn validate(query: &QueryFile) -> anyhow::Result<()> {
    let mut names = HashSet::new();
    for table in &query.tables {
        if !names.insert(table.name.as_str()) {
            anyhow::bail!("duplicate table `{}`", table.name);
        }
        if table.fields.is_empty() {
            anyhow::bail!("table `{}` declares no fields", table.name);
        }
        let mut field_names = HashSet::new();
        for f in &table.fields {
            if !field_names.insert(f.name.as_str()) {
                anyhow::bail!("table `{}` declares field `{}` twice", table.name, f.name);
            }
        }
    }
    if query.join.left == query.join.right {
        anyhow::bail!(
            "self-join on `{}` is not supported; declare the table twice under different names",
            query.join.left
        );
    }
    Ok(())
}

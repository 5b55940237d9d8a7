use std::fmt;

use crate::node::JoinKind;

// ---------------------------------------------------------------------------
// SqlType
// ---------------------------------------------------------------------------

/// Logical SQL type of a field, without nullability or time semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    Int,
    BigInt,
    Double,
    Varchar,
    /// `TIMESTAMP(p)` without time zone.
    Timestamp(u8),
    /// `TIMESTAMP_LTZ(p)` — timestamp with local time zone.
    TimestampLtz(u8),
}

impl SqlType {
    /// Type family name, ignoring precision.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
            Self::Timestamp(_) => "TIMESTAMP",
            Self::TimestampLtz(_) => "TIMESTAMP_LTZ",
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::Timestamp(_) | Self::TimestampLtz(_))
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(p) | Self::TimestampLtz(p) => write!(f, "{}({p})", self.type_name()),
            _ => f.write_str(self.type_name()),
        }
    }
}

// ---------------------------------------------------------------------------
// TimeIndicator
// ---------------------------------------------------------------------------

/// Marks a timestamp field as a time attribute of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeIndicator {
    /// Event-time attribute; carries watermarks.
    Rowtime,
    /// Processing-time attribute.
    Proctime,
}

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Declared type of a field: SQL type + nullability + optional time indicator.
///
/// Rendered the way the planner prints it, e.g. `TIMESTAMP(3) *ROWTIME*` or
/// `BIGINT NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub sql_type: SqlType,
    pub nullable: bool,
    pub time_indicator: Option<TimeIndicator>,
}

impl FieldType {
    pub fn new(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            nullable: true,
            time_indicator: None,
        }
    }

    pub fn not_null(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            nullable: false,
            time_indicator: None,
        }
    }

    /// Event-time attribute over `sql_type` (usually `TIMESTAMP(3)`).
    pub fn rowtime(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            nullable: false,
            time_indicator: Some(TimeIndicator::Rowtime),
        }
    }

    /// Processing-time attribute; always `TIMESTAMP_LTZ(3)`.
    pub fn proctime() -> Self {
        Self {
            sql_type: SqlType::TimestampLtz(3),
            nullable: false,
            time_indicator: Some(TimeIndicator::Proctime),
        }
    }

    /// Type family name used when comparing time attributes across join sides.
    pub fn type_name(&self) -> &'static str {
        self.sql_type.type_name()
    }

    pub fn is_rowtime_indicator(&self) -> bool {
        self.time_indicator == Some(TimeIndicator::Rowtime)
    }

    pub fn is_proctime_indicator(&self) -> bool {
        self.time_indicator == Some(TimeIndicator::Proctime)
    }

    pub fn is_time_indicator(&self) -> bool {
        self.time_indicator.is_some()
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_type)?;
        match self.time_indicator {
            Some(TimeIndicator::Rowtime) => return f.write_str(" *ROWTIME*"),
            Some(TimeIndicator::Proctime) => return f.write_str(" *PROCTIME*"),
            None => {}
        }
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field / RowType
// ---------------------------------------------------------------------------

/// A single named field of a row type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered list of fields produced by a relational node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowType {
    pub fields: Vec<Field>,
}

impl RowType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Output row type of a join of `left` and `right`.
    ///
    /// Semi and anti joins only emit left rows. Outer joins make the padded
    /// side nullable; time indicators are kept as declared. Duplicate names on
    /// the right side get a numeric suffix (`id0`, `id1`, ...).
    pub fn join(left: &RowType, right: &RowType, kind: JoinKind) -> RowType {
        if matches!(kind, JoinKind::Semi | JoinKind::Anti) {
            return left.clone();
        }
        let pad_left = matches!(kind, JoinKind::Right | JoinKind::Full);
        let pad_right = matches!(kind, JoinKind::Left | JoinKind::Full);

        let mut fields = Vec::with_capacity(left.field_count() + right.field_count());
        for f in &left.fields {
            fields.push(padded(f, pad_left));
        }
        for f in &right.fields {
            let mut field = padded(f, pad_right);
            if fields.iter().any(|existing: &Field| existing.name == field.name) {
                let mut n = 0;
                while fields
                    .iter()
                    .any(|existing| existing.name == format!("{}{n}", f.name))
                {
                    n += 1;
                }
                field.name = format!("{}{n}", f.name);
            }
            fields.push(field);
        }
        RowType { fields }
    }
}

fn padded(field: &Field, pad: bool) -> Field {
    let mut f = field.clone();
    if pad && !f.field_type.is_time_indicator() {
        f.field_type.nullable = true;
    }
    f
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", field.name, field.field_type)?;
        }
        f.write_str(")")
    }
}

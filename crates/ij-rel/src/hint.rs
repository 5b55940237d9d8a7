use std::collections::HashMap;
use std::fmt;

/// Name of the join hint that requests early firing of interval-join results.
pub const EARLY_FIRE_HINT: &str = "EARLY_FIRE";

/// Whether `name` identifies the early-fire hint (case-insensitive).
pub fn is_early_fire_hint(name: &str) -> bool {
    name.eq_ignore_ascii_case(EARLY_FIRE_HINT)
}

/// Planner hint attached to a relational node, e.g.
/// `/*+ EARLY_FIRE('delay'='500', 'frequency'='1000') */`.
///
/// Options keep their declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelHint {
    pub name: String,
    pub kv_options: Vec<(String, String)>,
}

impl RelHint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kv_options: Vec::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.kv_options.push((key.into(), value.into()));
        self
    }

    /// Options keyed by lower-cased key. A later duplicate overrides an
    /// earlier one.
    pub fn lowercase_options(&self) -> HashMap<String, String> {
        self.kv_options
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect()
    }
}

impl fmt::Display for RelHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (k, v)) in self.kv_options.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{k}'='{v}'")?;
        }
        f.write_str(")")
    }
}

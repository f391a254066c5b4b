// src/store/filter.rs
// Query predicates and ordering

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::Value;

/// Predicate applied to a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Eq(Value),
    /// Inclusive bounds; a missing bound is open.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
}

impl Predicate {
    pub fn range(min: Option<Value>, max: Option<Value>) -> Self {
        Predicate::Range { min, max }
    }
}

/// Column name to predicate; all predicates must hold.
pub type Filters = BTreeMap<String, Predicate>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    #[serde(default)]
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Build filters from a list of `(column, predicate)` pairs.
#[cfg(test)]
pub fn filters<I, S>(items: I) -> Filters
where
    I: IntoIterator<Item = (S, Predicate)>,
    S: Into<String>,
{
    items.into_iter().map(|(k, p)| (k.into(), p)).collect()
}

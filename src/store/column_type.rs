// src/store/column_type.rs
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize, Serializer,
};
use std::fmt;

/// Declared type of a user-visible column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    #[default]
    Text,
    Integer,
    Decimal,
    Date,
}

impl ColumnType {
    pub const ALL: [ColumnType; 4] = [
        ColumnType::Text,
        ColumnType::Integer,
        ColumnType::Decimal,
        ColumnType::Date,
    ];

    /// Name persisted in the column catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Date => "date",
        }
    }

    /// SQLite storage class for the physical column.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal => "REAL",
            ColumnType::Date => "TEXT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ColumnType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Accepts the aliases below so settings and CLI input stay forgiving
impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_column_type(&s)
            .ok_or_else(|| de::Error::custom(format!("Unknown column type '{}'", s)))
    }
}

pub fn parse_column_type(s: &str) -> Option<ColumnType> {
    let norm = s.trim().to_ascii_lowercase();
    match norm.as_str() {
        "text" | "string" | "str" | "varchar" => Some(ColumnType::Text),
        "integer" | "int" | "i64" | "bigint" => Some(ColumnType::Integer),
        "decimal" | "float" | "real" | "f64" | "number" | "numeric" => Some(ColumnType::Decimal),
        "date" => Some(ColumnType::Date),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_canonical_names_and_aliases() {
        for ty in ColumnType::ALL {
            assert_eq!(parse_column_type(ty.as_str()), Some(ty));
        }
        assert_eq!(parse_column_type(" Float "), Some(ColumnType::Decimal));
        assert_eq!(parse_column_type("INT"), Some(ColumnType::Integer));
        assert_eq!(parse_column_type("blob"), None);
        assert_eq!(parse_column_type(""), None);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ColumnType::Decimal).unwrap();
        assert_eq!(json, "\"decimal\"");
        let back: ColumnType = serde_json::from_str("\"Real\"").unwrap();
        assert_eq!(back, ColumnType::Decimal);
        assert!(serde_json::from_str::<ColumnType>("\"bool\"").is_err());
    }
}

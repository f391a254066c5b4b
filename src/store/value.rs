// src/store/value.rs
// Cell values and their mapping to/from SQLite

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize, Serializer,
};
use std::fmt;

use super::column_type::ColumnType;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(f) => Some(*f),
            _ => None,
        }
    }

    /// Check a value against a declared column type, widening where lossless.
    /// Returns a message describing the mismatch on failure.
    pub fn coerce(self, ty: ColumnType) -> Result<Value, String> {
        match (self, ty) {
            (Value::Null, _) => Ok(Value::Null),
            (Value::Text(s), ColumnType::Text) => Ok(Value::Text(s)),
            (Value::Date(d), ColumnType::Text) => Ok(Value::Text(d.format(DATE_FORMAT).to_string())),
            (Value::Integer(i), ColumnType::Integer) => Ok(Value::Integer(i)),
            (Value::Decimal(f), ColumnType::Integer)
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 =>
            {
                Ok(Value::Integer(f as i64))
            }
            (Value::Integer(i), ColumnType::Decimal) => Ok(Value::Decimal(i as f64)),
            (Value::Decimal(f), ColumnType::Decimal) if f.is_finite() => Ok(Value::Decimal(f)),
            (Value::Date(d), ColumnType::Date) => Ok(Value::Date(d)),
            (Value::Text(s), ColumnType::Date) => parse_date(&s)
                .map(Value::Date)
                .ok_or_else(|| format!("'{}' is not a date (expected YYYY-MM-DD)", s)),
            (other, ty) => Err(format!("expected {} but got {} value '{}'", ty, other.kind(), other)),
        }
    }

    /// Parse user or spreadsheet text into a value of the given type. Blank text is NULL.
    pub fn parse_as(raw: &str, ty: ColumnType) -> Result<Value, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        match ty {
            ColumnType::Text => Ok(Value::Text(raw.to_string())),
            ColumnType::Integer => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("'{}' is not an integer", trimmed)),
            ColumnType::Decimal => trimmed
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Decimal)
                .ok_or_else(|| format!("'{}' is not a decimal number", trimmed)),
            ColumnType::Date => parse_date(trimmed)
                .map(Value::Date)
                .ok_or_else(|| format!("'{}' is not a date (expected YYYY-MM-DD)", trimmed)),
        }
    }

    /// Decode a stored cell according to the column's declared type.
    pub fn from_sql_ref(value: ValueRef<'_>, ty: ColumnType) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => match ty {
                ColumnType::Decimal => Value::Decimal(i as f64),
                ColumnType::Text | ColumnType::Date => Value::Text(i.to_string()),
                ColumnType::Integer => Value::Integer(i),
            },
            ValueRef::Real(f) => match ty {
                ColumnType::Text | ColumnType::Date => Value::Text(f.to_string()),
                _ => Value::Decimal(f),
            },
            ValueRef::Text(bytes) => {
                let s = String::from_utf8_lossy(bytes).into_owned();
                match ty {
                    ColumnType::Date => parse_date(&s).map(Value::Date).unwrap_or(Value::Text(s)),
                    _ => Value::Text(s),
                }
            }
            ValueRef::Blob(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Literal form used in `DEFAULT` clauses of DDL statements.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Decimal(f) => format!("{:?}", f),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Date(d) => format!("'{}'", d.format(DATE_FORMAT)),
        }
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .ok()
}

// Integers and decimals compare by numeric value, so an integer written to a
// decimal column equals what is read back.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Integer(i), Value::Decimal(f)) | (Value::Decimal(f), Value::Integer(i)) => *i as f64 == *f,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Decimal(f) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Date(d) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Text(d.format(DATE_FORMAT).to_string()))
            }
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Decimal(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
        }
    }
}

// Dates arrive as JSON strings and are narrowed later by `coerce`
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Decimal(f))
                } else {
                    Err(de::Error::custom(format!("Number {} out of range", n)))
                }
            }
            other => Err(de::Error::custom(format!(
                "Cell value must be null, number or string, got {}",
                other
            ))),
        }
    }
}

// src/properties.rs
// Adding user-defined properties (columns) to existing tables

use thiserror::Error;
use tracing::info;

use crate::store::column_type::parse_column_type;
use crate::store::{ColumnDefinition, ColumnType, SchemaStore, Store, StoreError, Value};

#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("Property name must not be empty")]
    EmptyName,
    #[error("Unknown property type '{given}'. Use one of: {expected}")]
    UnknownType { given: String, expected: String },
    #[error("Default '{value}' is not a valid {column_type}: {reason}")]
    InvalidDefault {
        value: String,
        column_type: ColumnType,
        reason: String,
    },
    #[error("Could not add property: {0}")]
    Store(#[from] StoreError),
}

fn type_names() -> String {
    ColumnType::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
}

impl PropertyError {
    /// True when the user can fix the request and retry.
    pub fn is_validation(&self) -> bool {
        match self {
            PropertyError::Store(e) => e.is_validation() || e.is_not_found(),
            _ => true,
        }
    }
}

/// A property as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct PropertyRequest {
    pub table: String,
    pub name: String,
    pub type_name: String,
    pub default: Option<String>,
    pub required: bool,
}

impl PropertyRequest {
    pub fn new(table: impl Into<String>, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            type_name: type_name.into(),
            default: None,
            required: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Turn the raw request into a column definition.
    pub fn to_column(&self) -> Result<ColumnDefinition, PropertyError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PropertyError::EmptyName);
        }
        let column_type = parse_column_type(&self.type_name)
            .ok_or_else(|| PropertyError::UnknownType {
                given: self.type_name.trim().to_string(),
                expected: type_names(),
            })?;

        let default = match self.default.as_deref() {
            Some(raw) => match Value::parse_as(raw, column_type) {
                Ok(Value::Null) => None,
                Ok(v) => Some(v),
                Err(reason) => {
                    return Err(PropertyError::InvalidDefault {
                        value: raw.to_string(),
                        column_type,
                        reason,
                    })
                }
            },
            None => None,
        };

        let mut column = ColumnDefinition::new(name, column_type);
        if let Some(default) = default {
            column = column.with_default(default);
        }
        if self.required {
            column = column.not_null();
        }
        Ok(column)
    }
}

pub struct PropertyService;

impl PropertyService {
    /// Validate the request and extend the table. Returns the stored definition.
    pub fn add_property(store: &mut Store, request: &PropertyRequest) -> Result<ColumnDefinition, PropertyError> {
        let column = request.to_column()?;
        SchemaStore::add_column(store, &request.table, column.clone())?;
        info!(
            "Property '{}' ({}) added to '{}'",
            column.name,
            column.column_type,
            request.table.trim()
        );
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_property_with_default() {
        let mut store = Store::open_in_memory().unwrap();
        let req = PropertyRequest::new("inventory", " unit_cost ", "Decimal").with_default("0");
        let col = PropertyService::add_property(&mut store, &req).unwrap();
        assert_eq!(col.name, "unit_cost");
        assert_eq!(col.default, Some(Value::Decimal(0.0)));
        let cols = SchemaStore::get_columns(&store, "inventory").unwrap();
        assert_eq!(cols.last(), Some(&col));
    }

    #[test]
    fn test_rejects_empty_name_and_unknown_type() {
        let mut store = Store::open_in_memory().unwrap();
        let err = PropertyService::add_property(&mut store, &PropertyRequest::new("sales", "  ", "text")).unwrap_err();
        assert!(matches!(err, PropertyError::EmptyName));
        let err =
            PropertyService::add_property(&mut store, &PropertyRequest::new("sales", "flag", "boolean")).unwrap_err();
        assert!(matches!(err, PropertyError::UnknownType { ref given, .. } if given == "boolean"));
        assert!(err.to_string().ends_with("Use one of: text, integer, decimal, date"), "{}", err);
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_default_of_wrong_type() {
        let mut store = Store::open_in_memory().unwrap();
        let req = PropertyRequest::new("sales", "promo_start", "date").with_default("next week");
        let err = PropertyService::add_property(&mut store, &req).unwrap_err();
        assert!(matches!(err, PropertyError::InvalidDefault { .. }));
        assert!(err.to_string().contains("next week"));
    }

    #[test]
    fn test_store_errors_are_wrapped() {
        let mut store = Store::open_in_memory().unwrap();
        let err = PropertyService::add_property(&mut store, &PropertyRequest::new("sales", "Discount", "decimal"))
            .unwrap_err();
        assert!(matches!(err, PropertyError::Store(ref e) if e.is_validation()));
        assert!(err.to_string().starts_with("Could not add property"));

        let err = PropertyService::add_property(&mut store, &PropertyRequest::new("staff", "wage", "decimal"))
            .unwrap_err();
        assert!(matches!(err, PropertyError::Store(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_required_property_needs_default() {
        let mut store = Store::open_in_memory().unwrap();
        let mut req = PropertyRequest::new("recipes", "portions", "integer");
        req.required = true;
        assert!(PropertyService::add_property(&mut store, &req).unwrap_err().is_validation());
        let req = PropertyRequest { default: Some("1".into()), ..req };
        let col = PropertyService::add_property(&mut store, &req).unwrap();
        assert!(!col.nullable);
        assert_eq!(col.default, Some(Value::Integer(1)));
    }
}

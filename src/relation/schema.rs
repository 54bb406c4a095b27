//! Schema definitions: named, typed, ordered columns.

use crate::error::{EngineError, EngineResult};
use crate::relation::value::DataType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One column of a relation schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of columns with unique names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema, validating that it is non-empty and names are unique
    pub fn new(columns: Vec<Column>) -> EngineResult<Self> {
        if columns.is_empty() {
            return Err(EngineError::Schema(
                "schema must contain at least one column".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if column.name.is_empty() {
                return Err(EngineError::Schema(
                    "schema entries must include a name".to_string(),
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(EngineError::Schema(format!(
                    "duplicate column name \"{}\"",
                    column.name
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Position of the column with the given name, if present
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Check pairwise type compatibility for the set operations.
    ///
    /// Arity must match and column types must agree position by position;
    /// names are free to differ.
    pub fn check_compatible(&self, other: &Schema) -> EngineResult<()> {
        if self.arity() != other.arity() {
            return Err(EngineError::Arity(format!(
                "relations must share the same arity ({} vs {})",
                self.arity(),
                other.arity()
            )));
        }
        for (index, (left, right)) in self.columns.iter().zip(other.columns.iter()).enumerate() {
            if left.data_type != right.data_type {
                return Err(EngineError::TypeMismatch(format!(
                    "column {}: {} vs {}",
                    index + 1,
                    left.data_type,
                    right.data_type
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> Vec<Column> {
        vec![
            Column::new("id", DataType::Int),
            Column::new("name", DataType::Text),
        ]
    }

    #[test]
    fn test_schema_validation() {
        assert!(Schema::new(two_columns()).is_ok());
        assert!(Schema::new(vec![]).is_err());
        assert!(Schema::new(vec![
            Column::new("id", DataType::Int),
            Column::new("id", DataType::Text),
        ])
        .is_err());
    }

    #[test]
    fn test_index_of() {
        let schema = Schema::new(two_columns()).unwrap();
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }

    #[test]
    fn test_compatibility() {
        let left = Schema::new(two_columns()).unwrap();
        let right = Schema::new(vec![
            Column::new("key", DataType::Int),
            Column::new("label", DataType::Text),
        ])
        .unwrap();
        assert!(left.check_compatible(&right).is_ok());

        let shorter = Schema::new(vec![Column::new("id", DataType::Int)]).unwrap();
        assert!(matches!(
            left.check_compatible(&shorter),
            Err(EngineError::Arity(_))
        ));

        let wrong_type = Schema::new(vec![
            Column::new("id", DataType::Int),
            Column::new("name", DataType::Bool),
        ])
        .unwrap();
        assert!(matches!(
            left.check_compatible(&wrong_type),
            Err(EngineError::TypeMismatch(_))
        ));
    }
}

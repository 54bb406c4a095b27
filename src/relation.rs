//! The relation model: typed in-memory tables with row provenance.
//!
//! A `Relation` is a named schema plus rows of coerced values, with one
//! `RowId` per row tracking lineage through operators. Relations are
//! immutable once created; every operator builds a fresh one.

pub mod diff;
pub mod key;
pub mod provenance;
pub mod schema;
pub mod value;

pub use diff::{relation_diff, relation_summary, RelationDiff, RelationSummary};
pub use key::RowKey;
pub use provenance::{Provenance, RowId, RowOrigin};
pub use schema::{Column, Schema};
pub use value::{DataType, Value};

use crate::error::{EngineError, EngineResult};

/// A named, typed, ordered table
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub name: String,
    pub schema: Schema,
    pub rows: Vec<Vec<Value>>,
    pub row_ids: Vec<RowId>,
}

impl Relation {
    /// Build a relation, coercing every value against its column type.
    ///
    /// Fails on arity mismatches and uncoercible values, naming the
    /// offending row and column. `row_ids` must parallel `rows`.
    pub fn create(
        name: impl Into<String>,
        schema: Schema,
        rows: Vec<Vec<Value>>,
        row_ids: Vec<RowId>,
    ) -> EngineResult<Self> {
        let name = name.into();
        if rows.len() != row_ids.len() {
            return Err(EngineError::Schema(format!(
                "relation {} has {} rows but {} row ids",
                name,
                rows.len(),
                row_ids.len()
            )));
        }

        let mut typed_rows = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != schema.arity() {
                return Err(EngineError::Schema(format!(
                    "row {} has {} values but expected {}",
                    row_index + 1,
                    row.len(),
                    schema.arity()
                )));
            }
            let mut typed_row = Vec::with_capacity(row.len());
            for (column_index, value) in row.into_iter().enumerate() {
                let column = schema.column(column_index);
                match value.coerce(column.data_type) {
                    Some(typed) => typed_row.push(typed),
                    None => {
                        return Err(EngineError::TypeCoercion {
                            value: value.render(),
                            expected: column.data_type.to_string(),
                            row: row_index + 1,
                            column: column.name.clone(),
                        })
                    }
                }
            }
            typed_rows.push(typed_row);
        }

        Ok(Self {
            name,
            schema,
            rows: typed_rows,
            row_ids,
        })
    }

    pub fn arity(&self) -> usize {
        self.schema.arity()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Resolve a column name to its index
    pub fn column_index(&self, name: &str) -> EngineResult<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| EngineError::unknown_column(name, format!("relation {}", self.name)))
    }
}

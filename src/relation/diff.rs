//! Relation-to-relation diffing and summaries for the pipeline UI.

use crate::relation::key::RowKey;
use crate::relation::Relation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Row-level difference between two relations, by row-value set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDiff {
    pub added: usize,
    pub removed: usize,
    pub changed_columns: usize,
}

/// Compact description of a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSummary {
    pub name: String,
    pub row_count: usize,
    pub column_count: usize,
}

/// Diff `next` against `previous`. With no previous relation every row of
/// `next` counts as added.
pub fn relation_diff(previous: Option<&Relation>, next: &Relation) -> RelationDiff {
    let previous = match previous {
        Some(relation) => relation,
        None => {
            return RelationDiff {
                added: next.rows.len(),
                removed: 0,
                changed_columns: next.schema.arity(),
            }
        }
    };

    let previous_keys: HashSet<RowKey> = previous.rows.iter().map(|row| RowKey::of(row)).collect();
    let next_keys: HashSet<RowKey> = next.rows.iter().map(|row| RowKey::of(row)).collect();

    let added = next_keys.difference(&previous_keys).count();
    let removed = previous_keys.difference(&next_keys).count();

    let changed_columns = previous
        .schema
        .columns()
        .iter()
        .enumerate()
        .filter(|(index, column)| match next.schema.columns().get(*index) {
            Some(other) => column.name != other.name || column.data_type != other.data_type,
            None => true,
        })
        .count();

    RelationDiff {
        added,
        removed,
        changed_columns,
    }
}

pub fn relation_summary(relation: &Relation) -> RelationSummary {
    RelationSummary {
        name: relation.name.clone(),
        row_count: relation.rows.len(),
        column_count: relation.schema.arity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::provenance::Provenance;
    use crate::relation::schema::{Column, Schema};
    use crate::relation::value::{DataType, Value};

    fn relation(name: &str, rows: Vec<Vec<Value>>) -> Relation {
        let mut prov = Provenance::new();
        let ids = (0..rows.len()).map(|i| prov.base(name, i)).collect();
        Relation::create(
            name,
            Schema::new(vec![Column::new("id", DataType::Int)]).unwrap(),
            rows,
            ids,
        )
        .unwrap()
    }

    #[test]
    fn test_diff_without_previous() {
        let next = relation("A", vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
        let diff = relation_diff(None, &next);
        assert_eq!(diff.added, 2);
        assert_eq!(diff.removed, 0);
        assert_eq!(diff.changed_columns, 1);
    }

    #[test]
    fn test_diff_between_relations() {
        let previous = relation("A", vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
        let next = relation("A", vec![vec![Value::Int(2)], vec![Value::Int(3)]]);
        let diff = relation_diff(Some(&previous), &next);
        assert_eq!(diff.added, 1);
        assert_eq!(diff.removed, 1);
        assert_eq!(diff.changed_columns, 0);
    }

    #[test]
    fn test_summary() {
        let rel = relation("A", vec![vec![Value::Int(1)]]);
        let summary = relation_summary(&rel);
        assert_eq!(summary.name, "A");
        assert_eq!(summary.row_count, 1);
        assert_eq!(summary.column_count, 1);
    }
}

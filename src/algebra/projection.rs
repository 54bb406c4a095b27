//! Projection: column subset with optional aliases, set semantics.

use crate::algebra::{ColumnSpec, Operator, Outcome, OutcomeDetails, OutcomeDiff};
use crate::error::{EngineError, EngineResult};
use crate::relation::{Column, Provenance, Relation, RowKey, Schema};
use std::collections::HashSet;

/// Project onto `columns`, deduplicating value-identical rows.
///
/// Each surviving row gets a fresh id derived from the first source row
/// that produced it; later duplicates contribute nothing to lineage.
pub fn projection(
    relation: &Relation,
    columns: &[ColumnSpec],
    provenance: &mut Provenance,
) -> EngineResult<Outcome> {
    if columns.is_empty() {
        return Err(EngineError::Schema(
            "projection requires at least one column".to_string(),
        ));
    }

    let mut indexes = Vec::with_capacity(columns.len());
    let mut output_columns = Vec::with_capacity(columns.len());
    for spec in columns {
        let index = relation.column_index(&spec.name)?;
        indexes.push(index);
        output_columns.push(Column::new(
            spec.output_name(),
            relation.schema.column(index).data_type,
        ));
    }
    let schema = Schema::new(output_columns)?;

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut row_ids = Vec::new();
    for (row, source_id) in relation.rows.iter().zip(relation.row_ids.iter()) {
        let projected: Vec<_> = indexes.iter().map(|&i| row[i].clone()).collect();
        if seen.insert(RowKey::of(&projected)) {
            row_ids.push(provenance.derive(Operator::Projection, vec![*source_id]));
            rows.push(projected);
        }
    }

    let highlight_columns = schema.column_names();
    let input_columns = relation.schema.arity();
    let output_count = schema.arity();
    let result = Relation::create(relation.name.clone(), schema, rows, row_ids)?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Projection,
        highlight_rows: Vec::new(),
        highlight_columns: highlight_columns.clone(),
        diff: Some(OutcomeDiff::Columns {
            input: input_columns,
            output: output_count,
        }),
        details: OutcomeDetails::Projection {
            columns: highlight_columns,
        },
    })
}

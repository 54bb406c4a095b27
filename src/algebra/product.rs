//! Cartesian product.

use crate::algebra::{Operator, Outcome, OutcomeDetails};
use crate::error::EngineResult;
use crate::relation::{Column, Provenance, Relation, Schema};

/// Schema of both inputs with columns prefixed by their relation name
pub(crate) fn prefixed_schema(left: &Relation, right: &Relation) -> EngineResult<Schema> {
    let columns = left
        .schema
        .iter()
        .map(|column| Column::new(format!("{}.{}", left.name, column.name), column.data_type))
        .chain(right.schema.iter().map(|column| {
            Column::new(format!("{}.{}", right.name, column.name), column.data_type)
        }))
        .collect();
    Schema::new(columns)
}

/// Every pairing of a left row with a right row, left-major order
pub fn product(
    left: &Relation,
    right: &Relation,
    provenance: &mut Provenance,
) -> EngineResult<Outcome> {
    let schema = prefixed_schema(left, right)?;

    let mut rows = Vec::with_capacity(left.rows.len() * right.rows.len());
    let mut row_ids = Vec::with_capacity(rows.capacity());
    for (left_row, left_id) in left.rows.iter().zip(left.row_ids.iter()) {
        for (right_row, right_id) in right.rows.iter().zip(right.row_ids.iter()) {
            let mut combined = left_row.clone();
            combined.extend(right_row.iter().cloned());
            rows.push(combined);
            row_ids.push(provenance.derive(Operator::Product, vec![*left_id, *right_id]));
        }
    }

    let result = Relation::create(
        format!("{}×{}", left.name, right.name),
        schema,
        rows,
        row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Product,
        highlight_rows: row_ids,
        highlight_columns: Vec::new(),
        diff: None,
        details: OutcomeDetails::Product {
            left: left.name.clone(),
            right: right.name.clone(),
        },
    })
}

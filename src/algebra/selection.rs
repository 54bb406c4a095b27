//! Selection: filter rows by a predicate.

use crate::algebra::{Operator, Outcome, OutcomeDetails, OutcomeDiff};
use crate::error::EngineResult;
use crate::predicate::Predicate;
use crate::relation::Relation;

/// Keep the rows matching `predicate`, preserving their row ids
pub fn selection(relation: &Relation, predicate: &Predicate) -> EngineResult<Outcome> {
    let mut kept_rows = Vec::new();
    let mut kept_ids = Vec::new();
    for (row, row_id) in relation.rows.iter().zip(relation.row_ids.iter()) {
        if predicate.matches(row)? {
            kept_rows.push(row.clone());
            kept_ids.push(*row_id);
        }
    }

    let removed = relation.rows.len() - kept_rows.len();
    let kept = kept_rows.len();
    let result = Relation::create(
        relation.name.clone(),
        relation.schema.clone(),
        kept_rows,
        kept_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Selection,
        highlight_rows: kept_ids,
        highlight_columns: Vec::new(),
        diff: Some(OutcomeDiff::Rows { kept, removed }),
        details: OutcomeDetails::Selection {
            predicate: predicate.sql().to_string(),
        },
    })
}

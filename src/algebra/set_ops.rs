//! Union, intersection and difference over type-compatible relations.
//!
//! All three require pairwise identical column types (names may differ) and
//! apply set semantics: no two value-identical rows survive.

use crate::algebra::{Operator, Outcome, OutcomeDetails, OutcomeDiff};
use crate::error::EngineResult;
use crate::relation::{Provenance, Relation, RowId, RowKey};
use std::collections::{HashMap, HashSet};

fn set_op_details(left: &Relation, right: &Relation) -> OutcomeDetails {
    OutcomeDetails::SetOp {
        left: left.name.clone(),
        right: right.name.clone(),
        left_rows: left.rows.len(),
        right_rows: right.rows.len(),
    }
}

/// All rows of either input, first occurrence wins
pub fn union(left: &Relation, right: &Relation) -> EngineResult<Outcome> {
    left.schema.check_compatible(&right.schema)?;

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut row_ids = Vec::new();
    for (row, row_id) in left
        .rows
        .iter()
        .zip(left.row_ids.iter())
        .chain(right.rows.iter().zip(right.row_ids.iter()))
    {
        if seen.insert(RowKey::of(row)) {
            rows.push(row.clone());
            row_ids.push(*row_id);
        }
    }

    let result = Relation::create(
        format!("{}∪{}", left.name, right.name),
        left.schema.clone(),
        rows,
        row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Union,
        highlight_rows: row_ids,
        highlight_columns: Vec::new(),
        diff: None,
        details: set_op_details(left, right),
    })
}

/// Rows present in both inputs; each output row derives from its first
/// matching pair
pub fn intersection(
    left: &Relation,
    right: &Relation,
    provenance: &mut Provenance,
) -> EngineResult<Outcome> {
    left.schema.check_compatible(&right.schema)?;

    let mut right_ids: HashMap<RowKey, RowId> = HashMap::new();
    for (row, row_id) in right.rows.iter().zip(right.row_ids.iter()) {
        right_ids.entry(RowKey::of(row)).or_insert(*row_id);
    }

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut row_ids = Vec::new();
    for (row, left_id) in left.rows.iter().zip(left.row_ids.iter()) {
        let key = RowKey::of(row);
        if let Some(right_id) = right_ids.get(&key) {
            if seen.insert(key) {
                row_ids.push(provenance.derive(Operator::Intersection, vec![*left_id, *right_id]));
                rows.push(row.clone());
            }
        }
    }

    let result = Relation::create(
        format!("{}∩{}", left.name, right.name),
        left.schema.clone(),
        rows,
        row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Intersection,
        highlight_rows: row_ids,
        highlight_columns: Vec::new(),
        diff: None,
        details: set_op_details(left, right),
    })
}

/// Left rows whose value is absent from the right input
pub fn difference(
    left: &Relation,
    right: &Relation,
    provenance: &mut Provenance,
) -> EngineResult<Outcome> {
    left.schema.check_compatible(&right.schema)?;

    let right_keys: HashSet<RowKey> = right.rows.iter().map(|row| RowKey::of(row)).collect();

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut row_ids = Vec::new();
    for (row, left_id) in left.rows.iter().zip(left.row_ids.iter()) {
        let key = RowKey::of(row);
        if !right_keys.contains(&key) && seen.insert(key) {
            row_ids.push(provenance.derive(Operator::Difference, vec![*left_id]));
            rows.push(row.clone());
        }
    }

    let kept = rows.len();
    let removed = left.rows.len() - kept;
    let result = Relation::create(
        format!("{}−{}", left.name, right.name),
        left.schema.clone(),
        rows,
        row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Difference,
        highlight_rows: row_ids,
        highlight_columns: Vec::new(),
        diff: Some(OutcomeDiff::Rows { kept, removed }),
        details: set_op_details(left, right),
    })
}

//! Equi-join via a hash index on the right input.
//!
//! Build phase indexes the right relation by its key columns; probe phase
//! walks the left relation in order, emitting one joined row per match.
//! Amortized O(|left| + |right| + matches).

use crate::algebra::product::prefixed_schema;
use crate::algebra::{Operator, Outcome, OutcomeDetails};
use crate::error::{EngineError, EngineResult};
use crate::relation::{Provenance, Relation, RowKey};
use crate::sql::JoinKeys;
use std::collections::HashMap;

fn key_indexes(relation: &Relation, keys: &[String], side: &str) -> EngineResult<Vec<usize>> {
    keys.iter()
        .map(|key| {
            relation.schema.index_of(key).ok_or_else(|| {
                EngineError::unknown_column(
                    key.clone(),
                    format!("{} relation {}", side, relation.name),
                )
            })
        })
        .collect()
}

/// Join rows whose key columns are equal
pub fn join(
    left: &Relation,
    right: &Relation,
    keys: &JoinKeys,
    provenance: &mut Provenance,
) -> EngineResult<Outcome> {
    if keys.left_keys.len() != keys.right_keys.len() {
        return Err(EngineError::JoinCondition(
            "join key counts must match".to_string(),
        ));
    }
    let left_indexes = key_indexes(left, &keys.left_keys, "left")?;
    let right_indexes = key_indexes(right, &keys.right_keys, "right")?;
    let schema = prefixed_schema(left, right)?;

    // build
    let mut index: HashMap<RowKey, Vec<usize>> = HashMap::new();
    for (position, row) in right.rows.iter().enumerate() {
        index
            .entry(RowKey::project(row, &right_indexes))
            .or_default()
            .push(position);
    }

    // probe
    let mut rows = Vec::new();
    let mut row_ids = Vec::new();
    let mut matched_pairs = Vec::new();
    for (left_row, left_id) in left.rows.iter().zip(left.row_ids.iter()) {
        let probe = RowKey::project(left_row, &left_indexes);
        if let Some(matches) = index.get(&probe) {
            for &position in matches {
                let mut combined = left_row.clone();
                combined.extend(right.rows[position].iter().cloned());
                let right_id = right.row_ids[position];
                rows.push(combined);
                row_ids.push(provenance.derive(Operator::Join, vec![*left_id, right_id]));
                matched_pairs.push((*left_id, right_id));
            }
        }
    }

    let key_descriptions = keys
        .left_keys
        .iter()
        .zip(keys.right_keys.iter())
        .map(|(l, r)| format!("{}.{} = {}.{}", left.name, l, right.name, r))
        .collect();

    let result = Relation::create(
        format!("{}⋈{}", left.name, right.name),
        schema,
        rows,
        row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Join,
        highlight_rows: row_ids,
        highlight_columns: Vec::new(),
        diff: None,
        details: OutcomeDetails::Join {
            left: left.name.clone(),
            right: right.name.clone(),
            keys: key_descriptions,
            matched_pairs,
        },
    })
}

//! Division: rows whose associated values cover an entire divisor relation.

use crate::algebra::{Operator, Outcome, OutcomeDetails};
use crate::error::{EngineError, EngineResult};
use crate::relation::{Provenance, Relation, RowId, RowKey, Schema, Value};
use std::collections::{HashMap, HashSet};

struct Group {
    quotient: Vec<Value>,
    observed: HashSet<RowKey>,
    members: Vec<RowId>,
}

/// Divide `dividend` by `divisor`.
///
/// Divisor column names must be a subset of the dividend's. Dividend rows
/// are grouped by the remaining (quotient) columns in first-appearance
/// order; a group qualifies when the divisor-column projections it
/// contains are a superset of the divisor's rows. An empty divisor is
/// vacuously covered, so every group qualifies.
pub fn division(
    dividend: &Relation,
    divisor: &Relation,
    provenance: &mut Provenance,
) -> EngineResult<Outcome> {
    let divisor_names: Vec<String> = divisor.schema.column_names();
    let mut divisor_indexes = Vec::with_capacity(divisor_names.len());
    for name in &divisor_names {
        match dividend.schema.index_of(name) {
            Some(index) => divisor_indexes.push(index),
            None => {
                return Err(EngineError::Arity(format!(
                    "divisor column {} missing from dividend schema",
                    name
                )))
            }
        }
    }

    let quotient_indexes: Vec<usize> = (0..dividend.schema.arity())
        .filter(|index| !divisor_indexes.contains(index))
        .collect();
    let quotient_columns: Vec<_> = quotient_indexes
        .iter()
        .map(|&index| dividend.schema.column(index).clone())
        .collect();
    let schema = Schema::new(quotient_columns)?;

    // group dividend rows by quotient key, preserving first-appearance order
    let mut order: Vec<RowKey> = Vec::new();
    let mut groups: HashMap<RowKey, Group> = HashMap::new();
    for (row, row_id) in dividend.rows.iter().zip(dividend.row_ids.iter()) {
        let key = RowKey::project(row, &quotient_indexes);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group {
                quotient: quotient_indexes.iter().map(|&i| row[i].clone()).collect(),
                observed: HashSet::new(),
                members: Vec::new(),
            }
        });
        group.observed.insert(RowKey::project(row, &divisor_indexes));
        group.members.push(*row_id);
    }

    let required: Vec<RowKey> = divisor.rows.iter().map(|row| RowKey::of(row)).collect();

    let mut rows = Vec::new();
    let mut row_ids = Vec::new();
    for key in &order {
        let group = &groups[key];
        if required.iter().all(|needed| group.observed.contains(needed)) {
            rows.push(group.quotient.clone());
            row_ids.push(provenance.derive(Operator::Division, group.members.clone()));
        }
    }

    let quotient_names = schema.column_names();
    let result = Relation::create(
        format!("{}÷{}", dividend.name, divisor.name),
        schema,
        rows,
        row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Division,
        highlight_rows: row_ids,
        highlight_columns: Vec::new(),
        diff: None,
        details: OutcomeDetails::Division {
            dividend: dividend.name.clone(),
            divisor: divisor.name.clone(),
            quotient_columns: quotient_names,
        },
    })
}

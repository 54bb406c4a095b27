//! Rename: schema-only column rewrite.

use crate::algebra::{Operator, Outcome, OutcomeDetails};
use crate::error::EngineResult;
use crate::relation::{Column, Relation, Schema};
use std::collections::BTreeMap;

/// Rewrite column names through `renames`; rows and ids are untouched.
///
/// A rename that collides with an existing column is caught by schema
/// validation.
pub fn rename(relation: &Relation, renames: &BTreeMap<String, String>) -> EngineResult<Outcome> {
    let columns = relation
        .schema
        .iter()
        .map(|column| {
            let name = renames
                .get(&column.name)
                .cloned()
                .unwrap_or_else(|| column.name.clone());
            Column::new(name, column.data_type)
        })
        .collect();
    let schema = Schema::new(columns)?;

    let result = Relation::create(
        relation.name.clone(),
        schema,
        relation.rows.clone(),
        relation.row_ids.clone(),
    )?;

    Ok(Outcome {
        relation: result,
        operation: Operator::Rename,
        highlight_rows: Vec::new(),
        highlight_columns: renames.values().cloned().collect(),
        diff: None,
        details: OutcomeDetails::Rename {
            renames: renames.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::relation::{DataType, Provenance, Value};

    fn departments(prov: &mut Provenance) -> Relation {
        let schema = Schema::new(vec![
            Column::new("DeptID", DataType::Int),
            Column::new("DeptName", DataType::Text),
        ])
        .unwrap();
        let rows = vec![vec![Value::Int(10), Value::Text("Research".into())]];
        let ids = (0..rows.len()).map(|i| prov.base("Department", i)).collect();
        Relation::create("Department", schema, rows, ids).unwrap()
    }

    #[test]
    fn test_rename_rewrites_schema_only() -> EngineResult<()> {
        let mut prov = Provenance::new();
        let relation = departments(&mut prov);
        let mut renames = BTreeMap::new();
        renames.insert("DeptID".to_string(), "ID".to_string());

        let outcome = rename(&relation, &renames)?;
        assert_eq!(
            outcome.relation.schema.column_names(),
            vec!["ID", "DeptName"]
        );
        assert_eq!(outcome.relation.rows, relation.rows);
        assert_eq!(outcome.relation.row_ids, relation.row_ids);
        Ok(())
    }

    #[test]
    fn test_rename_collision_rejected() {
        let mut prov = Provenance::new();
        let relation = departments(&mut prov);
        let mut renames = BTreeMap::new();
        renames.insert("DeptID".to_string(), "DeptName".to_string());
        assert!(matches!(
            rename(&relation, &renames),
            Err(EngineError::Schema(_))
        ));
    }
}

//! Relation catalog: the named datasets expressions evaluate against.
//!
//! The catalog holds raw schema + rows as supplied by the caller (seed
//! data, CSV import, …). Type checking happens when a relation is
//! resolved, which also mints base provenance ids for every row.

use crate::error::{EngineError, EngineResult};
use crate::relation::{Column, DataType, Provenance, Relation, Schema, Value};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw relation data as supplied by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRelation {
    pub name: String,
    pub schema: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl StoredRelation {
    pub fn new(name: impl Into<String>, schema: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            schema,
            rows,
        }
    }
}

/// Mapping from relation name to stored data
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    relations: BTreeMap<String, StoredRelation>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stored: StoredRelation) {
        self.relations.insert(stored.name.clone(), stored);
    }

    pub fn get(&self, name: &str) -> Option<&StoredRelation> {
        self.relations.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(|name| name.as_str())
    }

    /// Resolve a name to a live relation with freshly minted base row ids
    pub fn resolve(&self, name: &str, provenance: &mut Provenance) -> EngineResult<Relation> {
        let stored = self
            .relations
            .get(name)
            .ok_or_else(|| EngineError::UnknownRelation(name.to_string()))?;
        debug!("resolving relation {} ({} rows)", name, stored.rows.len());

        let schema = Schema::new(stored.schema.clone())?;
        let row_ids = (0..stored.rows.len())
            .map(|index| provenance.base(&stored.name, index))
            .collect();
        Relation::create(stored.name.clone(), schema, stored.rows.clone(), row_ids)
    }

    /// The demo catalog used by the playground UI
    pub fn seed() -> Self {
        let mut catalog = Catalog::new();
        catalog.insert(StoredRelation::new(
            "Employee",
            vec![
                Column::new("EmpID", DataType::Int),
                Column::new("Name", DataType::Text),
                Column::new("Salary", DataType::Int),
                Column::new("DeptID", DataType::Int),
            ],
            vec![
                vec![1.into(), "Ada".into(), 2000.into(), 1.into()],
                vec![2.into(), "Grace".into(), 5000.into(), 1.into()],
                vec![3.into(), "Alan".into(), 4500.into(), 2.into()],
                vec![4.into(), "Edsger".into(), 3500.into(), 3.into()],
            ],
        ));
        catalog.insert(StoredRelation::new(
            "Department",
            vec![
                Column::new("DeptID", DataType::Int),
                Column::new("DeptName", DataType::Text),
            ],
            vec![
                vec![1.into(), "Research".into()],
                vec![2.into(), "Design".into()],
                vec![3.into(), "Infrastructure".into()],
            ],
        ));
        catalog.insert(StoredRelation::new(
            "Project",
            vec![
                Column::new("ProjID", DataType::Int),
                Column::new("Title", DataType::Text),
                Column::new("DeptID", DataType::Int),
            ],
            vec![
                vec![201.into(), "Atlas".into(), 1.into()],
                vec![202.into(), "Borealis".into(), 2.into()],
            ],
        ));
        catalog.insert(StoredRelation::new(
            "Assignment",
            vec![
                Column::new("EmpID", DataType::Int),
                Column::new("ProjID", DataType::Int),
            ],
            vec![
                vec![1.into(), 201.into()],
                vec![1.into(), 202.into()],
                vec![2.into(), 201.into()],
                vec![3.into(), 202.into()],
            ],
        ));
        catalog
    }
}

//! Relational algebra operators.
//!
//! Each operator is a pure function from input relations to an `Outcome`:
//! the result relation plus the highlighting, diff and detail metadata the
//! pipeline canvas renders. Inputs are never mutated; operators that mint
//! new row identities take the provenance arena.

pub mod division;
pub mod join;
pub mod product;
pub mod projection;
pub mod rename;
pub mod selection;
pub mod set_ops;

pub use division::division;
pub use join::join;
pub use product::product;
pub use projection::projection;
pub use rename::rename;
pub use selection::selection;
pub use set_ops::{difference, intersection, union};

use crate::relation::{Relation, RowId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The node kinds understood by both evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "dataset")]
    Dataset,
    #[serde(rename = "σ")]
    Selection,
    #[serde(rename = "π")]
    Projection,
    #[serde(rename = "ρ")]
    Rename,
    #[serde(rename = "∪")]
    Union,
    #[serde(rename = "∩")]
    Intersection,
    #[serde(rename = "−")]
    Difference,
    #[serde(rename = "×")]
    Product,
    #[serde(rename = "⋈")]
    Join,
    #[serde(rename = "÷")]
    Division,
}

impl Operator {
    /// The UI symbol for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Dataset => "dataset",
            Operator::Selection => "σ",
            Operator::Projection => "π",
            Operator::Rename => "ρ",
            Operator::Union => "∪",
            Operator::Intersection => "∩",
            Operator::Difference => "−",
            Operator::Product => "×",
            Operator::Join => "⋈",
            Operator::Division => "÷",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "dataset" => Some(Operator::Dataset),
            "σ" => Some(Operator::Selection),
            "π" => Some(Operator::Projection),
            "ρ" => Some(Operator::Rename),
            "∪" => Some(Operator::Union),
            "∩" => Some(Operator::Intersection),
            "−" => Some(Operator::Difference),
            "×" => Some(Operator::Product),
            "⋈" => Some(Operator::Join),
            "÷" => Some(Operator::Division),
            _ => None,
        }
    }

    /// How many input relations the operator consumes
    pub fn arity(&self) -> usize {
        match self {
            Operator::Dataset => 0,
            Operator::Selection | Operator::Projection | Operator::Rename => 1,
            Operator::Union
            | Operator::Intersection
            | Operator::Difference
            | Operator::Product
            | Operator::Join
            | Operator::Division => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One projected column with an optional output alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// The column name in the output schema
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Row or column counts changed by an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeDiff {
    Rows { kept: usize, removed: usize },
    Columns { input: usize, output: usize },
}

/// Operator-specific metadata for the UI
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeDetails {
    Dataset,
    Selection {
        predicate: String,
    },
    Projection {
        columns: Vec<String>,
    },
    Rename {
        renames: BTreeMap<String, String>,
    },
    SetOp {
        left: String,
        right: String,
        left_rows: usize,
        right_rows: usize,
    },
    Product {
        left: String,
        right: String,
    },
    Join {
        left: String,
        right: String,
        keys: Vec<String>,
        matched_pairs: Vec<(RowId, RowId)>,
    },
    Division {
        dividend: String,
        divisor: String,
        quotient_columns: Vec<String>,
    },
}

/// Result of applying one operator
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub relation: Relation,
    pub operation: Operator,
    pub highlight_rows: Vec<RowId>,
    pub highlight_columns: Vec<String>,
    pub diff: Option<OutcomeDiff>,
    pub details: OutcomeDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for op in [
            Operator::Dataset,
            Operator::Selection,
            Operator::Projection,
            Operator::Rename,
            Operator::Union,
            Operator::Intersection,
            Operator::Difference,
            Operator::Product,
            Operator::Join,
            Operator::Division,
        ] {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol("nope"), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(Operator::Dataset.arity(), 0);
        assert_eq!(Operator::Selection.arity(), 1);
        assert_eq!(Operator::Join.arity(), 2);
    }

    #[test]
    fn test_column_spec_output_name() {
        assert_eq!(ColumnSpec::new("DeptID").output_name(), "DeptID");
        assert_eq!(ColumnSpec::aliased("DeptID", "Team").output_name(), "Team");
    }
}

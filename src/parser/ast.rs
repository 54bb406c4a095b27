//! Expression AST for the algebra DSL.

use crate::algebra::{ColumnSpec, Operator};
use std::collections::BTreeMap;

/// Parsed relational algebra expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Named relation leaf
    Relation { name: String },

    /// Row filter with a raw condition string
    Selection { source: Box<Expr>, condition: String },

    /// Column subset with optional aliases
    Projection {
        source: Box<Expr>,
        columns: Vec<ColumnSpec>,
    },

    /// Column renames
    Rename {
        source: Box<Expr>,
        renames: BTreeMap<String, String>,
    },

    Union { left: Box<Expr>, right: Box<Expr> },

    Intersection { left: Box<Expr>, right: Box<Expr> },

    Difference { left: Box<Expr>, right: Box<Expr> },

    Product { left: Box<Expr>, right: Box<Expr> },

    /// Equi-join with a raw condition string
    Join {
        left: Box<Expr>,
        right: Box<Expr>,
        condition: String,
    },

    Division { left: Box<Expr>, right: Box<Expr> },
}

impl Expr {
    /// The operator this node maps to
    pub fn operator(&self) -> Operator {
        match self {
            Expr::Relation { .. } => Operator::Dataset,
            Expr::Selection { .. } => Operator::Selection,
            Expr::Projection { .. } => Operator::Projection,
            Expr::Rename { .. } => Operator::Rename,
            Expr::Union { .. } => Operator::Union,
            Expr::Intersection { .. } => Operator::Intersection,
            Expr::Difference { .. } => Operator::Difference,
            Expr::Product { .. } => Operator::Product,
            Expr::Join { .. } => Operator::Join,
            Expr::Division { .. } => Operator::Division,
        }
    }
}

//! Predicate engine for selection and join conditions.
//!
//! A raw condition string is tokenized, parsed into a small boolean AST and
//! bound against a relation schema up front, producing a reusable
//! `Predicate` that evaluates one row at a time.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::PredicateExpr;
pub use token::{CompareOp, Token};

use crate::error::{EngineError, EngineResult};
use crate::relation::{Schema, Value};
use std::collections::HashMap;

/// A compiled, schema-bound condition
#[derive(Debug, Clone)]
pub struct Predicate {
    expr: Option<PredicateExpr>,
    bindings: HashMap<String, usize>,
    sql: String,
}

impl Predicate {
    /// Compile a condition against a schema.
    ///
    /// An empty condition is always true and renders as `1 = 1`. Unknown
    /// columns fail here, before any row is scanned.
    pub fn build(condition: &str, schema: &Schema) -> EngineResult<Self> {
        let trimmed = condition.trim();
        if trimmed.is_empty() {
            return Ok(Self {
                expr: None,
                bindings: HashMap::new(),
                sql: "1 = 1".to_string(),
            });
        }

        let tokens = lexer::Lexer::new(trimmed).tokenize()?;
        let expr = parser::Parser::new(tokens).parse()?;
        let bindings = eval::bind_columns(&expr, schema)?;
        Ok(Self {
            expr: Some(expr),
            bindings,
            sql: trimmed.to_string(),
        })
    }

    /// The raw condition text, suitable for SQL rendering
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Evaluate the predicate over one row
    pub fn matches(&self, row: &[Value]) -> EngineResult<bool> {
        let expr = match &self.expr {
            Some(expr) => expr,
            None => return Ok(true),
        };
        match eval::evaluate(expr, &self.bindings, row)? {
            Value::Bool(result) => Ok(result),
            other => Err(EngineError::TypeMismatch(format!(
                "condition must evaluate to a boolean, got {}",
                other.data_type()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{Column, DataType};

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("EmpID", DataType::Int),
            Column::new("Name", DataType::Text),
            Column::new("Salary", DataType::Int),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_condition_is_always_true() -> EngineResult<()> {
        let predicate = Predicate::build("   ", &schema())?;
        assert_eq!(predicate.sql(), "1 = 1");
        assert!(predicate.matches(&[
            Value::Int(1),
            Value::Text("Ada".into()),
            Value::Int(2000)
        ])?);
        Ok(())
    }

    #[test]
    fn test_sql_is_raw_condition() -> EngineResult<()> {
        let predicate = Predicate::build(" Salary > 3000 ", &schema())?;
        assert_eq!(predicate.sql(), "Salary > 3000");
        Ok(())
    }

    #[test]
    fn test_matches_rows() -> EngineResult<()> {
        let predicate = Predicate::build("Salary > 3000 AND Name != 'Alan'", &schema())?;
        assert!(predicate.matches(&[
            Value::Int(2),
            Value::Text("Grace".into()),
            Value::Int(5000)
        ])?);
        assert!(!predicate.matches(&[
            Value::Int(3),
            Value::Text("Alan".into()),
            Value::Int(6000)
        ])?);
        assert!(!predicate.matches(&[
            Value::Int(1),
            Value::Text("Ada".into()),
            Value::Int(2000)
        ])?);
        Ok(())
    }

    #[test]
    fn test_unknown_column_fails_at_build_time() {
        let err = Predicate::build("Wage > 3000", &schema()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownColumn { .. }));
    }

    #[test]
    fn test_bare_column_must_be_boolean() -> EngineResult<()> {
        let flags = Schema::new(vec![Column::new("active", DataType::Bool)]).unwrap();
        let predicate = Predicate::build("active", &flags)?;
        assert!(predicate.matches(&[Value::Bool(true)])?);
        assert!(!predicate.matches(&[Value::Bool(false)])?);

        let numbers = Predicate::build("EmpID", &schema())?;
        assert!(numbers.matches(&[Value::Int(1)]).is_err());
        Ok(())
    }

    #[test]
    fn test_not_precedence() -> EngineResult<()> {
        let flags = Schema::new(vec![
            Column::new("a", DataType::Bool),
            Column::new("b", DataType::Bool),
        ])
        .unwrap();
        // NOT a AND b == (NOT a) AND b
        let predicate = Predicate::build("NOT a AND b", &flags)?;
        assert!(predicate.matches(&[Value::Bool(false), Value::Bool(true)])?);
        assert!(!predicate.matches(&[Value::Bool(true), Value::Bool(true)])?);
        Ok(())
    }
}

//! Predicate evaluation against relation rows.

use crate::error::{EngineError, EngineResult};
use crate::predicate::ast::PredicateExpr;
use crate::predicate::token::CompareOp;
use crate::relation::{Schema, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Resolve an identifier to a column index.
///
/// Exact schema name first; then the bracket form `a[0]` normalized to
/// `a.0`; finally a suffix match on the last dot-segment, which tolerates
/// the prefixed compound names produced by joins and products.
pub fn resolve_identifier(schema: &Schema, identifier: &str) -> EngineResult<usize> {
    if let Some(index) = schema.index_of(identifier) {
        return Ok(index);
    }

    let normalized = identifier.replace('[', ".").replace(']', "");
    if normalized != identifier {
        if let Some(index) = schema.index_of(&normalized) {
            return Ok(index);
        }
    }

    let last_segment = normalized.rsplit('.').next().unwrap_or(&normalized);
    if let Some(index) = schema
        .columns()
        .iter()
        .position(|column| column.name.ends_with(last_segment))
    {
        return Ok(index);
    }

    Err(EngineError::unknown_column(identifier, "condition"))
}

/// Bind every identifier in the expression against the schema.
///
/// Runs at predicate build time so an unknown column fails before any row
/// is scanned.
pub fn bind_columns(
    expr: &PredicateExpr,
    schema: &Schema,
) -> EngineResult<HashMap<String, usize>> {
    let mut bindings = HashMap::new();
    for name in expr.column_names() {
        let index = resolve_identifier(schema, &name)?;
        bindings.insert(name, index);
    }
    Ok(bindings)
}

/// Evaluate the expression over one row
pub fn evaluate(
    expr: &PredicateExpr,
    bindings: &HashMap<String, usize>,
    row: &[Value],
) -> EngineResult<Value> {
    match expr {
        PredicateExpr::Literal(value) => Ok(value.clone()),
        PredicateExpr::Column(name) => {
            let index = bindings.get(name).copied().ok_or_else(|| {
                EngineError::unknown_column(name.clone(), "condition")
            })?;
            Ok(row[index].clone())
        }
        PredicateExpr::Comparison { op, left, right } => {
            let left = evaluate(left, bindings, row)?;
            let right = evaluate(right, bindings, row)?;
            let ordering = left.compare(&right)?;
            let result = match op {
                CompareOp::Eq => ordering == Ordering::Equal,
                CompareOp::Ne => ordering != Ordering::Equal,
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Ge => ordering != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        PredicateExpr::And { left, right } => {
            let left = expect_bool(evaluate(left, bindings, row)?, "AND")?;
            if !left {
                return Ok(Value::Bool(false));
            }
            let right = expect_bool(evaluate(right, bindings, row)?, "AND")?;
            Ok(Value::Bool(right))
        }
        PredicateExpr::Or { left, right } => {
            let left = expect_bool(evaluate(left, bindings, row)?, "OR")?;
            if left {
                return Ok(Value::Bool(true));
            }
            let right = expect_bool(evaluate(right, bindings, row)?, "OR")?;
            Ok(Value::Bool(right))
        }
        PredicateExpr::Not { operand } => {
            let value = expect_bool(evaluate(operand, bindings, row)?, "NOT")?;
            Ok(Value::Bool(!value))
        }
    }
}

fn expect_bool(value: Value, context: &str) -> EngineResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EngineError::TypeMismatch(format!(
            "{} operand must be boolean, got {}",
            context,
            other.data_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{Column, DataType};

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("Employee.DeptID", DataType::Int),
            Column::new("Salary", DataType::Int),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_exact() {
        assert_eq!(resolve_identifier(&schema(), "Salary").unwrap(), 1);
    }

    #[test]
    fn test_resolve_suffix() {
        // bare DeptID resolves to the join-prefixed column
        assert_eq!(resolve_identifier(&schema(), "DeptID").unwrap(), 0);
        assert_eq!(
            resolve_identifier(&schema(), "Employee.DeptID").unwrap(),
            0
        );
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(matches!(
            resolve_identifier(&schema(), "Missing"),
            Err(EngineError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_comparison_result() {
        let expr = PredicateExpr::Comparison {
            op: CompareOp::Gt,
            left: Box::new(PredicateExpr::Column("Salary".to_string())),
            right: Box::new(PredicateExpr::Literal(Value::Int(3000))),
        };
        let bindings = bind_columns(&expr, &schema()).unwrap();
        let row = vec![Value::Int(10), Value::Int(5000)];
        assert_eq!(
            evaluate(&expr, &bindings, &row).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_logical_operands_must_be_boolean() {
        let expr = PredicateExpr::And {
            left: Box::new(PredicateExpr::Literal(Value::Int(1))),
            right: Box::new(PredicateExpr::Literal(Value::Bool(true))),
        };
        let bindings = HashMap::new();
        assert!(matches!(
            evaluate(&expr, &bindings, &[]),
            Err(EngineError::TypeMismatch(_))
        ));
    }
}

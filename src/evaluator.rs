//! Tree evaluator for parsed expressions.
//!
//! Walks the AST bottom-up, resolving relation leaves against the catalog
//! and applying the algebra operators, threading the result relation, the
//! translator-built SQL and the per-operator outcome up through each node.
//! Also lowers an AST into the flat pipeline form the canvas edits.

use crate::algebra::{self, ColumnSpec, Operator, Outcome};
use crate::catalog::Catalog;
use crate::error::EngineResult;
use crate::parser::Expr;
use crate::pipeline::PipelineNode;
use crate::predicate::Predicate;
use crate::relation::{Provenance, Relation};
use crate::sql;
use log::debug;
use std::collections::HashMap;

/// Result of evaluating one AST node, with its child evaluations
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub relation: Relation,
    pub sql: String,
    pub operator: Operator,
    /// Operator metadata; absent on dataset leaves
    pub outcome: Option<Outcome>,
    pub inputs: Vec<Evaluation>,
}

/// Evaluate an expression against a catalog
pub fn evaluate_ast(
    expr: &Expr,
    catalog: &Catalog,
    provenance: &mut Provenance,
) -> EngineResult<Evaluation> {
    match expr {
        Expr::Relation { name } => {
            let relation = catalog.resolve(name, provenance)?;
            Ok(Evaluation {
                relation,
                sql: sql::relation_to_sql(name),
                operator: Operator::Dataset,
                outcome: None,
                inputs: Vec::new(),
            })
        }
        Expr::Selection { source, condition } => {
            let source = evaluate_ast(source, catalog, provenance)?;
            let predicate = Predicate::build(condition, &source.relation.schema)?;
            let outcome = algebra::selection(&source.relation, &predicate)?;
            let sql = sql::selection_to_sql(&source.sql, predicate.sql());
            Ok(wrap(outcome, sql, vec![source]))
        }
        Expr::Projection { source, columns } => {
            let source = evaluate_ast(source, catalog, provenance)?;
            // an empty column list projects every source column
            let columns = if columns.is_empty() {
                source
                    .relation
                    .schema
                    .column_names()
                    .into_iter()
                    .map(ColumnSpec::new)
                    .collect()
            } else {
                columns.clone()
            };
            let outcome = algebra::projection(&source.relation, &columns, provenance)?;
            let sql = sql::projection_to_sql(&source.sql, &columns);
            Ok(wrap(outcome, sql, vec![source]))
        }
        Expr::Rename { source, renames } => {
            let source = evaluate_ast(source, catalog, provenance)?;
            let outcome = algebra::rename(&source.relation, renames)?;
            let sql = sql::rename_to_sql(&source.sql, renames);
            Ok(wrap(outcome, sql, vec![source]))
        }
        Expr::Union { left, right } => {
            let left = evaluate_ast(left, catalog, provenance)?;
            let right = evaluate_ast(right, catalog, provenance)?;
            let outcome = algebra::union(&left.relation, &right.relation)?;
            let sql = sql::set_operator_sql(&left.sql, &right.sql, "UNION");
            Ok(wrap(outcome, sql, vec![left, right]))
        }
        Expr::Intersection { left, right } => {
            let left = evaluate_ast(left, catalog, provenance)?;
            let right = evaluate_ast(right, catalog, provenance)?;
            let outcome = algebra::intersection(&left.relation, &right.relation, provenance)?;
            let sql = sql::set_operator_sql(&left.sql, &right.sql, "INTERSECT");
            Ok(wrap(outcome, sql, vec![left, right]))
        }
        Expr::Difference { left, right } => {
            let left = evaluate_ast(left, catalog, provenance)?;
            let right = evaluate_ast(right, catalog, provenance)?;
            let outcome = algebra::difference(&left.relation, &right.relation, provenance)?;
            let sql = sql::set_operator_sql(&left.sql, &right.sql, "EXCEPT");
            Ok(wrap(outcome, sql, vec![left, right]))
        }
        Expr::Product { left, right } => {
            let left = evaluate_ast(left, catalog, provenance)?;
            let right = evaluate_ast(right, catalog, provenance)?;
            let outcome = algebra::product(&left.relation, &right.relation, provenance)?;
            let sql = sql::product_to_sql(&left.sql, &right.sql);
            Ok(wrap(outcome, sql, vec![left, right]))
        }
        Expr::Join {
            left,
            right,
            condition,
        } => {
            let left = evaluate_ast(left, catalog, provenance)?;
            let right = evaluate_ast(right, catalog, provenance)?;
            let keys = sql::parse_join_keys(condition)?;
            let outcome = algebra::join(&left.relation, &right.relation, &keys, provenance)?;
            let sql = sql::join_to_sql(&left.sql, &right.sql, condition)?;
            Ok(wrap(outcome, sql, vec![left, right]))
        }
        Expr::Division { left, right } => {
            let left = evaluate_ast(left, catalog, provenance)?;
            let right = evaluate_ast(right, catalog, provenance)?;
            let outcome = algebra::division(&left.relation, &right.relation, provenance)?;
            let quotient = outcome.relation.schema.column_names();
            let sql = sql::division_to_sql(&left.sql, &right.sql, &quotient);
            Ok(wrap(outcome, sql, vec![left, right]))
        }
    }
}

fn wrap(outcome: Outcome, sql: String, inputs: Vec<Evaluation>) -> Evaluation {
    debug!(
        "{} produced {} rows",
        outcome.operation,
        outcome.relation.rows.len()
    );
    Evaluation {
        relation: outcome.relation.clone(),
        sql,
        operator: outcome.operation,
        outcome: Some(outcome),
        inputs,
    }
}

/// Lower an AST into the flat pipeline node list.
///
/// Post-order traversal; relation leaves are deduplicated into shared
/// dataset nodes by source name, so evaluating the result through the
/// pipeline executor reproduces the tree evaluation.
pub fn ast_to_pipeline(expr: &Expr) -> Vec<PipelineNode> {
    let mut lowering = Lowering {
        nodes: Vec::new(),
        datasets: HashMap::new(),
        counter: 0,
    };
    lowering.visit(expr);
    lowering.nodes
}

struct Lowering {
    nodes: Vec<PipelineNode>,
    datasets: HashMap<String, String>,
    counter: usize,
}

impl Lowering {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("node-{}", self.counter)
    }

    fn visit(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Relation { name } => {
                if let Some(id) = self.datasets.get(name) {
                    return id.clone();
                }
                let id = self.next_id();
                self.nodes.push(PipelineNode::dataset(id.clone(), name.clone()));
                self.datasets.insert(name.clone(), id.clone());
                id
            }
            Expr::Selection { source, condition } => {
                let input = self.visit(source);
                let id = self.next_id();
                self.nodes.push(
                    PipelineNode::new(id.clone(), Operator::Selection, vec![input])
                        .with_condition(condition.clone()),
                );
                id
            }
            Expr::Projection { source, columns } => {
                let input = self.visit(source);
                let id = self.next_id();
                self.nodes.push(
                    PipelineNode::new(id.clone(), Operator::Projection, vec![input])
                        .with_columns(columns.clone()),
                );
                id
            }
            Expr::Rename { source, renames } => {
                let input = self.visit(source);
                let id = self.next_id();
                self.nodes.push(
                    PipelineNode::new(id.clone(), Operator::Rename, vec![input])
                        .with_renames(renames.clone()),
                );
                id
            }
            Expr::Union { left, right }
            | Expr::Intersection { left, right }
            | Expr::Difference { left, right }
            | Expr::Product { left, right }
            | Expr::Division { left, right } => {
                let left_id = self.visit(left);
                let right_id = self.visit(right);
                let id = self.next_id();
                self.nodes.push(PipelineNode::new(
                    id.clone(),
                    expr.operator(),
                    vec![left_id, right_id],
                ));
                id
            }
            Expr::Join {
                left,
                right,
                condition,
            } => {
                let left_id = self.visit(left);
                let right_id = self.visit(right);
                let id = self.next_id();
                self.nodes.push(
                    PipelineNode::new(id.clone(), Operator::Join, vec![left_id, right_id])
                        .with_condition(condition.clone()),
                );
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use crate::relation::Value;

    fn evaluate(input: &str) -> EngineResult<Evaluation> {
        let catalog = Catalog::seed();
        let mut prov = Provenance::new();
        evaluate_ast(&parse_expression(input)?, &catalog, &mut prov)
    }

    #[test]
    fn test_selection_projection_pipeline_sql() -> EngineResult<()> {
        let evaluation = evaluate("π_{EmpID,Name}(σ_{Salary > 3000}(Employee))")?;
        assert_eq!(
            evaluation.relation.rows,
            vec![
                vec![Value::Int(2), Value::Text("Grace".into())],
                vec![Value::Int(3), Value::Text("Alan".into())],
                vec![Value::Int(4), Value::Text("Edsger".into())],
            ]
        );
        assert_eq!(
            evaluation.sql,
            "SELECT DISTINCT EmpID, Name FROM (SELECT * FROM Employee WHERE Salary > 3000)"
        );
        Ok(())
    }

    #[test]
    fn test_unknown_relation() {
        assert!(matches!(
            evaluate("σ_{Salary > 0}(Nobody)"),
            Err(crate::error::EngineError::UnknownRelation(_))
        ));
    }

    #[test]
    fn test_union_sql_and_rows() -> EngineResult<()> {
        let evaluation = evaluate("σ_{DeptID = 1}(Employee) ∪ σ_{DeptID = 2}(Employee)")?;
        assert_eq!(evaluation.relation.rows.len(), 3);
        assert!(evaluation.sql.contains("UNION"));
        assert_eq!(evaluation.operator, Operator::Union);
        Ok(())
    }

    #[test]
    fn test_division_expression() -> EngineResult<()> {
        let evaluation = evaluate("π_{EmpID}(Assignment ÷ π_{ProjID}(Project))")?;
        assert_eq!(evaluation.relation.rows, vec![vec![Value::Int(1)]]);
        Ok(())
    }

    #[test]
    fn test_evaluation_keeps_inputs() -> EngineResult<()> {
        let evaluation = evaluate("σ_{Salary > 3000}(Employee)")?;
        assert_eq!(evaluation.inputs.len(), 1);
        assert_eq!(evaluation.inputs[0].operator, Operator::Dataset);
        assert_eq!(evaluation.inputs[0].sql, "SELECT * FROM Employee");
        Ok(())
    }

    #[test]
    fn test_ast_to_pipeline_shapes() -> EngineResult<()> {
        let ast = parse_expression("π_{EmpID}(σ_{Salary > 4000}(Employee))")?;
        let nodes = ast_to_pipeline(&ast);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].op, Operator::Dataset);
        assert_eq!(nodes[0].source.as_deref(), Some("Employee"));
        assert_eq!(nodes[1].op, Operator::Selection);
        assert_eq!(nodes[1].input_ids, vec!["node-1"]);
        assert_eq!(nodes[2].op, Operator::Projection);
        assert_eq!(nodes[2].input_ids, vec!["node-2"]);
        Ok(())
    }

    #[test]
    fn test_ast_to_pipeline_deduplicates_datasets() -> EngineResult<()> {
        let ast = parse_expression("σ_{DeptID = 1}(Employee) ∪ σ_{DeptID = 2}(Employee)")?;
        let nodes = ast_to_pipeline(&ast);
        let datasets: Vec<_> = nodes
            .iter()
            .filter(|node| node.op == Operator::Dataset)
            .collect();
        assert_eq!(datasets.len(), 1);
        // both selections reference the shared dataset node
        let selections: Vec<_> = nodes
            .iter()
            .filter(|node| node.op == Operator::Selection)
            .collect();
        assert_eq!(selections[0].input_ids, selections[1].input_ids);
        Ok(())
    }
}

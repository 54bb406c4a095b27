//! Engine facade tying the catalog, parser, evaluators and provenance
//! arena together behind one entry point.

use crate::catalog::Catalog;
use crate::error::EngineResult;
use crate::evaluator::{self, Evaluation};
use crate::parser::{parse_expression, Expr};
use crate::pipeline::{self, NodeResult, PipelineNode};
use crate::relation::Provenance;

/// A catalog plus the provenance arena shared by its evaluations
#[derive(Debug, Default)]
pub struct Engine {
    catalog: Catalog,
    provenance: Provenance,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            provenance: Provenance::new(),
        }
    }

    /// Engine over the playground's demo catalog
    pub fn with_seed_catalog() -> Self {
        Self::new(Catalog::seed())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Parse and evaluate an expression in either notation
    pub fn run_expression(&mut self, input: &str) -> EngineResult<Evaluation> {
        let ast = parse_expression(input)?;
        self.run_ast(&ast)
    }

    pub fn run_ast(&mut self, ast: &Expr) -> EngineResult<Evaluation> {
        evaluator::evaluate_ast(ast, &self.catalog, &mut self.provenance)
    }

    /// Evaluate a UI-edited pipeline, capturing errors per node
    pub fn run_pipeline(&mut self, nodes: &[PipelineNode]) -> Vec<NodeResult> {
        pipeline::evaluate_pipeline(nodes, &self.catalog, &mut self.provenance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ast_to_pipeline;
    use crate::relation::Value;

    #[test]
    fn test_expression_and_pipeline_agree() -> EngineResult<()> {
        let input = "π_{EmpID}(σ_{Salary > 3000}(Employee))";

        let mut engine = Engine::with_seed_catalog();
        let direct = engine.run_expression(input)?;

        let ast = parse_expression(input)?;
        let nodes = ast_to_pipeline(&ast);
        let results = engine.run_pipeline(&nodes);
        let last = results.last().unwrap();

        assert!(last.error.is_none());
        let piped = last.relation.as_ref().unwrap();
        assert_eq!(piped.rows, direct.relation.rows);
        assert_eq!(
            piped.schema.column_names(),
            direct.relation.schema.column_names()
        );
        Ok(())
    }

    #[test]
    fn test_provenance_accumulates_across_runs() -> EngineResult<()> {
        let mut engine = Engine::with_seed_catalog();
        engine.run_expression("σ_{DeptID = 1}(Employee)")?;
        let after_first = engine.provenance().len();
        engine.run_expression("Department")?;
        assert!(engine.provenance().len() > after_first);
        Ok(())
    }

    #[test]
    fn test_run_expression_rows() -> EngineResult<()> {
        let mut engine = Engine::with_seed_catalog();
        let evaluation = engine.run_expression("σ_{DeptName = 'Design'}(Department)")?;
        assert_eq!(
            evaluation.relation.rows,
            vec![vec![Value::Int(2), Value::Text("Design".into())]]
        );
        Ok(())
    }
}

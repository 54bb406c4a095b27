//! Flat pipeline executor for the graph-editing canvas.
//!
//! The UI owns an ordered list of nodes wired together by id. Nodes are
//! evaluated strictly in list order; a node may only reference inputs that
//! already produced output. Unlike the tree evaluator, a node failure is
//! recorded on that node's result instead of propagating, so the rest of
//! an edited pipeline stays inspectable.

use crate::algebra::{self, ColumnSpec, Operator, Outcome, OutcomeDetails};
use crate::catalog::Catalog;
use crate::error::{EngineError, EngineResult};
use crate::predicate::Predicate;
use crate::relation::{relation_diff, relation_summary, Provenance, Relation, RelationDiff, RelationSummary};
use crate::sql;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// One UI-owned pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineNode {
    pub id: String,
    #[serde(rename = "type")]
    pub op: Operator,
    /// Dataset nodes: the catalog relation to load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub input_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnSpec>>,
    #[serde(default, rename = "renameMap", skip_serializing_if = "Option::is_none")]
    pub renames: Option<BTreeMap<String, String>>,
}

impl PipelineNode {
    pub fn new(id: impl Into<String>, op: Operator, input_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            op,
            source: None,
            input_ids,
            condition: None,
            columns: None,
            renames: None,
        }
    }

    pub fn dataset(id: impl Into<String>, source: impl Into<String>) -> Self {
        let mut node = Self::new(id, Operator::Dataset, Vec::new());
        node.source = Some(source.into());
        node
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_renames(mut self, renames: BTreeMap<String, String>) -> Self {
        self.renames = Some(renames);
        self
    }
}

/// Result of evaluating one pipeline node
#[derive(Debug, Clone)]
pub struct NodeResult {
    pub id: String,
    pub op: Operator,
    pub relation: Option<Relation>,
    pub sql: String,
    pub outcome: Option<Outcome>,
    pub diff: Option<RelationDiff>,
    pub summary: Option<RelationSummary>,
    pub error: Option<EngineError>,
    pub inputs: Vec<String>,
}

/// Evaluate the node list in order, catching per-node errors
pub fn evaluate_pipeline(
    nodes: &[PipelineNode],
    catalog: &Catalog,
    provenance: &mut Provenance,
) -> Vec<NodeResult> {
    let mut results: Vec<NodeResult> = Vec::with_capacity(nodes.len());
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for node in nodes {
        debug!("evaluating pipeline node {} ({})", node.id, node.op);
        let result = match evaluate_node(node, &results, &by_id, catalog, provenance) {
            Ok((outcome, sql, diff)) => NodeResult {
                id: node.id.clone(),
                op: node.op,
                relation: Some(outcome.relation.clone()),
                sql,
                summary: Some(relation_summary(&outcome.relation)),
                diff: Some(diff),
                outcome: Some(outcome),
                error: None,
                inputs: node.input_ids.clone(),
            },
            Err(error) => NodeResult {
                id: node.id.clone(),
                op: node.op,
                relation: None,
                sql: String::new(),
                outcome: None,
                diff: None,
                summary: None,
                error: Some(error),
                inputs: node.input_ids.clone(),
            },
        };
        by_id.insert(node.id.clone(), results.len());
        results.push(result);
    }
    results
}

fn evaluate_node(
    node: &PipelineNode,
    results: &[NodeResult],
    by_id: &HashMap<String, usize>,
    catalog: &Catalog,
    provenance: &mut Provenance,
) -> EngineResult<(Outcome, String, RelationDiff)> {
    if node.op == Operator::Dataset {
        let source = node.source.as_deref().ok_or_else(|| {
            EngineError::Evaluation(format!("dataset node {} is missing a source", node.id))
        })?;
        let relation = catalog.resolve(source, provenance)?;
        let sql = sql::relation_to_sql(source);
        // dataset nodes always diff against nothing
        let diff = relation_diff(None, &relation);
        let outcome = Outcome {
            relation,
            operation: Operator::Dataset,
            highlight_rows: Vec::new(),
            highlight_columns: Vec::new(),
            diff: None,
            details: OutcomeDetails::Dataset,
        };
        return Ok((outcome, sql, diff));
    }

    let inputs = resolve_inputs(node, results, by_id)?;
    if inputs.len() != node.op.arity() {
        return Err(EngineError::Evaluation(format!(
            "{} node {} expects {} inputs, got {}",
            node.op,
            node.id,
            node.op.arity(),
            inputs.len()
        )));
    }

    let (outcome, sql) = match node.op {
        Operator::Selection => {
            let (relation, input_sql) = inputs[0];
            let condition = node.condition.as_deref().unwrap_or("");
            let predicate = Predicate::build(condition, &relation.schema)?;
            let outcome = algebra::selection(relation, &predicate)?;
            let sql = sql::selection_to_sql(input_sql, predicate.sql());
            (outcome, sql)
        }
        Operator::Projection => {
            let (relation, input_sql) = inputs[0];
            let columns = match &node.columns {
                Some(columns) if !columns.is_empty() => columns.clone(),
                _ => relation
                    .schema
                    .column_names()
                    .into_iter()
                    .map(ColumnSpec::new)
                    .collect(),
            };
            let outcome = algebra::projection(relation, &columns, provenance)?;
            let sql = sql::projection_to_sql(input_sql, &columns);
            (outcome, sql)
        }
        Operator::Rename => {
            let (relation, input_sql) = inputs[0];
            let renames = node.renames.clone().unwrap_or_default();
            let outcome = algebra::rename(relation, &renames)?;
            let sql = sql::rename_to_sql(input_sql, &renames);
            (outcome, sql)
        }
        Operator::Union => {
            let ((left, left_sql), (right, right_sql)) = (inputs[0], inputs[1]);
            let outcome = algebra::union(left, right)?;
            let sql = sql::set_operator_sql(left_sql, right_sql, "UNION");
            (outcome, sql)
        }
        Operator::Intersection => {
            let ((left, left_sql), (right, right_sql)) = (inputs[0], inputs[1]);
            let outcome = algebra::intersection(left, right, provenance)?;
            let sql = sql::set_operator_sql(left_sql, right_sql, "INTERSECT");
            (outcome, sql)
        }
        Operator::Difference => {
            let ((left, left_sql), (right, right_sql)) = (inputs[0], inputs[1]);
            let outcome = algebra::difference(left, right, provenance)?;
            let sql = sql::set_operator_sql(left_sql, right_sql, "EXCEPT");
            (outcome, sql)
        }
        Operator::Product => {
            let ((left, left_sql), (right, right_sql)) = (inputs[0], inputs[1]);
            let outcome = algebra::product(left, right, provenance)?;
            let sql = sql::product_to_sql(left_sql, right_sql);
            (outcome, sql)
        }
        Operator::Join => {
            let ((left, left_sql), (right, right_sql)) = (inputs[0], inputs[1]);
            let condition = node.condition.as_deref().unwrap_or("");
            let keys = sql::parse_join_keys(condition)?;
            let outcome = algebra::join(left, right, &keys, provenance)?;
            let sql = sql::join_to_sql(left_sql, right_sql, condition)?;
            (outcome, sql)
        }
        Operator::Division => {
            let ((left, left_sql), (right, right_sql)) = (inputs[0], inputs[1]);
            let outcome = algebra::division(left, right, provenance)?;
            let quotient = outcome.relation.schema.column_names();
            let sql = sql::division_to_sql(left_sql, right_sql, &quotient);
            (outcome, sql)
        }
        Operator::Dataset => unreachable!("handled above"),
    };

    // diff against the immediately preceding list position, not the node's
    // declared inputs; branching pipelines inherit this UI behavior
    let previous = results.last().and_then(|result| result.relation.as_ref());
    let diff = relation_diff(previous, &outcome.relation);
    Ok((outcome, sql, diff))
}

fn resolve_inputs<'a>(
    node: &PipelineNode,
    results: &'a [NodeResult],
    by_id: &HashMap<String, usize>,
) -> EngineResult<Vec<(&'a Relation, &'a str)>> {
    node.input_ids
        .iter()
        .map(|input_id| {
            let result = by_id
                .get(input_id)
                .and_then(|&index| results.get(index))
                .ok_or_else(|| {
                    EngineError::Evaluation(format!(
                        "input node {} has not produced a relation yet",
                        input_id
                    ))
                })?;
            match &result.relation {
                Some(relation) => Ok((relation, result.sql.as_str())),
                None => Err(EngineError::Evaluation(format!(
                    "input node {} is missing relation output",
                    input_id
                ))),
            }
        })
        .collect()
}

/// SQL of the final node, or empty for an empty pipeline
pub fn pipeline_to_sql(results: &[NodeResult]) -> String {
    results
        .last()
        .map(|result| result.sql.clone())
        .unwrap_or_default()
}

/// Serializable description of the node shapes, independent of any live
/// relations. Fields that do not apply to a node's operator are dropped.
pub fn snapshot_pipeline(nodes: &[PipelineNode]) -> Vec<PipelineNode> {
    nodes
        .iter()
        .map(|node| {
            let mut snapshot = node.clone();
            match node.op {
                Operator::Dataset => {
                    snapshot.condition = None;
                    snapshot.columns = None;
                    snapshot.renames = None;
                }
                Operator::Selection | Operator::Join => {
                    snapshot.source = None;
                    snapshot.columns = None;
                    snapshot.renames = None;
                }
                Operator::Projection => {
                    snapshot.source = None;
                    snapshot.condition = None;
                    snapshot.renames = None;
                }
                Operator::Rename => {
                    snapshot.source = None;
                    snapshot.condition = None;
                    snapshot.columns = None;
                }
                _ => {
                    snapshot.source = None;
                    snapshot.condition = None;
                    snapshot.columns = None;
                    snapshot.renames = None;
                }
            }
            snapshot
        })
        .collect()
}

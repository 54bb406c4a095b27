//! Engine-wide error types.

use thiserror::Error;

/// Errors that can occur while building or evaluating relational algebra.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Cannot coerce {value} to {expected} (row {row}, column {column})")]
    TypeCoercion {
        value: String,
        expected: String,
        row: usize,
        column: String,
    },

    #[error("Unknown column {name} in {context}")]
    UnknownColumn { name: String, context: String },

    #[error("Unknown relation {0}")]
    UnknownRelation(String),

    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("Predicate syntax error: {0}")]
    PredicateSyntax(String),

    #[error("Join condition error: {0}")]
    JoinCondition(String),

    #[error("Arity mismatch: {0}")]
    Arity(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl EngineError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        EngineError::Parse {
            offset,
            message: message.into(),
        }
    }

    pub fn unknown_column(name: impl Into<String>, context: impl Into<String>) -> Self {
        EngineError::UnknownColumn {
            name: name.into(),
            context: context.into(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

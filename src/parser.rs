//! Dual-syntax expression parser for the algebra DSL.
//!
//! Accepts the unicode notation (`σ_{…}(…)`, infix `∪ ∩ − × ÷ ⋈`) and the
//! ASCII function-call notation (`sigma(…)`, `JOIN(…)`, …) over a single
//! grammar, producing the `Expr` AST consumed by the evaluator.

pub mod ast;
pub mod cursor;
pub mod grammar;
pub mod list;

pub use ast::Expr;
pub use grammar::parse_expression;
pub use list::{parse_columns_list, parse_rename_map};

//! Stateless SQL rendering for operators.
//!
//! Both the AST evaluator and the pipeline executor build their display
//! SQL through these helpers, so the rendering of each operator is defined
//! exactly once.

use crate::algebra::ColumnSpec;
use crate::error::EngineResult;
use crate::sql::join_keys::parse_join_keys;
use std::collections::BTreeMap;

/// `SELECT * FROM name`
pub fn relation_to_sql(name: &str) -> String {
    format!("SELECT * FROM {}", name)
}

/// Append a WHERE clause, or AND into an existing one
pub fn selection_to_sql(input_sql: &str, predicate_text: &str) -> String {
    let predicate = {
        let trimmed = predicate_text.trim();
        if trimmed.is_empty() {
            "1 = 1"
        } else {
            trimmed
        }
    };
    if has_where(input_sql) {
        format!("{} AND ({})", input_sql, predicate)
    } else {
        format!("{} WHERE {}", input_sql, predicate)
    }
}

fn has_where(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    let bytes = upper.as_bytes();
    let mut from = 0;
    while let Some(found) = upper[from..].find("WHERE") {
        let start = from + found;
        let end = start + "WHERE".len();
        let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return true;
        }
        from = end;
    }
    false
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `SELECT DISTINCT a, b AS c FROM (input)`
pub fn projection_to_sql(input_sql: &str, columns: &[ColumnSpec]) -> String {
    if columns.is_empty() {
        return input_sql.to_string();
    }
    let list = columns
        .iter()
        .map(|column| match &column.alias {
            Some(alias) if alias != &column.name => format!("{} AS {}", column.name, alias),
            _ => column.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT DISTINCT {} FROM ({})", list, input_sql)
}

/// `SELECT from AS to, … FROM (input)`
pub fn rename_to_sql(input_sql: &str, renames: &BTreeMap<String, String>) -> String {
    if renames.is_empty() {
        return input_sql.to_string();
    }
    let list = renames
        .iter()
        .map(|(from, to)| format!("{} AS {}", from, to))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM ({})", list, input_sql)
}

/// `left UNION|INTERSECT|EXCEPT right`
pub fn set_operator_sql(left_sql: &str, right_sql: &str, keyword: &str) -> String {
    format!("{} {} {}", left_sql, keyword, right_sql)
}

/// `left CROSS JOIN (right)`
pub fn product_to_sql(left_sql: &str, right_sql: &str) -> String {
    format!("{} CROSS JOIN ({})", left_sql, right_sql)
}

/// `left INNER JOIN (right) ON a = b AND …`
pub fn join_to_sql(left_sql: &str, right_sql: &str, condition: &str) -> EngineResult<String> {
    let keys = parse_join_keys(condition)?;
    let pairs = if keys.raw_clauses.is_empty() {
        condition.to_string()
    } else {
        keys.raw_clauses.join(" AND ")
    };
    Ok(format!(
        "{} INNER JOIN ({}) ON {}",
        left_sql, right_sql, pairs
    ))
}

/// Division as a grouped coverage check over the dividend
pub fn division_to_sql(dividend_sql: &str, divisor_sql: &str, quotient_columns: &[String]) -> String {
    let list = quotient_columns.join(", ");
    format!(
        "SELECT {} FROM ({}) AS dividend GROUP BY {} HAVING COUNT(DISTINCT ({}))",
        list, dividend_sql, list, divisor_sql
    )
}

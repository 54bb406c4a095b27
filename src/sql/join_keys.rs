//! Extract ordered key pairs from a raw equi-join condition.

use crate::error::{EngineError, EngineResult};

/// Ordered, equal-length key column lists for an equi-join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKeys {
    pub left_keys: Vec<String>,
    pub right_keys: Vec<String>,
    /// Normalized `left = right` clause texts for SQL rendering
    pub raw_clauses: Vec<String>,
}

/// Split a condition on case-insensitive whole-word AND.
///
/// The split is flat: parentheses are not tracked, so nested boolean join
/// conditions are out of scope here.
fn split_on_and(condition: &str) -> Vec<String> {
    let chars: Vec<char> = condition.chars().collect();
    let mut clauses = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while index < chars.len() {
        let is_and = index + 3 <= chars.len()
            && chars[index].eq_ignore_ascii_case(&'a')
            && chars[index + 1].eq_ignore_ascii_case(&'n')
            && chars[index + 2].eq_ignore_ascii_case(&'d');
        if is_and {
            let before_ok = index == 0 || !is_word_char(chars[index - 1]);
            let after_ok = index + 3 == chars.len() || !is_word_char(chars[index + 3]);
            if before_ok && after_ok {
                clauses.push(chars[start..index].iter().collect());
                index += 3;
                start = index;
                continue;
            }
        }
        index += 1;
    }
    clauses.push(chars[start..].iter().collect());
    clauses
        .into_iter()
        .map(|clause: String| clause.trim().to_string())
        .filter(|clause| !clause.is_empty())
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse `a.x = b.y AND …` into ordered key lists.
///
/// Each clause must be a single equality; the key on each side is the
/// final dot-segment of the operand.
pub fn parse_join_keys(condition: &str) -> EngineResult<JoinKeys> {
    let trimmed = condition.trim();
    if trimmed.is_empty() {
        return Err(EngineError::JoinCondition(
            "join condition required for ⋈ operator".to_string(),
        ));
    }

    let mut left_keys = Vec::new();
    let mut right_keys = Vec::new();
    let mut raw_clauses = Vec::new();
    for clause in split_on_and(trimmed) {
        if clause.contains(|c| matches!(c, '<' | '>' | '!')) {
            return Err(EngineError::JoinCondition(format!(
                "unsupported join clause \"{}\"",
                clause
            )));
        }
        let mut sides = clause.split('=');
        let (left, right) = match (sides.next(), sides.next(), sides.next()) {
            (Some(left), Some(right), None) => (left.trim(), right.trim()),
            _ => {
                return Err(EngineError::JoinCondition(format!(
                    "unsupported join clause \"{}\"",
                    clause
                )))
            }
        };
        if left.is_empty() || right.is_empty() {
            return Err(EngineError::JoinCondition(format!(
                "unsupported join clause \"{}\"",
                clause
            )));
        }
        left_keys.push(last_segment(left));
        right_keys.push(last_segment(right));
        raw_clauses.push(format!("{} = {}", left, right));
    }

    Ok(JoinKeys {
        left_keys,
        right_keys,
        raw_clauses,
    })
}

fn last_segment(operand: &str) -> String {
    operand
        .rsplit('.')
        .next()
        .unwrap_or(operand)
        .trim()
        .to_string()
}

//! Structural row keys for set semantics.
//!
//! Deduplication, set membership, join probing and division grouping all
//! need rows as hash-map keys. `Value` cannot derive `Eq`/`Hash` because of
//! floats, so `RowKey` hashes and compares floats by bit pattern: exact,
//! deterministic, and consistent between `Hash` and `Eq`.

use crate::relation::value::Value;
use std::hash::{Hash, Hasher};

/// Wrapper giving a row of values map-key semantics
#[derive(Debug, Clone)]
pub struct RowKey(pub Vec<Value>);

impl RowKey {
    pub fn of(values: &[Value]) -> Self {
        RowKey(values.to_vec())
    }

    /// Key over a subset of the row's columns, in the given order
    pub fn project(values: &[Value], indexes: &[usize]) -> Self {
        RowKey(indexes.iter().map(|&i| values[i].clone()).collect())
    }
}

impl Hash for RowKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in &self.0 {
            match value {
                Value::Bool(b) => {
                    0u8.hash(state);
                    b.hash(state);
                }
                Value::Int(i) => {
                    1u8.hash(state);
                    i.hash(state);
                }
                Value::Float(f) => {
                    2u8.hash(state);
                    f.to_bits().hash(state);
                }
                Value::Text(s) => {
                    3u8.hash(state);
                    s.hash(state);
                }
            }
        }
    }
}

impl PartialEq for RowKey {
    fn eq(&self, other: &Self) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        self.0.iter().zip(other.0.iter()).all(|(a, b)| match (a, b) {
            (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
            _ => a == b,
        })
    }
}

impl Eq for RowKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_row_key_set_semantics() {
        let mut seen = HashSet::new();
        assert!(seen.insert(RowKey(vec![Value::Int(1), Value::Text("a".into())])));
        assert!(!seen.insert(RowKey(vec![Value::Int(1), Value::Text("a".into())])));
        assert!(seen.insert(RowKey(vec![Value::Int(2), Value::Text("a".into())])));
    }

    #[test]
    fn test_float_bits() {
        let a = RowKey(vec![Value::Float(1.5)]);
        let b = RowKey(vec![Value::Float(1.5)]);
        assert_eq!(a, b);

        // int and float rows are distinct keys even when numerically equal
        let c = RowKey(vec![Value::Int(1)]);
        let d = RowKey(vec![Value::Float(1.0)]);
        assert_ne!(c, d);
    }

    #[test]
    fn test_project() {
        let row = vec![Value::Int(1), Value::Text("a".into()), Value::Bool(true)];
        let key = RowKey::project(&row, &[2, 0]);
        assert_eq!(key.0, vec![Value::Bool(true), Value::Int(1)]);
    }
}

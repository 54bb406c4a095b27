//! Value and data type definitions for relations.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Column data types supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Float,
    Bool,
    #[serde(rename = "string")]
    Text,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
            DataType::Text => "string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values that can appear in relation rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::Bool(_) => DataType::Bool,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Coerce this value into the given column type.
    ///
    /// Int accepts integral floats, Float widens ints, Bool accepts the
    /// textual and 0/1 forms, Text renders any value.
    pub fn coerce(&self, data_type: DataType) -> Option<Value> {
        match (self, data_type) {
            (Value::Int(i), DataType::Int) => Some(Value::Int(*i)),
            (Value::Float(f), DataType::Int) => {
                if f.is_finite() && f.fract() == 0.0 {
                    Some(Value::Int(*f as i64))
                } else {
                    None
                }
            }
            (Value::Int(i), DataType::Float) => Some(Value::Float(*i as f64)),
            (Value::Float(f), DataType::Float) => {
                if f.is_finite() {
                    Some(Value::Float(*f))
                } else {
                    None
                }
            }
            (Value::Bool(b), DataType::Bool) => Some(Value::Bool(*b)),
            (Value::Text(s), DataType::Bool) => match s.as_str() {
                "true" | "TRUE" => Some(Value::Bool(true)),
                "false" | "FALSE" => Some(Value::Bool(false)),
                _ => None,
            },
            (Value::Int(0), DataType::Bool) => Some(Value::Bool(false)),
            (Value::Int(1), DataType::Bool) => Some(Value::Bool(true)),
            (value, DataType::Text) => Some(Value::Text(value.render())),
            _ => None,
        }
    }

    /// Render the value in its canonical text form
    pub fn render(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    /// Compare two values, promoting int/float pairs to float.
    ///
    /// Mixed non-numeric comparisons are a type mismatch.
    pub fn compare(&self, other: &Value) -> EngineResult<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal)),
            (Value::Int(a), Value::Float(b)) => {
                Ok((*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal))
            }
            (Value::Float(a), Value::Int(b)) => {
                Ok(a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal))
            }
            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            _ => Err(EngineError::TypeMismatch(format!(
                "cannot compare {} with {}",
                self.data_type(),
                other.data_type()
            ))),
        }
    }

    /// Equality under the same promotion rules as `compare`
    pub fn equals(&self, other: &Value) -> EngineResult<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int() {
        assert_eq!(Value::Int(3).coerce(DataType::Int), Some(Value::Int(3)));
        assert_eq!(Value::Float(2.0).coerce(DataType::Int), Some(Value::Int(2)));
        assert_eq!(Value::Float(2.5).coerce(DataType::Int), None);
        assert_eq!(Value::Text("3".to_string()).coerce(DataType::Int), None);
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(Value::Int(3).coerce(DataType::Float), Some(Value::Float(3.0)));
        assert_eq!(
            Value::Float(2.5).coerce(DataType::Float),
            Some(Value::Float(2.5))
        );
        assert_eq!(Value::Float(f64::NAN).coerce(DataType::Float), None);
        assert_eq!(Value::Float(f64::INFINITY).coerce(DataType::Float), None);
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(
            Value::Bool(true).coerce(DataType::Bool),
            Some(Value::Bool(true))
        );
        assert_eq!(
            Value::Text("true".to_string()).coerce(DataType::Bool),
            Some(Value::Bool(true))
        );
        assert_eq!(
            Value::Text("FALSE".to_string()).coerce(DataType::Bool),
            Some(Value::Bool(false))
        );
        assert_eq!(Value::Int(0).coerce(DataType::Bool), Some(Value::Bool(false)));
        assert_eq!(Value::Int(1).coerce(DataType::Bool), Some(Value::Bool(true)));
        assert_eq!(Value::Int(2).coerce(DataType::Bool), None);
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(
            Value::Int(7).coerce(DataType::Text),
            Some(Value::Text("7".to_string()))
        );
        assert_eq!(
            Value::Bool(true).coerce(DataType::Text),
            Some(Value::Text("true".to_string()))
        );
    }

    #[test]
    fn test_numeric_promotion() {
        assert_eq!(
            Value::Int(1).compare(&Value::Float(1.0)).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            Value::Float(0.5).compare(&Value::Int(1)).unwrap(),
            Ordering::Less
        );
        assert!(Value::Int(1).equals(&Value::Float(1.0)).unwrap());
    }

    #[test]
    fn test_mixed_comparison_fails() {
        assert!(Value::Int(1).compare(&Value::Text("1".to_string())).is_err());
        assert!(Value::Bool(true).compare(&Value::Int(1)).is_err());
    }
}

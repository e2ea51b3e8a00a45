//! Feature value types
//!
//! A feature declares one [`ValueType`] when it is registered; every value
//! stored under it must be of that type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a feature is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EntityKind {
    Vertex,
    Edge,
}

impl EntityKind {
    pub fn tag(&self) -> u8 {
        match self {
            EntityKind::Vertex => 0,
            EntityKind::Edge => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(EntityKind::Vertex),
            1 => Some(EntityKind::Edge),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Vertex => write!(f, "vertex"),
            EntityKind::Edge => write!(f, "edge"),
        }
    }
}

/// Declared type of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Int,
    Double,
    Bool,
    Text,
    DoubleArray,
}

impl ValueType {
    pub fn tag(&self) -> u8 {
        match self {
            ValueType::Int => 0,
            ValueType::Double => 1,
            ValueType::Bool => 2,
            ValueType::Text => 3,
            ValueType::DoubleArray => 4,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ValueType::Int),
            1 => Some(ValueType::Double),
            2 => Some(ValueType::Bool),
            3 => Some(ValueType::Text),
            4 => Some(ValueType::DoubleArray),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int => "Int",
            ValueType::Double => "Double",
            ValueType::Bool => "Bool",
            ValueType::Text => "Text",
            ValueType::DoubleArray => "DoubleArray",
        };
        write!(f, "{}", name)
    }
}

/// Value of a feature for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    Text(String),
    DoubleArray(Vec<f64>),
}

impl FeatureValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            FeatureValue::Int(_) => ValueType::Int,
            FeatureValue::Double(_) => ValueType::Double,
            FeatureValue::Bool(_) => ValueType::Bool,
            FeatureValue::Text(_) => ValueType::Text,
            FeatureValue::DoubleArray(_) => ValueType::DoubleArray,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            FeatureValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_double_array(&self) -> Option<&[f64]> {
        match self {
            FeatureValue::DoubleArray(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(i) => write!(f, "{}", i),
            FeatureValue::Double(d) => write!(f, "{}", d),
            FeatureValue::Bool(b) => write!(f, "{}", b),
            FeatureValue::Text(s) => write!(f, "\"{}\"", s),
            FeatureValue::DoubleArray(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
        }
    }
}

// Convenience conversions
impl From<i64> for FeatureValue {
    fn from(i: i64) -> Self {
        FeatureValue::Int(i)
    }
}

impl From<i32> for FeatureValue {
    fn from(i: i32) -> Self {
        FeatureValue::Int(i as i64)
    }
}

impl From<f64> for FeatureValue {
    fn from(d: f64) -> Self {
        FeatureValue::Double(d)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Bool(b)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

impl From<Vec<f64>> for FeatureValue {
    fn from(v: Vec<f64>) -> Self {
        FeatureValue::DoubleArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(FeatureValue::Int(1).value_type(), ValueType::Int);
        assert_eq!(FeatureValue::Double(1.5).value_type(), ValueType::Double);
        assert_eq!(FeatureValue::Bool(true).value_type(), ValueType::Bool);
        assert_eq!(FeatureValue::from("x").value_type(), ValueType::Text);
        assert_eq!(FeatureValue::from(vec![1.0]).value_type(), ValueType::DoubleArray);
    }

    #[test]
    fn test_tags_are_symmetric() {
        for vt in [
            ValueType::Int,
            ValueType::Double,
            ValueType::Bool,
            ValueType::Text,
            ValueType::DoubleArray,
        ] {
            assert_eq!(ValueType::from_tag(vt.tag()), Some(vt));
        }
        assert_eq!(ValueType::from_tag(99), None);
        assert_eq!(EntityKind::from_tag(EntityKind::Edge.tag()), Some(EntityKind::Edge));
        assert_eq!(EntityKind::from_tag(7), None);
    }

    #[test]
    fn test_accessors() {
        let v: FeatureValue = 42i64.into();
        assert_eq!(v.as_int(), Some(42));
        assert_eq!(v.as_double(), None);
        assert_eq!(FeatureValue::from("a").as_text(), Some("a"));
        assert_eq!(format!("{}", FeatureValue::from(vec![1.0, 2.5])), "[1, 2.5]");
    }
}

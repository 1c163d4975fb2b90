use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;

use super::IndexSet;
use crate::distribution::DistributionRef;
use crate::error::IndexError;
use crate::tensor::{Tensor, TensorElement, TensorValue};

/// Every kind of value the indexing operations dispatch over.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// An explicit tensor shape.
    Shape(Vec<usize>),
    /// A tuple; one made only of `Int`s is read as a shape.
    Tuple(Vec<Value>),
    Tensor(TensorValue),
    Distribution(DistributionRef),
    /// A value defined piecewise over disjoint index sets.
    Partitioned(BTreeMap<IndexSet, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Shape(_) => "shape",
            Value::Tuple(_) => "tuple",
            Value::Tensor(_) => "tensor",
            Value::Distribution(_) => "distribution",
            Value::Partitioned(_) => "partitioned",
        }
    }

    pub fn as_tensor(&self) -> Option<&TensorValue> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }

    /// Unwrap a tensor result, failing for every other kind.
    pub fn into_tensor(self) -> Result<TensorValue> {
        match self {
            Value::Tensor(t) => Ok(t),
            other => Err(IndexError::InvalidArgument(format!(
                "expected a tensor, got a {}",
                other.kind()
            ))
            .into()),
        }
    }

    /// Scalars become 0-d tensors; other kinds are returned as `None`.
    pub(crate) fn scalar_as_tensor(&self) -> Option<TensorValue> {
        match self {
            Value::Bool(v) => Some(TensorValue::from(*v)),
            Value::Int(v) => Some(TensorValue::from(*v)),
            Value::Float(v) => Some(TensorValue::from(*v)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
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

impl From<TensorValue> for Value {
    fn from(value: TensorValue) -> Self {
        Value::Tensor(value)
    }
}

impl<T: TensorElement> From<Tensor<T>> for Value {
    fn from(value: Tensor<T>) -> Self {
        Value::Tensor(T::into_value(value))
    }
}

impl From<DistributionRef> for Value {
    fn from(value: DistributionRef) -> Self {
        Value::Distribution(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Shape(shape) => write!(f, "Shape{:?}", shape),
            Value::Tuple(items) => {
                let parts = items.iter().map(|v| v.to_string()).collect::<Vec<_>>();
                write!(f, "({})", parts.join(", "))
            }
            Value::Tensor(t) => write!(f, "{}", t),
            Value::Distribution(d) => write!(f, "{:?}", d),
            Value::Partitioned(parts) => write!(f, "Partitioned[{} parts]", parts.len()),
        }
    }
}

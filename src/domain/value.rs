//! Opaque node payloads.
//!
//! The tree engine never looks at numbers. It only needs to know whether a
//! payload is present, what shape it has, and (for metadata nodes) its text.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Element storage, tagged with its CGNS data type code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data")]
pub enum ArrayData {
    C1(String),
    I4(Vec<i32>),
    I8(Vec<i64>),
    R4(Vec<f32>),
    R8(Vec<f64>),
}

impl ArrayData {
    pub fn dtype(&self) -> &'static str {
        match self {
            ArrayData::C1(_) => "C1",
            ArrayData::I4(_) => "I4",
            ArrayData::I8(_) => "I8",
            ArrayData::R4(_) => "R4",
            ArrayData::R8(_) => "R8",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::C1(s) => s.len(),
            ArrayData::I4(v) => v.len(),
            ArrayData::I8(v) => v.len(),
            ArrayData::R4(v) => v.len(),
            ArrayData::R8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Multi-dimensional array or scalar attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredValue")]
pub struct Value {
    shape: Vec<usize>,
    data: ArrayData,
}

/// Serialized form of `Value`, checked through `Value::new` on the way in.
#[derive(Deserialize)]
struct StoredValue {
    shape: Vec<usize>,
    data: ArrayData,
}

impl TryFrom<StoredValue> for Value {
    type Error = DomainError;

    fn try_from(stored: StoredValue) -> DomainResult<Self> {
        Value::new(stored.shape, stored.data)
    }
}

impl Value {
    /// Build a value, checking that `shape` accounts for every element.
    pub fn new(shape: Vec<usize>, data: ArrayData) -> DomainResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(DomainError::InvalidValue(format!(
                "shape {:?} holds {} elements, {} data has {}",
                shape,
                expected,
                data.dtype(),
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            shape: vec![s.len()],
            data: ArrayData::C1(s),
        }
    }

    pub fn i4(values: Vec<i32>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::I4(values),
        }
    }

    pub fn r4(values: Vec<f32>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::R4(values),
        }
    }

    pub fn r8(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::R8(values),
        }
    }

    /// Zone size array of a structured block: one `[vertices, cells, 0]` row
    /// per index direction, stored column-major as CGNS does.
    pub fn structured_zone_shape(vertices: &[usize]) -> Self {
        let n = vertices.len();
        let mut data = Vec::with_capacity(n * 3);
        data.extend(vertices.iter().map(|&v| v as i32));
        data.extend(vertices.iter().map(|&v| v.saturating_sub(1) as i32));
        data.extend(std::iter::repeat(0).take(n));
        Self {
            shape: vec![n, 3],
            data: ArrayData::I4(data),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            ArrayData::C1(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            ArrayData::C1(s) => write!(f, "'{}'", s),
            data => write!(f, "{}[{}]", data.dtype(), self.shape.iter().join("x")),
        }
    }
}

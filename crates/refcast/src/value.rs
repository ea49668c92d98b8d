use crate::record::HydrateError;
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// Value
///
/// Owned dynamic scalar used for query predicates and row fields.
/// Equality is structural; `Float` compares by IEEE semantics, so `NaN`
/// predicates never match.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Name of the variant, for diagnostics and type-expectation errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

///
/// Row
///
/// Ordered field-name → value map returned by store fetches.
/// Stores build rows; entities consume them via `Record::hydrate`.
///

#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut, IntoIterator,
)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style field insert.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Field value, or a hydrate error naming the missing field.
    pub fn require(&self, field: &str) -> Result<&Value, HydrateError> {
        self.0.get(field).ok_or_else(|| HydrateError::MissingField {
            field: field.to_string(),
        })
    }

    pub fn require_i64(&self, field: &str) -> Result<i64, HydrateError> {
        let value = self.require(field)?;
        value.as_i64().ok_or_else(|| HydrateError::FieldType {
            field: field.to_string(),
            expected: "int",
            found: value.kind(),
        })
    }

    pub fn require_u64(&self, field: &str) -> Result<u64, HydrateError> {
        let value = self.require(field)?;
        value.as_u64().ok_or_else(|| HydrateError::FieldType {
            field: field.to_string(),
            expected: "uint",
            found: value.kind(),
        })
    }

    pub fn require_bool(&self, field: &str) -> Result<bool, HydrateError> {
        let value = self.require(field)?;
        value.as_bool().ok_or_else(|| HydrateError::FieldType {
            field: field.to_string(),
            expected: "bool",
            found: value.kind(),
        })
    }

    pub fn require_text(&self, field: &str) -> Result<&str, HydrateError> {
        let value = self.require(field)?;
        value.as_str().ok_or_else(|| HydrateError::FieldType {
            field: field.to_string(),
            expected: "text",
            found: value.kind(),
        })
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

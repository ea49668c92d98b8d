use crate::{naming::TableName, registry::RegistryError, store::StoreError, value::Value};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ResolveError
///
/// Failure taxonomy for resolution. Every path returns a distinct variant
/// so callers can branch on cause; nothing is retried internally.
///

#[derive(Debug, PartialEq, ThisError)]
pub enum ResolveError {
    #[error("store handle is not bound")]
    InvalidStore,

    #[error("cannot derive a table from field '{field}'")]
    UnresolvableField { field: String },

    #[error("no model registered for table '{table}'")]
    ModelNotRegistered { table: TableName },

    #[error("no row in '{table}' where {field} = {value}")]
    RecordNotFound {
        table: TableName,
        field: String,
        value: Value,
    },

    #[error("model registered for '{table}' is not a {expected}")]
    TypeMismatch {
        table: TableName,
        expected: &'static str,
    },

    #[error("store fetch failed for '{table}': {source}")]
    Store {
        table: TableName,
        #[source]
        source: StoreError,
    },
}

impl ResolveError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidStore => ErrorClass::InvariantViolation,
            Self::UnresolvableField { .. } | Self::TypeMismatch { .. } => ErrorClass::Unsupported,
            Self::ModelNotRegistered { .. } => ErrorClass::Internal,
            Self::RecordNotFound { .. } => ErrorClass::NotFound,
            Self::Store { source, .. } => source.class(),
        }
    }

    /// True for the zero-rows outcome, as opposed to a missing registration.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}

impl From<RegistryError> for ResolveError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotRegistered { table } => Self::ModelNotRegistered { table },
        }
    }
}

///
/// ErrorClass
/// Runtime classification across the resolution taxonomy.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Unsupported,
    Internal,
    Corruption,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
            Self::Corruption => "corruption",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

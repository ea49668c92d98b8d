mod memory;

pub use memory::MemStore;

use crate::{
    error::ErrorClass,
    naming::TableName,
    record::HydrateError,
    value::{Row, Value},
};
use std::sync::{Arc, OnceLock};
use thiserror::Error as ThisError;

///
/// Store
///
/// The consumed capability: an equality-filtered single-row fetch.
/// `Ok(None)` is the no-rows signal; `Err` is any other failure.
/// Implementations own their blocking and cancellation behavior. No
/// transactions, joins, or batch APIs are required.
///

pub trait Store: Send + Sync {
    fn fetch_one_where(
        &self,
        table: &TableName,
        field: &str,
        value: &Value,
    ) -> Result<Option<Row>, StoreError>;
}

///
/// StoreError
///
/// Store-side fetch failures other than "no rows".
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("backend failure: {message}")]
    Backend { message: String },

    #[error("store corruption: {message}")]
    Corrupt { message: String },

    #[error("row failed to decode: {message}")]
    Decode { message: String },
}

impl StoreError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Backend { .. } => ErrorClass::Internal,
            Self::Corrupt { .. } | Self::Decode { .. } => ErrorClass::Corruption,
        }
    }
}

impl From<HydrateError> for StoreError {
    fn from(err: HydrateError) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

///
/// BindError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("store handle is already bound")]
pub struct BindError;

///
/// StoreHandle
///
/// Bind-once handle standing between the resolver and the backing store.
/// Starts unbound; bound exactly once at startup. Resolving through an
/// unbound handle fails with `InvalidStore` instead of panicking. A second
/// bind is rejected rather than swapping the store under concurrent
/// readers.
///

#[derive(Default)]
pub struct StoreHandle {
    inner: OnceLock<Arc<dyn Store>>,
}

impl StoreHandle {
    /// A handle with no store bound yet.
    #[must_use]
    pub const fn unbound() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// A handle bound at construction.
    #[must_use]
    pub fn bound(store: Arc<dyn Store>) -> Self {
        let handle = Self::unbound();
        let _ = handle.inner.set(store);
        handle
    }

    /// Bind the backing store. Fails if the handle is already bound.
    pub fn bind(&self, store: Arc<dyn Store>) -> Result<(), BindError> {
        self.inner.set(store).map_err(|_| BindError)
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.get().is_some()
    }

    /// The bound store, if any.
    pub(crate) fn get(&self) -> Option<&dyn Store> {
        self.inner.get().map(Arc::as_ref)
    }
}

use crate::{
    error::ResolveError,
    naming::{self, FieldShape, ID_FIELD, ResolvedQuery, TableName},
    obs::{MetricsEvent, MetricsSink},
    record::Record,
    registry::ModelRegistry,
    store::{Store, StoreHandle},
    value::Value,
};
use std::{any::Any, sync::Arc};

///
/// Resolver
///
/// Stateless orchestration: derive the table from the field name, look up
/// the entity factory, issue exactly one equality-filtered fetch, hydrate.
/// Holds the injected registry plus an optional metrics sink; every call
/// is independent and idempotent.
///

pub struct Resolver {
    registry: Arc<ModelRegistry>,
    metrics: Option<&'static dyn MetricsSink>,
}

impl Resolver {
    #[must_use]
    pub const fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    /// Resolve a foreign-key-shaped field against the bound store.
    ///
    /// `"category_id"` queries `id` in `"categories"`. Bare field names
    /// carry no table information and fail with `UnresolvableField`; use
    /// [`Self::resolve_in`] with an explicit table for those.
    pub fn resolve(
        &self,
        store: &StoreHandle,
        field: &str,
        value: &Value,
    ) -> Result<Box<dyn Record>, ResolveError> {
        let store = Self::bound(store)?;
        let query = Self::foreign_key_query(field)?;

        self.fetch(store, &query, value)
    }

    /// Resolve a literal field in an explicitly named table.
    ///
    /// Non-foreign-key lookups take this path: no pluralization guess,
    /// the caller states the table.
    pub fn resolve_in(
        &self,
        store: &StoreHandle,
        table: &TableName,
        field: &str,
        value: &Value,
    ) -> Result<Box<dyn Record>, ResolveError> {
        let store = Self::bound(store)?;
        let query = Self::literal_query(table, field)?;

        self.fetch(store, &query, value)
    }

    /// Resolve a foreign-key-shaped field and narrow to a concrete type.
    ///
    /// The registry is name-driven, not statically tied to the caller's
    /// expectation; `TypeMismatch` reports a factory that produces some
    /// other type, even when the fetch itself succeeded.
    pub fn resolve_as<T: Record>(
        &self,
        store: &StoreHandle,
        field: &str,
        value: &Value,
    ) -> Result<T, ResolveError> {
        let store = Self::bound(store)?;
        let query = Self::foreign_key_query(field)?;
        let table = query.table.clone();
        let entity = self.fetch(store, &query, value)?;

        narrow::<T>(entity, table)
    }

    /// Resolve a literal field in an explicit table and narrow to `T`.
    pub fn resolve_in_as<T: Record>(
        &self,
        store: &StoreHandle,
        table: &TableName,
        field: &str,
        value: &Value,
    ) -> Result<T, ResolveError> {
        let store = Self::bound(store)?;
        let query = Self::literal_query(table, field)?;
        let entity = self.fetch(store, &query, value)?;

        narrow::<T>(entity, table.clone())
    }

    fn bound(store: &StoreHandle) -> Result<&dyn Store, ResolveError> {
        store.get().ok_or(ResolveError::InvalidStore)
    }

    fn foreign_key_query(field: &str) -> Result<ResolvedQuery, ResolveError> {
        match naming::classify(field) {
            FieldShape::ForeignKey { table } if !table.is_empty() => Ok(ResolvedQuery {
                table,
                field: ID_FIELD.to_string(),
            }),
            FieldShape::ForeignKey { .. } | FieldShape::Bare => {
                Err(ResolveError::UnresolvableField {
                    field: field.to_string(),
                })
            }
        }
    }

    fn literal_query(table: &TableName, field: &str) -> Result<ResolvedQuery, ResolveError> {
        if table.is_empty() || field.is_empty() {
            return Err(ResolveError::UnresolvableField {
                field: field.to_string(),
            });
        }

        Ok(ResolvedQuery {
            table: table.clone(),
            field: field.to_string(),
        })
    }

    fn fetch(
        &self,
        store: &dyn Store,
        query: &ResolvedQuery,
        value: &Value,
    ) -> Result<Box<dyn Record>, ResolveError> {
        self.record(MetricsEvent::ResolveAttempt {
            table: query.table.clone(),
        });

        let outcome = self.fetch_inner(store, query, value);
        match &outcome {
            Ok(_) => self.record(MetricsEvent::ResolveHit {
                table: query.table.clone(),
            }),
            Err(err) => self.record(MetricsEvent::ResolveMiss {
                table: query.table.clone(),
                class: err.class(),
            }),
        }

        outcome
    }

    fn fetch_inner(
        &self,
        store: &dyn Store,
        query: &ResolvedQuery,
        value: &Value,
    ) -> Result<Box<dyn Record>, ResolveError> {
        let factory = self.registry.lookup(&query.table)?;
        let mut entity = factory();

        let row = store
            .fetch_one_where(&query.table, &query.field, value)
            .map_err(|source| ResolveError::Store {
                table: query.table.clone(),
                source,
            })?;

        let Some(row) = row else {
            return Err(ResolveError::RecordNotFound {
                table: query.table.clone(),
                field: query.field.clone(),
                value: value.clone(),
            });
        };

        entity
            .hydrate(&row)
            .map_err(|err| ResolveError::Store {
                table: query.table.clone(),
                source: err.into(),
            })?;

        Ok(entity)
    }

    fn record(&self, event: MetricsEvent) {
        if let Some(sink) = self.metrics {
            sink.record(event);
        }
    }
}

/// Narrow a dynamically resolved entity to the caller's concrete type.
fn narrow<T: Record>(entity: Box<dyn Record>, table: TableName) -> Result<T, ResolveError> {
    let any: Box<dyn Any> = entity;

    any.downcast::<T>()
        .map(|entity| *entity)
        .map_err(|_| ResolveError::TypeMismatch {
            table,
            expected: std::any::type_name::<T>(),
        })
}

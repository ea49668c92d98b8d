use crate::{naming::TableName, record::EntityFactory};
use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("no model registered for table '{table}'")]
    NotRegistered { table: TableName },
}

///
/// ModelRegistry
///
/// Process-scoped mapping from table identifier to entity factory.
/// Constructed once at startup and injected into the resolver; entity
/// modules each register their own table. Append-only by convention;
/// there is no deletion API.
///
/// Registration overwrites unconditionally (last write wins); callers must
/// not rely on registration order across modules with colliding names.
///

#[derive(Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<TableName, EntityFactory>>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TableName, EntityFactory>> {
        self.models
            .read()
            .expect("model registry RwLock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TableName, EntityFactory>> {
        self.models
            .write()
            .expect("model registry RwLock poisoned while acquiring write lock")
    }

    /// Register the factory for a table. Always succeeds; a previous
    /// registration for the same table is replaced.
    pub fn register(&self, table: impl Into<TableName>, factory: EntityFactory) {
        self.write().insert(table.into(), factory);
    }

    /// Look up the factory for a table. No side effects.
    pub fn lookup(&self, table: &TableName) -> Result<EntityFactory, RegistryError> {
        self.read()
            .get(table)
            .copied()
            .ok_or_else(|| RegistryError::NotRegistered {
                table: table.clone(),
            })
    }

    #[must_use]
    pub fn contains(&self, table: &TableName) -> bool {
        self.read().contains_key(table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered tables, sorted for stable reporting.
    #[must_use]
    pub fn tables(&self) -> Vec<TableName> {
        let mut tables: Vec<_> = self.read().keys().cloned().collect();
        tables.sort();
        tables
    }
}

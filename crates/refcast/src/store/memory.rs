use crate::{
    naming::TableName,
    store::{Store, StoreError},
    value::{Row, Value},
};
use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// MemStore
///
/// In-memory store backend. Rows live in per-table vectors in insertion
/// order; fetches scan for the first field match. Backs tests and small
/// embedded deployments. A table that was never written is simply empty.
///

#[derive(Default)]
pub struct MemStore {
    tables: RwLock<HashMap<TableName, Vec<Row>>>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TableName, Vec<Row>>> {
        self.tables
            .read()
            .expect("memory store RwLock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TableName, Vec<Row>>> {
        self.tables
            .write()
            .expect("memory store RwLock poisoned while acquiring write lock")
    }

    /// Append a row to a table, creating the table on first write.
    pub fn insert(&self, table: impl Into<TableName>, row: Row) {
        self.write().entry(table.into()).or_default().push(row);
    }

    #[must_use]
    pub fn row_count(&self, table: &TableName) -> usize {
        self.read().get(table).map_or(0, Vec::len)
    }
}

impl Store for MemStore {
    fn fetch_one_where(
        &self,
        table: &TableName,
        field: &str,
        value: &Value,
    ) -> Result<Option<Row>, StoreError> {
        let tables = self.read();
        let row = tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| row.get(field) == Some(value)))
            .cloned();

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_books() -> MemStore {
        let store = MemStore::new();
        store.insert(
            "categories",
            Row::new().with("id", 5i64).with("name", "Books"),
        );
        store.insert(
            "categories",
            Row::new().with("id", 6i64).with("name", "Games"),
        );
        store
    }

    #[test]
    fn fetch_matches_on_field_equality() {
        let store = store_with_books();
        let row = store
            .fetch_one_where(&TableName::from("categories"), "id", &Value::Int(6))
            .expect("fetch should not fail")
            .expect("matching row should be found");
        assert_eq!(row.require_text("name"), Ok("Games"));
    }

    #[test]
    fn fetch_returns_at_most_the_first_match() {
        let store = MemStore::new();
        store.insert("tags", Row::new().with("label", "a").with("rank", 1i64));
        store.insert("tags", Row::new().with("label", "a").with("rank", 2i64));

        let row = store
            .fetch_one_where(&TableName::from("tags"), "label", &Value::from("a"))
            .expect("fetch should not fail")
            .expect("matching row should be found");
        assert_eq!(
            row.require_i64("rank"),
            Ok(1),
            "the first inserted match should win"
        );
    }

    #[test]
    fn no_match_is_the_none_signal_not_an_error() {
        let store = store_with_books();
        let row = store
            .fetch_one_where(&TableName::from("categories"), "id", &Value::Int(999))
            .expect("fetch should not fail");
        assert!(row.is_none());
    }

    #[test]
    fn unknown_table_reads_as_empty() {
        let store = MemStore::new();
        let row = store
            .fetch_one_where(&TableName::from("ghosts"), "id", &Value::Int(1))
            .expect("fetch should not fail");
        assert!(row.is_none());
    }
}

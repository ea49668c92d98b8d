//! End-to-end resolution against the in-memory store.

use refcast::{
    error::{ErrorClass, ResolveError},
    naming::TableName,
    obs::CounterSink,
    prelude::*,
    record::HydrateError,
    store::MemStore,
};
use std::sync::{Arc, LazyLock};

#[derive(Debug, Default, PartialEq)]
struct Category {
    id: i64,
    name: String,
}

impl Record for Category {
    fn hydrate(&mut self, row: &Row) -> Result<(), HydrateError> {
        self.id = row.require_i64("id")?;
        self.name = row.require_text("name")?.to_string();
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
struct User {
    id: i64,
    email: String,
}

impl Record for User {
    fn hydrate(&mut self, row: &Row) -> Result<(), HydrateError> {
        self.id = row.require_i64("id")?;
        self.email = row.require_text("email")?.to_string();
        Ok(())
    }
}

fn registry() -> Arc<ModelRegistry> {
    let registry = ModelRegistry::new();
    registry.register("categories", || Box::new(Category::default()));
    registry.register("users", || Box::new(User::default()));
    Arc::new(registry)
}

fn bound_store() -> StoreHandle {
    let store = MemStore::new();
    store.insert(
        "categories",
        Row::new().with("id", 5i64).with("name", "Books"),
    );
    store.insert(
        "users",
        Row::new().with("id", 1i64).with("email", "ada@example.com"),
    );
    StoreHandle::bound(Arc::new(store))
}

#[test]
fn foreign_key_field_resolves_to_the_stored_entity() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let category: Category = resolver
        .resolve_as(&store, "category_id", &Value::Int(5))
        .expect("registered category with a matching row should resolve");
    assert_eq!(
        category,
        Category {
            id: 5,
            name: "Books".to_string()
        }
    );
}

#[test]
fn untyped_resolve_returns_a_boxed_entity() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let entity = resolver
        .resolve(&store, "category_id", &Value::Int(5))
        .expect("registered category with a matching row should resolve");
    let any: &dyn std::any::Any = entity.as_ref();
    assert!(
        any.is::<Category>(),
        "dynamic result should be the registered concrete type"
    );
}

#[test]
fn missing_row_reports_the_full_query() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let err = resolver
        .resolve(&store, "category_id", &Value::Int(999))
        .expect_err("no category row should match 999");
    assert_eq!(
        err,
        ResolveError::RecordNotFound {
            table: TableName::from("categories"),
            field: "id".to_string(),
            value: Value::Int(999),
        }
    );
    assert!(err.is_not_found());
}

#[test]
fn unregistered_table_is_distinct_from_a_missing_row() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let err = resolver
        .resolve(&store, "tag_id", &Value::Int(5))
        .expect_err("no model is registered for tags");
    assert_eq!(
        err,
        ResolveError::ModelNotRegistered {
            table: TableName::from("tags")
        }
    );
    assert!(!err.is_not_found());
}

#[test]
fn typed_narrow_rejects_the_wrong_expectation() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    // The categories fetch itself succeeds; the narrow must still fail.
    let err = resolver
        .resolve_as::<User>(&store, "category_id", &Value::Int(5))
        .expect_err("categories factory does not produce a User");
    assert_eq!(
        err,
        ResolveError::TypeMismatch {
            table: TableName::from("categories"),
            expected: std::any::type_name::<User>(),
        }
    );
}

#[test]
fn bare_field_requires_an_explicit_table() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let err = resolver
        .resolve(&store, "email", &Value::from("ada@example.com"))
        .expect_err("bare field names carry no table information");
    assert_eq!(
        err,
        ResolveError::UnresolvableField {
            field: "email".to_string()
        }
    );

    let user: User = resolver
        .resolve_in_as(
            &store,
            &TableName::from("users"),
            "email",
            &Value::from("ada@example.com"),
        )
        .expect("explicit table plus literal field should resolve");
    assert_eq!(user.id, 1);
}

#[test]
fn empty_fk_stem_is_unresolvable() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let err = resolver
        .resolve(&store, "_id", &Value::Int(5))
        .expect_err("an empty derived table cannot be resolved");
    assert_eq!(
        err,
        ResolveError::UnresolvableField {
            field: "_id".to_string()
        }
    );
}

#[test]
fn unbound_handle_fails_before_derivation() {
    let resolver = Resolver::new(registry());
    let store = StoreHandle::unbound();

    let err = resolver
        .resolve(&store, "category_id", &Value::Int(5))
        .expect_err("resolving through an unbound handle should fail");
    assert_eq!(err, ResolveError::InvalidStore);
    assert_eq!(err.class(), ErrorClass::InvariantViolation);
}

#[test]
fn repeated_calls_are_idempotent() {
    let resolver = Resolver::new(registry());
    let store = bound_store();

    let first: Category = resolver
        .resolve_as(&store, "category_id", &Value::Int(5))
        .expect("first call should resolve");
    let second: Category = resolver
        .resolve_as(&store, "category_id", &Value::Int(5))
        .expect("second call should resolve");
    assert_eq!(first, second);

    let miss_a = resolver.resolve(&store, "tag_id", &Value::Int(5));
    let miss_b = resolver.resolve(&store, "tag_id", &Value::Int(5));
    assert_eq!(
        miss_a.expect_err("tags stays unregistered"),
        miss_b.expect_err("tags stays unregistered"),
    );
}

#[test]
fn hydrate_failures_surface_as_store_decode_errors() {
    let registry = ModelRegistry::new();
    registry.register("categories", || Box::new(Category::default()));
    let resolver = Resolver::new(Arc::new(registry));

    // Row lacks the name field the Category hydrate requires.
    let store = MemStore::new();
    store.insert("categories", Row::new().with("id", 5i64));
    let handle = StoreHandle::bound(Arc::new(store));

    let err = resolver
        .resolve(&handle, "category_id", &Value::Int(5))
        .expect_err("short row should fail hydration");
    assert_eq!(err.class(), ErrorClass::Corruption);
    assert!(matches!(err, ResolveError::Store { .. }));
}

static SINK: LazyLock<CounterSink> = LazyLock::new(CounterSink::new);

#[test]
fn resolution_outcomes_feed_the_metrics_sink() {
    let sink: &'static CounterSink = LazyLock::force(&SINK);
    let resolver = Resolver::new(registry()).metrics_sink(sink);
    let store = bound_store();

    resolver
        .resolve(&store, "category_id", &Value::Int(5))
        .expect("hit");
    let _ = resolver.resolve(&store, "category_id", &Value::Int(999));

    let snapshot = sink.snapshot();
    assert_eq!(snapshot.attempts, 2);
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.misses, 1);
    let counters = snapshot
        .tables
        .get("categories")
        .expect("categories counters should exist");
    assert_eq!(counters.misses_by_class.get("not_found"), Some(&1));
}

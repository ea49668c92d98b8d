//! RefCast: name-driven foreign-key resolution over pluggable stores.
//!
//! Given a foreign-key-shaped field name (`"category_id"`) and a value, the
//! resolver derives the backing table (`"categories"`), consults a
//! process-scoped registry of entity factories, issues a single
//! equality-filtered one-row fetch against the bound store, and returns the
//! hydrated entity, optionally narrowed to a concrete type.
//!
//! ## Crate layout
//! - `naming`: the pure field-name → table derivation rule.
//! - `registry`: table → entity-factory mapping.
//! - `resolver`: orchestration and the public resolve operations.
//! - `store`: the store collaborator boundary plus an in-memory backend.
//! - `record`, `value`: entity instances, rows, and dynamic field values.
//! - `error`: the resolution failure taxonomy.
//! - `obs`: metrics sink abstractions.

pub mod error;
pub mod naming;
pub mod obs;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod value;

/// Crate version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No sinks, backends, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        error::ResolveError,
        naming::{FieldShape, TableName},
        record::{EntityFactory, Record},
        registry::ModelRegistry,
        resolver::Resolver,
        store::{Store, StoreHandle},
        value::{Row, Value},
    };
}

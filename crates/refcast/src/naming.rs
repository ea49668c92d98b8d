//! Field-name → table derivation.
//!
//! Everything here is pure and deterministic: same input, same output, no
//! state. The resolver is the only consumer, but the rule is exposed so
//! callers can pre-compute or audit derivations.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Conventional suffix marking a field as a reference to another entity's
/// primary identifier.
pub const FK_SUFFIX: &str = "_id";

/// Query field used for foreign-key-shaped lookups.
pub const ID_FIELD: &str = "id";

/// Irregular singular → plural pairs the suffix rules get wrong.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

///
/// TableName
///
/// Plural lowercase identifier naming a collection of entities. The unique
/// key into the model registry. Lowercased on construction so derivation
/// and registration cannot disagree on case.
///

#[derive(
    Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct TableName(String);

impl TableName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_ascii_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TableName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

///
/// FieldShape
///
/// Classification of a lookup field name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldShape {
    /// `<noun>_id`: query `id` in the derived plural table. The table is
    /// empty when the stem is (`"_id"`); the resolver rejects that case.
    ForeignKey { table: TableName },

    /// No foreign-key suffix. The table cannot be soundly inferred; callers
    /// must name it explicitly.
    Bare,
}

/// Classify a field name, deriving the backing table for foreign-key shapes.
#[must_use]
pub fn classify(field: &str) -> FieldShape {
    match field.strip_suffix(FK_SUFFIX) {
        Some(stem) => FieldShape::ForeignKey {
            table: TableName::new(pluralize(stem)),
        },
        None => FieldShape::Bare,
    }
}

/// English singular → plural for table-identifier derivation.
///
/// Covers the regular suffix rules (`s/x/z/ch/sh` → `es`, consonant-`y` →
/// `ies`, `f`/`fe` → `ves`) and a short irregular table. Empty input stays
/// empty.
#[must_use]
pub fn pluralize(noun: &str) -> String {
    let noun = noun.to_ascii_lowercase();
    if noun.is_empty() {
        return noun;
    }

    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(s, _)| *s == noun) {
        return (*plural).to_string();
    }

    if noun.ends_with('s')
        || noun.ends_with('x')
        || noun.ends_with('z')
        || noun.ends_with("ch")
        || noun.ends_with("sh")
    {
        return format!("{noun}es");
    }

    if let Some(stem) = noun.strip_suffix('y') {
        match stem.chars().last() {
            Some(c) if !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') => {
                return format!("{stem}ies");
            }
            _ => {}
        }
    }

    if let Some(stem) = noun.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    if let Some(stem) = noun.strip_suffix('f') {
        return format!("{stem}ves");
    }

    format!("{noun}s")
}

///
/// ResolvedQuery
///
/// Ephemeral (table, query field) pair derived per call. Never persisted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedQuery {
    pub table: TableName,
    pub field: String,
}

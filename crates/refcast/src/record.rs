use crate::value::Row;
use std::{any::Any, fmt::Debug};
use thiserror::Error as ThisError;

///
/// HydrateError
///
/// Row → entity population failures. Surfaced to resolver callers as a
/// store-level decode failure.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum HydrateError {
    #[error("row is missing field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' is not {expected}, found {found}")]
    FieldType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

///
/// Record
///
/// Object-safe contract for stored entities. Factories produce blank
/// instances; the resolver populates them from the fetched row.
///

pub trait Record: Any + Debug {
    /// Populate this blank instance from a fetched row.
    fn hydrate(&mut self, row: &Row) -> Result<(), HydrateError>;
}

///
/// EntityFactory
///
/// Zero-argument pure producer of a blank entity instance. The registry
/// holds factories for the process lifetime; each call returns a newly
/// allocated instance owned by the caller.
///

pub type EntityFactory = fn() -> Box<dyn Record>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Row;

    #[derive(Debug, Default, PartialEq)]
    struct Widget {
        id: u64,
        label: String,
    }

    impl Record for Widget {
        fn hydrate(&mut self, row: &Row) -> Result<(), HydrateError> {
            self.id = row.require_u64("id")?;
            self.label = row.require_text("label")?.to_string();
            Ok(())
        }
    }

    #[test]
    fn factory_produces_distinct_blank_instances() {
        let factory: EntityFactory = || Box::new(Widget::default());
        let a = factory();
        let b = factory();
        let a_addr = std::ptr::from_ref::<dyn Record>(a.as_ref()).cast::<()>();
        let b_addr = std::ptr::from_ref::<dyn Record>(b.as_ref()).cast::<()>();
        assert_ne!(
            a_addr, b_addr,
            "each factory call should allocate a fresh instance"
        );
    }

    #[test]
    fn hydrate_fills_a_blank_instance() {
        let mut widget = Widget::default();
        let row = Row::new().with("id", 7u64).with("label", "crate");
        widget.hydrate(&row).expect("well-formed row should hydrate");
        assert_eq!(
            widget,
            Widget {
                id: 7,
                label: "crate".to_string()
            }
        );
    }
}

//! Database repository implementations
//!
//! One generic SeaORM collection type instantiated per resource, plus the
//! unified Collections provider handed to the API layer.

pub mod collection;

pub use collection::{Collection, Collections};

//! Schema loading: resolves the primary validation rule from disk.

mod loader;

pub use loader::{SchemaLoadError, SchemaLoader};

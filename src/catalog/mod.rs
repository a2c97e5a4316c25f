//! Duck catalog wiring.
//!
//! Identity types name categories and implementations, `model` holds the
//! on-disk document and the runtime `Duck`, and `DuckCatalog` is the validated
//! ordered roster that the simulator dispatches against.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{BehaviorCategory, CatalogKey, ImplementationName};
pub use index::{CATALOG_SCHEMA_VERSION, DuckCatalog};
pub use model::{
    BindingSnapshot, CatalogDocument, CatalogSnapshot, Duck, DuckDefinition, DuckSnapshot,
};

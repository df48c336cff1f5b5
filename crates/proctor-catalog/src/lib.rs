//! proctor-catalog — In-memory registry of published tests.
//!
//! The catalog is the thin collaborator between the authoring surface and
//! the session engine: it gates publication, hands takers the browsable
//! subset, and holds nothing beyond transient memory.

pub mod catalog;
pub mod gate;

pub use catalog::{Catalog, CatalogError, CatalogStats};
pub use gate::{AccessDenied, AccessGate, DenyAll, Role};

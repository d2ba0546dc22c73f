//! Schema layer: typed descriptors for bot configuration values.
//!
//! The server ships a conventional JSON schema (`{type, properties?, items?}`)
//! next to each configuration. We resolve it once into a `SchemaNode` tree so
//! flatten/reconstruct never have to sniff shapes on the fly.
//!
//! It owns:
//! - SchemaNode / ObjectKind / ElementKind (resolved descriptor tree)
//! - SchemaModel (root node + path lookup with a permissive string fallback)

pub mod node;

pub use node::{ElementKind, Kind, ObjectKind, SchemaModel, SchemaNode};

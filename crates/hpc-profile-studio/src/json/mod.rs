//! Generic access to nested JSON documents.
//!
//! This module handles:
//! - Resolving ordered key paths through a document
//! - Lenient numeric coercion of resolved values
//! - Rendering the key tree of a document

pub mod coerce;
pub mod keys;
pub mod path;

// Re-export main types
pub use coerce::{as_f64, as_u64, number_array, path_array, path_f64, path_u64};
pub use keys::render_key_tree;
pub use path::{lookup, resolve, resolve_all, FieldKey, FieldPath};

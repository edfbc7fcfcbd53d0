//! Constraint-name derivation and uniqueness
//!
//! - [`sanitize`]: identifier normalization
//! - [`registry`]: names already used in a document
//! - [`resolver`]: candidate construction and collision handling

pub mod registry;
pub mod resolver;
pub mod sanitize;

pub use registry::NameRegistry;
pub use resolver::{ForeignKeyIdentity, NameResolver};
pub use sanitize::{normalize_columns, sanitize};

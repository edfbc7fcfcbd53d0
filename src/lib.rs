//! fk-name-fix: names unnamed foreign keys in Liquibase XML changelogs
//!
//! Diff tools that read schema metadata from drivers without constraint-name
//! support (SQLite, for one) emit `<addForeignKeyConstraint>` elements with no
//! `constraintName`. This library parses such a changelog, gives every
//! unnamed foreign key a deterministic, document-unique name of the form
//! `fk_<base>_<columns>_to_<referenced>`, and writes the result back while
//! leaving the rest of the document alone.

pub mod changelog;
pub mod config;
pub mod fixer;
pub mod locator;
pub mod naming;
pub mod output;

// Re-export commonly used types
pub use changelog::{ChangelogDocument, DocumentError, ParseError};
pub use config::Config;
pub use fixer::{FixReport, Injection, fix_document};
pub use naming::{NameRegistry, NameResolver};

//! Derives constraint names from a foreign key's identity.

use crate::config::{NamingConfig, Placeholders};
use crate::locator::ForeignKey;
use crate::naming::registry::NameRegistry;
use crate::naming::sanitize::{normalize_columns, sanitize};
use serde::Serialize;
use std::borrow::Cow;

/// The attributes a generated name is built from, with placeholders already
/// substituted for anything missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyIdentity {
    pub base_table: String,
    /// Column list joined with single underscores.
    pub base_columns: String,
    pub referenced_table: String,
}

impl ForeignKeyIdentity {
    /// Read the identity of a foreign-key element.
    ///
    /// Absent or empty attributes fall back to the placeholders, as does a
    /// column list made only of separators.
    pub fn from_foreign_key(fk: &ForeignKey<'_>, placeholders: &Placeholders) -> Self {
        let base_columns = fk
            .base_columns()
            .map(|cols| normalize_columns(&cols))
            .filter(|cols| !cols.is_empty())
            .unwrap_or_else(|| placeholders.base_columns.clone());

        Self {
            base_table: or_placeholder(fk.base_table(), &placeholders.base_table),
            base_columns,
            referenced_table: or_placeholder(fk.referenced_table(), &placeholders.referenced_table),
        }
    }
}

fn or_placeholder(value: Option<Cow<'_, str>>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.into_owned(),
        _ => placeholder.to_string(),
    }
}

/// Builds `<prefix>_<base>_<columns>_<link>_<referenced>` names and makes
/// them unique through a [`NameRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    naming: &'a NamingConfig,
}

impl<'a> NameResolver<'a> {
    pub fn new(naming: &'a NamingConfig) -> Self {
        Self { naming }
    }

    /// The name before any collision suffix.
    pub fn candidate(&self, identity: &ForeignKeyIdentity) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.naming.prefix,
            sanitize(&identity.base_table),
            sanitize(&identity.base_columns),
            self.naming.link,
            sanitize(&identity.referenced_table)
        )
    }

    /// Pick a name for `identity` that no earlier name in `registry` uses,
    /// and record it there.
    pub fn resolve(&self, identity: &ForeignKeyIdentity, registry: &mut NameRegistry) -> String {
        let candidate = self.candidate(identity);
        let name = registry.claim(&candidate);
        if name != candidate {
            tracing::debug!(candidate = %candidate, resolved = %name, "constraint name collision");
        }
        name
    }
}

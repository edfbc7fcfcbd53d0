//! The two-pass naming run over one changelog.
//!
//! Pass 1 reserves every `constraintName` already present anywhere in the
//! document. Pass 2 walks the foreign keys in document order and gives each
//! unnamed one a resolved name, updating the registry as it goes. The
//! document is only mutated here; writing it out is left to the caller.

use crate::changelog::ChangelogDocument;
use crate::config::NamingConfig;
use crate::locator::{self, CONSTRAINT_NAME};
use crate::naming::{ForeignKeyIdentity, NameRegistry, NameResolver};
use serde::Serialize;
use std::fmt;

/// One name written onto a foreign-key element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Injection {
    pub constraint_name: String,
    #[serde(flatten)]
    pub identity: ForeignKeyIdentity,
}

impl fmt::Display for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "constraintName='{}' for FK {}({}) -> {}",
            self.constraint_name,
            self.identity.base_table,
            self.identity.base_columns,
            self.identity.referenced_table
        )
    }
}

/// Outcome of [`fix_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    /// Names injected, in document order.
    pub injections: Vec<Injection>,
    /// Foreign keys that already carried a name and were left alone.
    pub already_named: usize,
}

impl FixReport {
    /// Whether the document was changed and needs to be written.
    pub fn is_modified(&self) -> bool {
        !self.injections.is_empty()
    }
}

/// Collect every non-empty `constraintName` in the document, on any element.
pub fn existing_names(doc: &ChangelogDocument) -> NameRegistry {
    doc.elements()
        .filter_map(|el| el.attributes().get(CONSTRAINT_NAME))
        .filter(|name| !name.is_empty())
        .map(|name| name.into_owned())
        .collect()
}

/// Name every unnamed foreign key in `doc`.
pub fn fix_document(doc: &mut ChangelogDocument, naming: &NamingConfig) -> FixReport {
    let mut registry = existing_names(doc);
    tracing::debug!(existing = registry.len(), "collected existing constraint names");

    let resolver = NameResolver::new(naming);
    let mut report = FixReport::default();

    for mut fk in locator::foreign_keys_mut(doc) {
        let view = fk.view();
        if let Some(name) = view.constraint_name() {
            tracing::debug!(constraint_name = %name, "foreign key already named");
            report.already_named += 1;
            continue;
        }

        let identity = ForeignKeyIdentity::from_foreign_key(&view, &naming.placeholders);
        let name = resolver.resolve(&identity, &mut registry);
        fk.set_constraint_name(&name);
        report.injections.push(Injection {
            constraint_name: name,
            identity,
        });
    }

    tracing::info!(
        injected = report.injections.len(),
        already_named = report.already_named,
        "foreign key naming finished"
    );
    report
}

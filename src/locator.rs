//! Finds `addForeignKeyConstraint` elements anywhere in a changelog
//!
//! Matching is done on the element's local name, so
//! `<addForeignKeyConstraint>`, `<lb:addForeignKeyConstraint>` and an element
//! in the default Liquibase namespace are all found the same way.

use crate::changelog::{Attributes, ChangelogDocument, Element, ElementMut, TagName};
use std::borrow::Cow;

/// Local name of a foreign-key change element.
pub const FOREIGN_KEY_TAG: &str = "addForeignKeyConstraint";

pub const CONSTRAINT_NAME: &str = "constraintName";
pub const BASE_TABLE_NAME: &str = "baseTableName";
pub const BASE_COLUMN_NAMES: &str = "baseColumnNames";
pub const REFERENCED_TABLE_NAME: &str = "referencedTableName";

/// Whether an element with this name declares a foreign key.
pub fn is_foreign_key(name: &TagName) -> bool {
    name.local() == FOREIGN_KEY_TAG
}

/// Read-only view of a foreign-key element.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey<'a> {
    attributes: &'a Attributes,
}

impl<'a> ForeignKey<'a> {
    pub fn new(attributes: &'a Attributes) -> Self {
        Self { attributes }
    }

    /// The `constraintName`, if present and non-empty.
    pub fn constraint_name(&self) -> Option<Cow<'a, str>> {
        self.attributes
            .get(CONSTRAINT_NAME)
            .filter(|name| !name.is_empty())
    }

    pub fn base_table(&self) -> Option<Cow<'a, str>> {
        self.attributes.get(BASE_TABLE_NAME)
    }

    pub fn base_columns(&self) -> Option<Cow<'a, str>> {
        self.attributes.get(BASE_COLUMN_NAMES)
    }

    pub fn referenced_table(&self) -> Option<Cow<'a, str>> {
        self.attributes.get(REFERENCED_TABLE_NAME)
    }
}

/// Writable view of a foreign-key element. Changes land in the document.
pub struct ForeignKeyMut<'a> {
    attributes: &'a mut Attributes,
}

impl<'a> ForeignKeyMut<'a> {
    pub fn view(&self) -> ForeignKey<'_> {
        ForeignKey::new(&*self.attributes)
    }

    pub fn set_constraint_name(&mut self, name: &str) {
        self.attributes.set(CONSTRAINT_NAME, name);
    }
}

/// Every foreign-key element in document order.
pub fn foreign_keys(doc: &ChangelogDocument) -> impl Iterator<Item = &Element> {
    doc.elements().filter(|el| is_foreign_key(el.name()))
}

/// Writable views of every foreign-key element, in the same order as
/// [`foreign_keys`].
pub fn foreign_keys_mut(doc: &mut ChangelogDocument) -> impl Iterator<Item = ForeignKeyMut<'_>> {
    doc.elements_mut()
        .filter(|el| is_foreign_key(el.name))
        .map(|ElementMut { attributes, .. }| ForeignKeyMut { attributes })
}

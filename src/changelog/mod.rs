//! In-memory model of a Liquibase XML changelog
//!
//! The document is parsed once into an owned tree of [`Node`]s and can be
//! mutated in place before being written back. Everything the fixer does not
//! touch (comments, whitespace, processing instructions, start tags of
//! unmodified elements with their quoting and line breaks) is carried through
//! unchanged.

use quick_xml::escape::{escape, unescape};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod reader;
mod traverse;
mod writer;

pub use traverse::{ElementMut, Elements, ElementsMut};

/// Malformed input that could not be turned into a [`ChangelogDocument`].
#[derive(Debug, Error)]
#[error("XML parse error at position {position}: {message}")]
pub struct ParseError {
    /// Byte offset in the source where the problem was detected.
    pub position: u64,
    pub message: String,
}

/// Errors raised while loading or storing a changelog file.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to serialize changelog: {0}")]
    Serialize(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The `<?xml ...?>` declaration of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            standalone: None,
        }
    }
}

/// A parsed changelog: optional declaration plus the top-level nodes.
///
/// Exactly one of the top-level nodes is an [`Element`] (the root); the rest
/// are comments, whitespace, processing instructions or a doctype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    declaration: Option<Declaration>,
    nodes: Vec<Node>,
}

impl ChangelogDocument {
    /// Parse a changelog from its textual form.
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        reader::parse_document(xml)
    }

    /// Parse a changelog from raw bytes.
    ///
    /// The bytes are decoded using a byte order mark if there is one,
    /// otherwise the encoding named in the XML declaration, otherwise UTF-8.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let xml = reader::decode_source(bytes)?;
        Self::parse(&xml)
    }

    /// Read and parse a changelog file.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|e| DocumentError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_bytes(&bytes).map_err(|e| DocumentError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Serialize the tree as UTF-8 text with an XML declaration.
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        writer::write_document(self)
    }

    /// Serialize and atomically replace the file at `path`.
    ///
    /// The new content goes to a temporary file next to the target which is
    /// then renamed over it, so a failure never leaves a half-written file.
    pub fn write_to_file(&self, path: &Path) -> Result<(), DocumentError> {
        let xml = self.to_xml()?;
        writer::replace_file(path, xml.as_bytes()).map_err(|e| DocumentError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// Top-level nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The document element. Always present on parsed documents.
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Every element in the document, depth-first in document order.
    pub fn elements(&self) -> Elements<'_> {
        Elements::new(&self.nodes)
    }

    /// Mutable counterpart of [`elements`](Self::elements).
    pub fn elements_mut(&mut self) -> ElementsMut<'_> {
        ElementsMut::new(&mut self.nodes)
    }
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, kept escaped exactly as it appeared in the source.
    Text(String),
    CData(String),
    /// Comment body, without the `<!--` / `-->` delimiters.
    Comment(String),
    /// Processing instruction body, without `<?` / `?>`.
    ProcessingInstruction(String),
    /// Doctype declaration exactly as written, delimiters included.
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: TagName,
    pub attributes: Attributes,
    pub children: Vec<Node>,
    /// Written as `<tag/>` in the source.
    pub self_closing: bool,
    /// Start tag exactly as written, reused on output while the attributes
    /// are unmodified.
    pub(crate) source_tag: Option<String>,
}

impl Element {
    pub fn name(&self) -> &TagName {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// Tag name of an element, with its local part resolved once at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName {
    qualified: String,
    local: String,
    namespace: Option<String>,
}

impl TagName {
    /// Build a tag name from the name as written (`prefix:local` or `local`)
    /// and the namespace URI it resolved to, if any.
    pub fn new(qualified: impl Into<String>, namespace: Option<String>) -> Self {
        let qualified = qualified.into();
        let local = local_name(&qualified).to_string();
        Self {
            qualified,
            local,
            namespace,
        }
    }

    /// The name as written in the source, prefix included.
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// The name without any namespace qualifier.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Namespace URI bound to the element, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Clark notation: `{uri}local`, or just `local` without a namespace.
    pub fn expanded(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.local),
            None => self.local.clone(),
        }
    }
}

/// Strip any namespace qualifier from a tag.
///
/// Handles both Clark notation (`{uri}local`) and prefixed names
/// (`prefix:local`).
pub fn local_name(tag: &str) -> &str {
    let tag = match tag.rsplit_once('}') {
        Some((_, local)) => local,
        None => tag,
    };
    match tag.rsplit_once(':') {
        Some((_, local)) => local,
        None => tag,
    }
}

/// A single attribute, keeping the value escaped as in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub raw_value: String,
}

impl Attribute {
    /// The unescaped value. Falls back to the raw text for values holding
    /// entity references the XML core does not define.
    pub fn value(&self) -> Cow<'_, str> {
        match unescape(&self.raw_value) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key = %self.key, "could not unescape attribute value: {}", err);
                Cow::Borrowed(&self.raw_value)
            }
        }
    }
}

/// Ordered attribute list of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    items: Vec<Attribute>,
    /// Set once [`set`](Self::set) has changed the list.
    modified: bool,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unescaped value of the attribute named `key`.
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.items.iter().find(|a| a.key == key).map(Attribute::value)
    }

    /// Set `key` to `value`, replacing an existing value in place or
    /// appending a new attribute at the end.
    pub fn set(&mut self, key: &str, value: &str) {
        let raw_value = escape(value).into_owned();
        match self.items.iter_mut().find(|a| a.key == key) {
            Some(attr) if attr.raw_value == raw_value => return,
            Some(attr) => attr.raw_value = raw_value,
            None => self.items.push(Attribute {
                key: key.to_string(),
                raw_value,
            }),
        }
        self.modified = true;
    }

    /// Whether any attribute changed since parsing.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push_raw(&mut self, key: String, raw_value: String) {
        self.items.push(Attribute { key, raw_value });
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

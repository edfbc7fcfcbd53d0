//! Serializes a [`ChangelogDocument`] back to XML text.

use super::{ChangelogDocument, DocumentError, Element, Node};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write the whole document as UTF-8.
///
/// The source declaration's version and standalone flag are kept and the
/// encoding is always stated as UTF-8. Documents without a declaration get
/// one, followed by a line break.
pub(super) fn write_document(doc: &ChangelogDocument) -> Result<String, DocumentError> {
    let mut writer = Writer::new(Vec::new());

    let decl = doc.declaration().cloned().unwrap_or_default();
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new(
            &decl.version,
            Some("UTF-8"),
            decl.standalone.as_deref(),
        )),
    )?;
    if doc.declaration().is_none() {
        writer.get_mut().push(b'\n');
    }

    for node in doc.nodes() {
        write_node(&mut writer, node)?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| DocumentError::Serialize(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), DocumentError> {
    match node {
        Node::Element(el) => write_element(writer, el),
        Node::Text(raw) => emit(writer, Event::Text(BytesText::from_escaped(raw.as_str()))),
        Node::CData(text) => emit(writer, Event::CData(BytesCData::new(text.as_str()))),
        Node::Comment(raw) => emit(writer, Event::Comment(BytesText::from_escaped(raw.as_str()))),
        Node::ProcessingInstruction(body) => emit(writer, Event::PI(BytesPI::new(body.as_str()))),
        Node::DocType(raw) => {
            writer.get_mut().extend_from_slice(raw.as_bytes());
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<(), DocumentError> {
    let name = el.name().qualified();
    let empty = el.self_closing && el.children().is_empty();

    match &el.source_tag {
        Some(raw) if !el.attributes().is_modified() && el.self_closing == empty => {
            writer.get_mut().extend_from_slice(raw.as_bytes());
            if empty {
                return Ok(());
            }
        }
        _ => {
            let mut start = BytesStart::new(name);
            for attr in el.attributes() {
                // Values read from single-quoted attributes may hold a bare `"`.
                let value = attr.raw_value.replace('"', "&quot;");
                start.push_attribute((attr.key.as_bytes(), value.as_bytes()));
            }
            if empty {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
        }
    }

    for child in el.children() {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// Symlinks are followed so the link target is updated, and the original
/// permissions are carried over to the new file.
pub(super) fn replace_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let target: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    if let Ok(meta) = std::fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

//! Builds a [`ChangelogDocument`] tree from XML text using `quick-xml`.
//!
//! Text, comments and attribute values are stored in their escaped source
//! form so that a later write reproduces them without re-encoding.

use super::{Attributes, ChangelogDocument, Declaration, Element, Node, ParseError, TagName};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::attributes::Attributes as XmlAttributes;
use quick_xml::events::{BytesDecl, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Reader};
use std::borrow::Cow;

/// An element whose end tag has not been seen yet.
struct OpenElement {
    element: Element,
}

/// Parse a complete document.
///
/// Requires exactly one root element, balanced tags, bound namespace
/// prefixes, and no character data outside the root other than whitespace.
pub(super) fn parse_document(xml: &str) -> Result<ChangelogDocument, ParseError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut declaration: Option<Declaration> = None;
    let mut top_level: Vec<Node> = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();
    let mut seen_root = false;
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(reader.buffer_position() as u64, &e.to_string()))?;
        let markup = xml.get(position as usize..reader.buffer_position() as usize);

        match event {
            Event::Eof => break,
            Event::Decl(ref d) => {
                if declaration.is_some() || seen_root || !top_level.is_empty() {
                    return Err(parse_error(
                        position,
                        "XML declaration is only allowed at the start of the document",
                    ));
                }
                declaration = Some(read_declaration(d, position)?);
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                let self_closing = matches!(event, Event::Empty(_));
                if open.is_empty() {
                    if seen_root {
                        return Err(parse_error(position, "junk after document element"));
                    }
                    seen_root = true;
                }

                let (resolved, _) = reader.resolve_element(e.name());
                let namespace = match resolved {
                    ResolveResult::Bound(ns) => Some(lossy(ns.0)),
                    ResolveResult::Unbound => None,
                    ResolveResult::Unknown(prefix) => {
                        return Err(parse_error(
                            position,
                            &format!("unbound namespace prefix '{}'", lossy(&prefix)),
                        ));
                    }
                };

                let element = Element {
                    name: TagName::new(lossy(e.name().as_ref()), namespace),
                    attributes: collect_attributes(e.attributes(), position)?,
                    children: Vec::new(),
                    self_closing,
                    source_tag: markup.map(str::to_string),
                };

                if self_closing {
                    attach(&mut open, &mut top_level, Node::Element(element));
                } else {
                    open.push(OpenElement { element });
                }
            }
            Event::End(ref e) => {
                let name = lossy(e.name().as_ref());
                let Some(closed) = open.pop() else {
                    return Err(parse_error(position, &format!("unexpected end tag </{}>", name)));
                };
                if closed.element.name.qualified() != name {
                    return Err(parse_error(
                        position,
                        &format!(
                            "expected </{}>, found </{}>",
                            closed.element.name.qualified(),
                            name
                        ),
                    ));
                }
                attach(&mut open, &mut top_level, Node::Element(closed.element));
            }
            Event::Text(ref e) => {
                let raw = lossy(e);
                if open.is_empty() && !raw.trim().is_empty() {
                    return Err(parse_error(
                        position,
                        "character data outside the document element",
                    ));
                }
                attach(&mut open, &mut top_level, Node::Text(raw));
            }
            Event::CData(ref e) => {
                if open.is_empty() {
                    return Err(parse_error(
                        position,
                        "CDATA section outside the document element",
                    ));
                }
                attach(&mut open, &mut top_level, Node::CData(lossy(e)));
            }
            Event::Comment(ref e) => {
                attach(&mut open, &mut top_level, Node::Comment(lossy(e)));
            }
            Event::PI(ref e) => {
                attach(&mut open, &mut top_level, Node::ProcessingInstruction(lossy(e)));
            }
            Event::DocType(ref e) => {
                if seen_root {
                    return Err(parse_error(position, "DOCTYPE after the document element"));
                }
                let raw = match markup {
                    Some(raw) => raw.to_string(),
                    None => format!("<!DOCTYPE {}>", lossy(e)),
                };
                attach(&mut open, &mut top_level, Node::DocType(raw));
            }
        }

        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(parse_error(
            reader.buffer_position() as u64,
            &format!("unclosed element <{}>", unclosed.element.name.qualified()),
        ));
    }
    if !seen_root {
        return Err(parse_error(reader.buffer_position() as u64, "no element found"));
    }

    Ok(ChangelogDocument {
        declaration,
        nodes: top_level,
    })
}

/// Decode raw file bytes into text.
///
/// A byte order mark wins, then the encoding named in the XML declaration,
/// then UTF-8. Bytes that are invalid in the chosen encoding are an error.
pub(super) fn decode_source(bytes: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| parse_error(0, &format!("document is not valid {}", encoding.name())))
}

/// The encoding named by a leading `<?xml ... encoding="..."?>`, if any.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    let Ok(Event::Decl(decl)) = reader.read_event() else {
        return Ok(None);
    };
    let Some(label) = decl.encoding() else {
        return Ok(None);
    };
    let label =
        label.map_err(|e| parse_error(0, &format!("invalid XML declaration: {}", e)))?;
    let encoding = Encoding::for_label(&label)
        .ok_or_else(|| parse_error(0, &format!("unsupported encoding '{}'", lossy(&label))))?;
    // Without a byte order mark the bytes read as ASCII, so a declared
    // UTF-16 cannot be right; fall back to UTF-8 like other parsers do.
    if encoding.is_ascii_compatible() {
        Ok(Some(encoding))
    } else {
        Ok(None)
    }
}

/// Append a finished node to the innermost open element, or to the top level.
fn attach(open: &mut [OpenElement], top_level: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.element.children.push(node),
        None => top_level.push(node),
    }
}

fn read_declaration(decl: &BytesDecl<'_>, position: u64) -> Result<Declaration, ParseError> {
    let version = decl
        .version()
        .map_err(|e| parse_error(position, &format!("invalid XML declaration: {}", e)))?;
    let standalone = match decl.standalone() {
        Some(value) => Some(lossy(
            &value.map_err(|e| parse_error(position, &format!("invalid XML declaration: {}", e)))?,
        )),
        None => None,
    };
    Ok(Declaration {
        version: lossy(&version),
        standalone,
    })
}

/// Collect attributes as (name, raw escaped value) pairs, in source order.
fn collect_attributes(attrs: XmlAttributes<'_>, position: u64) -> Result<Attributes, ParseError> {
    let mut collected = Attributes::new();
    for attr_result in attrs {
        let attr = attr_result.map_err(|err| {
            parse_error(position, &format!("Failed to parse XML attribute: {}", err))
        })?;
        collected.push_raw(lossy(attr.key.as_ref()), lossy(&attr.value));
    }
    Ok(collected)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn parse_error(position: u64, message: &str) -> ParseError {
    ParseError {
        position,
        message: message.to_string(),
    }
}

/// Streaming XML parsing into opaque [`Element`] trees, and the reverse.
///
/// # Performance
///
/// Uses a single reusable event buffer and builds the tree with an explicit
/// element stack, so nesting depth never touches the call stack.
use crate::common::xml::{escape_text, escape_xml, unescape_xml};
use crate::ooxml::docx::tree::{Attribute, Element, Node};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as FmtWrite;

/// XML declaration written at the top of every serialized part.
pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Parse an XML document into its root element.
///
/// Comments, processing instructions and the declaration are dropped.
/// Character data is unescaped; entity and character references are
/// resolved.
pub fn parse(xml_bytes: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(xml_bytes);

    let mut stack: Vec<Element> = Vec::with_capacity(32);
    let mut root: Option<Element> = None;
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(element_from_start(&e)?);
            },
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            },
            Ok(Event::End(e)) => {
                let element = stack.pop().ok_or_else(|| {
                    OoxmlError::Xml(format!(
                        "unexpected closing tag at byte {}",
                        reader.buffer_position()
                    ))
                })?;
                if element.name.as_bytes() != e.name().as_ref() {
                    return Err(OoxmlError::Xml(format!(
                        "mismatched closing tag for <{}> at byte {}",
                        element.name,
                        reader.buffer_position()
                    )));
                }
                attach(&mut stack, &mut root, element)?;
            },
            Ok(Event::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|err| OoxmlError::Xml(err.to_string()))?;
                push_text(&mut stack, &unescape_xml(raw));
            },
            Ok(Event::CData(e)) => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|err| OoxmlError::Xml(err.to_string()))?;
                push_text(&mut stack, raw);
            },
            Ok(Event::GeneralRef(e)) => {
                let name = std::str::from_utf8(e.as_ref())
                    .map_err(|err| OoxmlError::Xml(err.to_string()))?;
                let resolved = resolve_reference(name).ok_or_else(|| {
                    OoxmlError::Xml(format!("unknown entity reference &{};", name))
                })?;
                push_text(&mut stack, &resolved);
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    if !stack.is_empty() {
        return Err(OoxmlError::Xml(format!(
            "unclosed element <{}>",
            stack[stack.len() - 1].name
        )));
    }
    root.ok_or_else(|| OoxmlError::Xml("document has no root element".to_string()))
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| OoxmlError::Xml(err.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OoxmlError::Xml(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| OoxmlError::Xml(err.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|err| OoxmlError::Xml(err.to_string()))?;
        attributes.push(Attribute::new(key, unescape_value(value)?));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Unescape an attribute value, resolving character references too.
fn unescape_value(raw: &str) -> Result<String> {
    if !raw.contains("&#") {
        return Ok(unescape_xml(raw));
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| OoxmlError::Xml(format!("unterminated reference in '{}'", raw)))?;
        let resolved = resolve_reference(&after[..end])
            .ok_or_else(|| OoxmlError::Xml(format!("unknown reference in '{}'", raw)))?;
        out.push_str(&resolved);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Resolve a predefined entity or a character reference (without `&` and `;`).
fn resolve_reference(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        },
    };
    Some(resolved.to_string())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(OoxmlError::Xml(format!(
                "second root element <{}>",
                element.name
            )));
        },
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    // Text outside the root element is insignificant whitespace.
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(Node::Text(prev)) = parent.children.last_mut() {
        prev.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

/// Serialize an element tree as a standalone XML document.
pub fn to_document(root: &Element) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    write_element(&mut xml, root);
    xml
}

/// Append an element and its subtree.
pub fn write_element(xml: &mut String, element: &Element) {
    open_tag(xml, &element.name, &element.attributes, element.children.is_empty());
    if element.children.is_empty() {
        return;
    }
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(xml, child),
            Node::Text(text) => xml.push_str(&escape_text(text)),
        }
    }
    close_tag(xml, &element.name);
}

/// Append a start tag, self-closing when `empty`.
pub fn open_tag(xml: &mut String, name: &str, attributes: &[Attribute], empty: bool) {
    xml.push('<');
    xml.push_str(name);
    for attr in attributes {
        let _ = write!(xml, " {}=\"{}\"", attr.name, escape_xml(&attr.value));
    }
    xml.push_str(if empty { "/>" } else { ">" });
}

/// Append an end tag.
#[inline]
pub fn close_tag(xml: &mut String, name: &str) {
    xml.push_str("</");
    xml.push_str(name);
    xml.push('>');
}

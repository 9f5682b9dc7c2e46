//! Generic XML tree for feed documents.
//!
//! The tree keeps element order, qualified names (`itunes:author`), attributes
//! apart from text content, and the text of each element with XML and HTML
//! entities decoded. CDATA sections are taken literally.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::MAX_XML_DEPTH;
use crate::error_handling::ParseError;

/// One element of a parsed feed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    /// Qualified element name, including any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text content of this element (not of its descendants), trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given qualified name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All child elements in document order.
    pub fn elements(&self) -> &[XmlNode] {
        &self.children
    }
}

/// Parses feed text into an [`XmlNode`] tree rooted at the document element.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed XML: syntax errors, mismatched or
/// unexpected end tags, elements left open at end of input, a missing or
/// repeated root element, or nesting deeper than [`MAX_XML_DEPTH`].
/// No recovery is attempted.
pub fn parse_feed(xml: &str) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| parse_error(&reader, e.to_string()))?;

        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(parse_error(
                        &reader,
                        format!("elements nested deeper than {MAX_XML_DEPTH}"),
                    ));
                }
                if stack.is_empty() && root.is_some() {
                    return Err(parse_error(&reader, "multiple root elements"));
                }
                let node = element_from_start(&start).map_err(|m| parse_error(&reader, m))?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = element_from_start(&start).map_err(|m| parse_error(&reader, m))?;
                attach(&mut stack, &mut root, node).map_err(|m| parse_error(&reader, m))?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| parse_error(&reader, "unexpected closing tag"))?;
                attach(&mut stack, &mut root, node).map_err(|m| parse_error(&reader, m))?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&text.into_inner()).into_owned();
                    parent.text.push_str(&html_escape::decode_html_entities(&raw));
                }
            }
            Event::CData(cdata) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(
            &reader,
            format!("unclosed element <{}>", open.name),
        ));
    }
    root.ok_or_else(|| parse_error(&reader, "no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlNode, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw: Cow<'_, str> = String::from_utf8_lossy(&attr.value);
        let value = html_escape::decode_html_entities(&raw).into_owned();
        attributes.push((key, value));
    }
    Ok(XmlNode {
        name,
        attributes,
        ..XmlNode::default()
    })
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), &'static str> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err("multiple root elements"),
    }
    Ok(())
}

fn parse_error(reader: &Reader<&[u8]>, message: impl Into<String>) -> ParseError {
    ParseError {
        position: reader.buffer_position() as u64,
        message: message.into(),
    }
}

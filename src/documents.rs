//! XML document tree
//!
//! This module turns raw bytes into a small, order-preserving element tree.
//! Namespace prefixes are dropped; elements and attributes are addressed by
//! local name only, which is all the xUnit format needs.

use crate::error::{DecodeError, Result};
use crate::limits::Limits;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local name of the element
    pub name: String,
    /// Attributes in document order, keyed by local name
    pub attributes: IndexMap<String, String>,
    /// Concatenated text and CDATA content
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Byte offset of the start tag
    pub position: usize,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: String::new(),
            children: Vec::new(),
            position: 0,
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append text content
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Child elements with the given local name, in document order
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |e| e.local_name() == local_name)
    }

    /// Last child element with the given local name
    pub fn last_child_named(&self, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .rev()
            .find(|e| e.local_name() == local_name)
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes(), &Limits::default())
    }

    /// Parse an XML document from bytes
    ///
    /// Parsing stops once the first root element is closed. A root that is
    /// never closed, or text outside of it, is a decode error.
    pub fn parse(xml: &[u8], limits: &Limits) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, position)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                            break;
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, position)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                        break;
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| {
                        DecodeError::new(err.to_string()).with_position(reader.buffer_position())
                    })?;
                    match element_stack.last_mut() {
                        Some(current) => current.push_text(&text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(DecodeError::new("text found outside of the root element")
                                .with_position(position)
                                .into())
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes).map_err(|err| {
                        DecodeError::new(err.to_string()).with_position(position)
                    })?;
                    match element_stack.last_mut() {
                        Some(current) => current.push_text(text),
                        None => {
                            return Err(DecodeError::new("CDATA found outside of the root element")
                                .with_position(position)
                                .into())
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(DecodeError::new(e.to_string())
                        .with_position(reader.buffer_position())
                        .into())
                }
                _ => {} // Declarations, comments, processing instructions, doctype
            }
            buf.clear();
        }

        if let Some(open) = element_stack.last() {
            return Err(DecodeError::new("unexpected end of input")
                .with_element(open.name.clone())
                .with_position(reader.buffer_position())
                .into());
        }

        Ok(doc)
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart, position: usize) -> Result<Element> {
        let name = std::str::from_utf8(start.local_name().as_ref())
            .map_err(|e| DecodeError::new(format!("invalid element name: {}", e)).with_position(position))?
            .to_string();

        let mut element = Element::new(name);
        element.position = position;

        for attr_result in start.attributes() {
            let attr = attr_result.map_err(|e| {
                DecodeError::new(e.to_string())
                    .with_element(element.name.clone())
                    .with_position(position)
            })?;

            let raw_key = attr.key.as_ref();
            if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
                continue;
            }

            let attr_name = std::str::from_utf8(attr.key.local_name().as_ref())
                .map_err(|e| {
                    DecodeError::new(format!("invalid attribute name: {}", e))
                        .with_element(element.name.clone())
                        .with_position(position)
                })?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| {
                    DecodeError::new(e.to_string())
                        .with_element(element.name.clone())
                        .with_position(position)
                })?
                .to_string();

            element.attributes.insert(attr_name, attr_value);
        }

        Ok(element)
    }
}

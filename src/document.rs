//! In-memory document tree assembled from the reader's event stream.
//!
//! The assembler is a generic consumer of the pull contract: it never
//! looks inside the reader, only at the navigation surface. Attributes
//! are collected through the cursor operations, including the text view,
//! so assembling a document exercises the whole event-stream contract.

use std::io::BufRead;

use crate::error::Result;
use crate::node::NodeKind;
use crate::reader::{GedcomReader, ROOT_NAME};

/// An element of an assembled document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in synthesis order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Child elements with the given tag name.
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |e| e.name == name)
    }
}

/// A fully assembled document. The root element is the synthetic
/// `GEDCOM` frame; records sit directly beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from a string.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with_filename(input, None)
    }

    /// Parse a document from a string with a filename for error messages.
    pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Self> {
        let mut reader = GedcomReader::with_filename(input.as_bytes(), filename);
        Self::read_from(&mut reader)
    }

    /// Assemble a document by draining a reader.
    pub fn read_from<R: BufRead>(reader: &mut GedcomReader<R>) -> Result<Self> {
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        while reader.advance()? {
            match reader.current_kind() {
                NodeKind::Element => {
                    let mut element = Element::new(reader.name().unwrap_or(ROOT_NAME));
                    let mut more = reader.move_to_first_attribute();
                    while more {
                        let name = reader.name().unwrap_or_default().to_string();
                        let value = if reader.read_attribute_as_text() {
                            reader.value().unwrap_or_default().to_string()
                        } else {
                            String::new()
                        };
                        element.attributes.push((name, value));
                        more = reader.move_to_next_attribute();
                    }
                    reader.move_to_element();
                    open.push(element);
                }
                NodeKind::EndElement => {
                    if let Some(element) = open.pop() {
                        match open.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            root: root.unwrap_or_else(|| Element::new(ROOT_NAME)),
        })
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }
}

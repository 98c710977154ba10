// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of a lossless markup document.
//!
//! The document is stored as a flat sequence of markup events in document order.
//! Elements expose their attributes for reading and writing; an element whose attributes
//! were never changed is written back exactly as it was read, as is every other
//! piece of the document (declarations, comments, text, end tags).
//!
//! Files are decoded according to their declared encoding (Materials Studio uses `latin1`)
//! and encoded back into the same encoding when written.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use regex::bytes::Regex;

use crate::errors::DocumentError;

fn declaration_regex() -> &'static Regex {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    DECLARATION.get_or_init(|| {
        Regex::new(r#"^\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).expect(
            "FATAL MATSTUDIO ERROR | document::declaration_regex | Could not compile regular expression.",
        )
    })
}

/// Get the encoding named in the declaration of the document. Defaults to UTF-8.
fn declared_encoding(bytes: &[u8]) -> &'static Encoding {
    declaration_regex()
        .captures(bytes)
        .and_then(|captures| captures.get(1))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Single element (start tag or empty-element tag) of a markup document.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// Name of the tag.
    name: String,
    /// Unescaped attributes in their original order.
    attributes: Vec<(String, String)>,
    /// Is this an empty-element tag (`<tag ... />`)?
    empty: bool,
    /// The tag as it was read from the file.
    raw: BytesStart<'static>,
    /// Has any attribute of the element been changed?
    modified: bool,
}

impl XmlElement {
    fn from_start(start: BytesStart<'static>, empty: bool) -> Result<Self, DocumentError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| DocumentError::InvalidAttribute(name.clone(), e.to_string()))?
                .into_owned();

            attributes.push((key, value));
        }

        Ok(XmlElement {
            name,
            attributes,
            empty,
            raw: start,
            modified: false,
        })
    }

    /// Get the name of the tag.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value of an attribute. Returns `None` if the element has no such attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether the element has an attribute.
    #[inline(always)]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over all attributes of the element in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set the value of an attribute. Existing attribute keeps its position,
    /// new attribute is appended after all the other attributes.
    ///
    /// Setting an attribute to the value it already has does not modify the element.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, old)) if old == value => (),
            Some((_, old)) => {
                *old = value.to_owned();
                self.modified = true;
            }
            None => {
                self.attributes.push((key.to_owned(), value.to_owned()));
                self.modified = true;
            }
        }
    }

    /// Remove an attribute from the element returning its value.
    /// Returns `None` (and does not modify the element) if there is no such attribute.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        self.modified = true;
        Some(self.attributes.remove(index).1)
    }

    /// Has the element been changed since it was read?
    #[inline(always)]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get the tag as it should be written out.
    fn to_start(&self) -> BytesStart<'static> {
        if !self.modified {
            return self.raw.clone();
        }

        let mut start = BytesStart::new(self.name.clone());
        for (key, value) in self.attributes.iter() {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        start
    }
}

/// Part of a markup document.
#[derive(Debug, Clone)]
enum Node {
    Element(XmlElement),
    Other(Event<'static>),
}

/// Markup document preserving everything it was read from.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    /// Encoding used when the document is written out.
    encoding: &'static Encoding,
}

impl FromStr for XmlDocument {
    type Err = DocumentError;

    /// Parse a markup document from a string.
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::from_str(string);
        let mut nodes = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Start(start) => {
                    nodes.push(Node::Element(XmlElement::from_start(start.into_owned(), false)?))
                }
                Event::Empty(start) => {
                    nodes.push(Node::Element(XmlElement::from_start(start.into_owned(), true)?))
                }
                other => nodes.push(Node::Other(other.into_owned())),
            }
        }

        Ok(XmlDocument {
            nodes,
            encoding: declared_encoding(string.as_bytes()),
        })
    }
}

impl XmlDocument {
    /// Read and parse a markup document from a file.
    ///
    /// The content is decoded using the byte order mark of the file or, if there is none,
    /// the encoding named in its declaration. Documents without declared encoding are read as UTF-8.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = filename.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DocumentError::FileNotFound(Box::from(path)),
            _ => DocumentError::CouldNotRead(Box::from(path), e),
        })?;

        let (encoding, content) = match Encoding::for_bom(&bytes) {
            Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
            None => (declared_encoding(&bytes), &bytes[..]),
        };

        let decoded = encoding
            .decode_without_bom_handling_and_without_replacement(content)
            .ok_or_else(|| DocumentError::Undecodable(Box::from(path), encoding.name()))?;

        let mut document: XmlDocument = decoded.parse()?;
        document.encoding = encoding;
        Ok(document)
    }

    /// Get the encoding the document is written in.
    #[inline(always)]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Get the first (root) element of the document.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Other(_) => None,
        })
    }

    /// Get mutable reference to the first (root) element of the document.
    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Other(_) => None,
        })
    }

    /// Iterate over all elements with the given tag in document order.
    pub fn elements<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.nodes.iter().filter_map(move |node| match node {
            Node::Element(e) if e.name == tag => Some(e),
            _ => None,
        })
    }

    /// Iterate mutably over all elements with the given tag in document order.
    pub fn elements_mut<'a>(
        &'a mut self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> + 'a {
        self.nodes.iter_mut().filter_map(move |node| match node {
            Node::Element(e) if e.name == tag => Some(e),
            _ => None,
        })
    }

    /// Get the first element with the given tag.
    pub fn first(&self, tag: &str) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(e) if e.name == tag => Some(e),
            _ => None,
        })
    }

    /// Get mutable reference to the first element with the given tag.
    pub fn first_mut(&mut self, tag: &str) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(e) if e.name == tag => Some(e),
            _ => None,
        })
    }

    /// Write the document into any writer using the encoding of the document.
    /// Characters that the encoding can't represent are written as character references.
    pub fn serialize<W: Write>(&self, mut output: W) -> std::io::Result<W> {
        let text = self.to_text()?;
        let (bytes, _, _) = self.encoding.encode(&text);
        output.write_all(&bytes)?;

        Ok(output)
    }

    /// Write the document into a UTF-8 string.
    fn to_text(&self) -> std::io::Result<String> {
        let mut writer = Writer::new(Vec::new());

        for node in self.nodes.iter() {
            let event = match node {
                Node::Element(e) if e.empty => Event::Empty(e.to_start()),
                Node::Element(e) => Event::Start(e.to_start()),
                Node::Other(event) => event.clone(),
            };

            writer
                .write_event(event)
                .map_err(|e| std::io::Error::new(ErrorKind::Other, e.to_string()))?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))
    }

    /// Write the document into a file.
    pub fn write_file(&self, filename: impl AsRef<Path>) -> Result<(), DocumentError> {
        let file = File::create(filename.as_ref())
            .map_err(|_| DocumentError::CouldNotCreate(Box::from(filename.as_ref())))?;

        let mut writer = self
            .serialize(BufWriter::new(file))
            .map_err(|_| DocumentError::CouldNotWrite(Box::from(filename.as_ref())))?;

        writer
            .flush()
            .map_err(|_| DocumentError::CouldNotWrite(Box::from(filename.as_ref())))
    }

    /// Write the document into a string.
    /// The content is not encoded, i.e. the string may differ from the file written by `write_file`
    /// in characters outside of ASCII.
    pub fn to_string_lossy(&self) -> String {
        self.to_text()
            .expect("FATAL MATSTUDIO ERROR | XmlDocument::to_string_lossy | Writing into memory failed.")
    }
}

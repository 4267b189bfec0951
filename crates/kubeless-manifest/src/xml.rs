//! Minimal lossless XML element tree on top of quick-xml
//!
//! Only what a pom needs: elements with attributes, text, CDATA and comments.
//! Processing instructions and the doctype are dropped; whitespace-only text
//! is dropped and reflowed by the indenting writer.

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::str;

const INDENT_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<name>text</name>`
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Element::new(name);
        element.children.push(XmlNode::Text(text.into()));
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element called `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Trimmed text content of the first child element called `name`
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).and_then(Element::text)
    }

    /// Concatenated text and CDATA content, trimmed; `None` when there is none
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        let mut found = false;
        for node in &self.children {
            if let XmlNode::Text(t) | XmlNode::CData(t) = node {
                text.push_str(t);
                found = true;
            }
        }
        found.then(|| text.trim().to_string())
    }

    pub fn push_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(XmlNode::Element(element));
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, String> {
        let name = str::from_utf8(start.name().as_ref())
            .map_err(|e| e.to_string())?
            .to_string();
        let mut element = Element::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = str::from_utf8(attr.key.as_ref())
                .map_err(|e| e.to_string())?
                .to_string();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            element.attributes.push((key, value.into_owned()));
        }
        Ok(element)
    }
}

/// A parsed document: comments ahead of the root element plus the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub(crate) comments: Vec<String>,
    pub(crate) root: Element,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        XmlDocument {
            comments: Vec::new(),
            root,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Parse a complete document; errors carry a byte position
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut comments = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("{} (at byte {})", e, reader.error_position()))?;
            let position = reader.buffer_position();

            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(format!("content after the root element (at byte {})", position));
                    }
                    stack.push(Element::from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_element(element),
                        None if root.is_none() => root = Some(element),
                        None => {
                            return Err(format!(
                                "content after the root element (at byte {})",
                                position
                            ))
                        }
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| format!("unexpected closing tag (at byte {})", position))?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_element(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(content) => {
                    let value = content.unescape().map_err(|e| e.to_string())?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Text(value.into_owned())),
                        None => {
                            return Err(format!(
                                "text outside the root element (at byte {})",
                                position
                            ))
                        }
                    }
                }
                Event::CData(content) => {
                    let value = String::from_utf8_lossy(&content).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::CData(value));
                    }
                }
                Event::Comment(content) => {
                    let value = String::from_utf8_lossy(&content).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Comment(value)),
                        None if root.is_none() => comments.push(value),
                        None => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(format!("unexpected end of document inside <{}>", open.name));
        }
        let root = root.ok_or_else(|| "document has no root element".to_string())?;
        Ok(XmlDocument { comments, root })
    }

    /// Serialize with an XML declaration and two-space indentation
    pub fn to_xml_string(&self) -> Result<String, String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| e.to_string())?;
        for comment in &self.comments {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
                .map_err(|e| e.to_string())?;
        }
        write_element(&mut writer, &self.root)?;

        let mut out = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
        out.push('\n');
        Ok(out)
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;
    for child in &element.children {
        match child {
            XmlNode::Element(nested) => write_element(writer, nested)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                .map_err(|e| e.to_string())?,
            XmlNode::CData(text) => writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .map_err(|e| e.to_string())?,
            XmlNode::Comment(text) => writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(|e| e.to_string())?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| e.to_string())
}

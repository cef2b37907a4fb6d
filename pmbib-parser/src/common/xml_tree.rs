//! Owned element tree for PubMed article sets
//!
//! The document is read once with `quick_xml::Reader` into an [`XmlNode`]
//! tree. Each `PubmedArticle` subtree can then be queried independently, so a
//! problem inside one article never affects its siblings.
//!
//! Text follows the usual element-tree model: `text` holds character data
//! before the first child and each child's `tail` holds the data after its
//! closing tag. [`XmlNode::text_content`] stitches both back together, which
//! keeps text that follows inline markup such as `<i>` or `<sup>`.

use quick_xml::events::Event;
use tracing::instrument;

use super::reader_utils::{cdata_text, collect_attributes, element_name, make_reader, unescape_text};
use crate::error::{ParseError, Result};

/// One XML element with its attributes, children and surrounding text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// Character data before the first child element
    pub text: String,
    /// Character data after this element's end tag (belongs to the parent)
    pub tail: String,
}

impl XmlNode {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            ..Self::default()
        }
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants (not including `self`) in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Every element matching a `/`-separated path.
    ///
    /// The first step matches descendants at any depth, the remaining steps
    /// match direct children, so `"Journal/Title"` behaves like the
    /// element-tree expression `.//Journal/Title`.
    pub fn find_all<'a>(&'a self, path: &str) -> Vec<&'a XmlNode> {
        let mut steps = path.split('/').filter(|s| !s.is_empty());
        let Some(first) = steps.next() else {
            return Vec::new();
        };

        let mut current: Vec<&XmlNode> = self.descendants().filter(|n| n.name == first).collect();
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|n| n.children.iter().filter(move |c| c.name == step))
                .collect();
        }
        current
    }

    /// First element matching `path` (see [`XmlNode::find_all`])
    pub fn find(&self, path: &str) -> Option<&XmlNode> {
        self.find_all(path).into_iter().next()
    }

    /// First element matching `path` whose attribute `attr` equals `value`
    pub fn find_with_attr(&self, path: &str, attr: &str, value: &str) -> Option<&XmlNode> {
        self.find_all(path)
            .into_iter()
            .find(|n| n.attr(attr) == Some(value))
    }

    /// Normalized text of the first element matching `path`; empty text is `None`
    pub fn find_text(&self, path: &str) -> Option<String> {
        self.find(path).and_then(XmlNode::normalized_text)
    }

    /// Full text content: own text plus every descendant's text and tail
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Text content with whitespace runs collapsed to one space; `None` if empty
    pub fn normalized_text(&self) -> Option<String> {
        let text = self
            .text_content()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(text),
            None => self.text.push_str(text),
        }
    }
}

/// Pre-order iterator over an element's descendants
pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Parse a whole XML document into its root element.
///
/// Any well-formedness problem (mismatched or unclosed tags, bad escapes,
/// missing or duplicate root element) is a [`ParseError::XmlError`].
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = make_reader(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            ParseError::XmlError(format!(
                "{e} at position {}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::XmlError(
                        "junk after document element".to_string(),
                    ));
                }
                stack.push(XmlNode::new(element_name(e), collect_attributes(e)?));
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ParseError::XmlError("unexpected closing tag".to_string())
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Event::Text(ref e) => {
                let text = unescape_text(e)?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                }
            }
            Event::CData(e) => {
                let text = cdata_text(e);
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::XmlError(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ParseError::XmlError("no root element found".to_string()))
}

//! Reader-based XML parsing utilities
//!
//! Thin wrappers around `quick_xml::Reader` used to build the element tree in
//! [`super::xml_tree`].

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesStart, BytesText};

use crate::error::{ParseError, Result};

/// Create a configured `Reader` from a string slice.
///
/// Configuration:
/// - `trim_text(false)`: preserves whitespace in mixed content (e.g., `<p>text <b>bold</b> more</p>`)
/// - `expand_empty_elements(true)`: turns `<tag/>` into `Start` + `End` events
/// - `check_end_names(true)`: mismatched closing tags are reported as errors
pub fn make_reader(content: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.trim_text(false);
    config.expand_empty_elements = true;
    config.check_end_names = true;
    reader
}

/// Element name of a start tag as an owned string.
pub fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Collect all attributes of a start tag, unescaped, in document order.
pub fn collect_attributes(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::XmlError(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::XmlError(err.to_string()))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(attributes)
}

/// Unescape a text event (`&amp;` -> `&`, character references, ...).
pub fn unescape_text<'a>(e: &'a BytesText) -> Result<Cow<'a, str>> {
    e.unescape()
        .map_err(|err| ParseError::XmlError(err.to_string()))
}

/// CDATA content is taken verbatim.
pub fn cdata_text(e: BytesCData) -> String {
    String::from_utf8_lossy(&e.into_inner()).into_owned()
}

//! XML reading utilities shared by the extractors

pub(crate) mod reader_utils;
pub mod xml_tree;

pub use xml_tree::{XmlNode, parse_document};

use std::result;
use std::str::Utf8Error;

use serde::Serialize;
use thiserror::Error;

/// Error types for PubMed XML extraction
#[derive(Error, Debug)]
pub enum ParseError {
    /// The document could not be parsed at all. Aborts the whole extraction call.
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Input bytes were not valid UTF-8
    #[error("Invalid UTF-8 in XML input: {0}")]
    Utf8(#[from] Utf8Error),
}

pub type Result<T> = result::Result<T, ParseError>;

/// A single article that could not be turned into a record.
///
/// Never fatal: extraction logs it, keeps it in [`crate::Extraction::errors`]
/// and moves on to the next article.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("article #{index} (PMID {}): {message}", pmid.as_deref().unwrap_or("?"))]
pub struct RecordError {
    /// Zero-based position of the article element in the document
    pub index: usize,
    /// PMID, when it could be read before the failure
    pub pmid: Option<String>,
    pub message: String,
}

impl RecordError {
    pub fn new(index: usize, pmid: Option<String>, message: impl Into<String>) -> Self {
        Self {
            index,
            pmid,
            message: message.into(),
        }
    }
}

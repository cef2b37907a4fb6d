use std::{io, result};

use thiserror::Error;

/// Error types for serialization and table handling
#[derive(Error, Debug)]
pub enum FormatError {
    /// A record reached a serializer without a PMID
    #[error("Record has no PMID")]
    MissingIdentifier,

    /// A table lacks a column the serializer needs
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = result::Result<T, FormatError>;

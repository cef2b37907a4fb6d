#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # PubMed record parser
//!
//! Extraction of PubMed XML article sets into typed [`Record`]s, plus the
//! field normalizers used by the bibliographic serializers.
//!
//! This crate is pure and synchronous: it never touches the network or the
//! file system and can be used independently of any retrieval layer.

pub mod common;
pub mod error;
pub mod pubmed;

// Re-export main types for convenience
pub use error::{ParseError, RecordError, Result};
pub use pubmed::{
    Author, Extraction, Field, ListField, MeshHeading, MeshStyle, MeshTerm, Record, UNKNOWN,
    extract_records, parse_records_from_bytes, parse_records_from_xml,
};

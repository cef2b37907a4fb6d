#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # pmbib Formatter
//!
//! Serializers that turn extracted PubMed records into bibliographic
//! interchange formats:
//!
//! - **PubMed (MEDLINE/NBIB)**: tagged, line-wrapped flat file
//! - **Bibliometrix**: standard and extended analysis tables
//! - **BibTeX / RIS**: citation exports over a bibliometrix table
//! - **Web of Science**: tagged flat file from a WoS source table
//!
//! All serializers are pure functions of their input and an explicit
//! [`ExportConfig`]; serializing the same collection twice yields identical
//! output.

pub mod bibliometrix;
pub mod citation;
pub mod config;
pub mod error;
pub mod pubmed;
pub mod table;
pub mod wos;
pub mod wrap;

// Re-export main types for convenience
pub use bibliometrix::{flatten_records, map_extended, map_standard, to_bibliometrix, to_bibliometrix_extended};
pub use citation::{ExportFormat, table_to_bibtex, table_to_ris};
pub use config::{DEFAULT_EXTENDED_COLUMNS, ExportConfig};
pub use error::{FormatError, Result};
pub use pubmed::{serialize_pubmed, write_pubmed};
pub use table::{EXPORT_DELIMITER, STORE_DELIMITER, Table, TableRow};
pub use wos::{serialize_wos, wos_table_from_records, write_wos};
pub use wrap::{wrap_line, wrap_text};

//! PubMed flat-file export

pub mod medline;

pub use medline::{FIELD_ORDER, format_record, format_record_wrapped, serialize_pubmed, write_pubmed};

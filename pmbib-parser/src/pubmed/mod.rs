//! PubMed XML extraction and data models
//!
//! This module turns PubMed article sets into [`Record`]s and provides the
//! normalizers that render record fields in PubMed and bibliometrix styles.

pub mod extract;
pub mod models;
pub mod normalize;

// Re-export public types
pub use extract::{Extraction, extract_records, parse_records_from_bytes, parse_records_from_xml};
pub use models::{
    ArticleIds, Author, Chemical, Field, Grant, HistoryStatus, Journal, ListField, MeshHeading,
    MeshTerm, Pagination, PartialDate, PublicationHistory, Record, UNKNOWN,
};
pub use normalize::{
    AuthorDetail, MeshStyle, author_detail_token, concat_abstract, decode_author_details,
    encode_author_details, format_history_date, format_mesh_heading, format_mesh_headings,
    zero_pad,
};

//! Field normalizers shared by the extractor and the serializers

use serde::{Deserialize, Serialize};

use super::models::{Author, MeshHeading, MeshTerm, UNKNOWN};

/// MeSH rendering conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshStyle {
    /// `*Descriptor/*qualifier`: major topics starred, parts joined by `/`
    PubMed,
    /// `Descriptor;qualifier`: no markers, parts joined by `;`
    Bibliometrix,
}

impl MeshStyle {
    fn separator(self) -> char {
        match self {
            MeshStyle::PubMed => '/',
            MeshStyle::Bibliometrix => ';',
        }
    }

    fn term(self, term: &MeshTerm) -> String {
        match self {
            MeshStyle::PubMed if term.major_topic => format!("*{}", term.name),
            _ => term.name.clone(),
        }
    }
}

/// Render one heading; `None` when the descriptor is empty
pub fn format_mesh_heading(heading: &MeshHeading, style: MeshStyle) -> Option<String> {
    if heading.descriptor.name.trim().is_empty() {
        return None;
    }
    let mut out = style.term(&heading.descriptor);
    for qualifier in &heading.qualifiers {
        out.push(style.separator());
        out.push_str(&style.term(qualifier));
    }
    Some(out)
}

/// Render all headings joined with `"; "`
pub fn format_mesh_headings(headings: &[MeshHeading], style: MeshStyle) -> String {
    headings
        .iter()
        .filter_map(|h| format_mesh_heading(h, style))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Join abstract fragments with a single space, skipping empty ones
pub fn concat_abstract<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|f| f.as_ref().trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Left-pad with zeros to two digits; empty input becomes `"00"`
pub fn zero_pad(value: &str) -> String {
    format!("{:0>2}", value.trim())
}

/// `"YYYY/MM/DD HH:MM"`; hour and minute default to `"00"`
pub fn format_history_date(
    year: &str,
    month: &str,
    day: &str,
    hour: Option<&str>,
    minute: Option<&str>,
) -> String {
    format!(
        "{}/{}/{} {}:{}",
        year.trim(),
        zero_pad(month),
        zero_pad(day),
        zero_pad(hour.unwrap_or("00")),
        zero_pad(minute.unwrap_or("00"))
    )
}

/// One `(tag, value)` pair decoded from an author detail token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetail {
    pub tag: String,
    pub value: String,
}

/// `FAU:<full>|AU:<abbrev>|AUID:<orcid>|AD:<aff1> |AD: <aff2>`
pub fn author_detail_token(author: &Author) -> String {
    let mut token = format!("FAU:{}|AU:{}", author.full_name(), author.abbreviated_name());
    if let Some(orcid) = author.orcid.as_deref().filter(|o| !o.is_empty()) {
        token.push_str("|AUID:");
        token.push_str(orcid);
    }
    if !author.affiliations.is_empty() {
        token.push_str("|AD:");
        token.push_str(&author.affiliations.join(" |AD: "));
    }
    token
}

/// Detail tokens of every author joined with `"| "`
pub fn encode_author_details(authors: &[Author]) -> String {
    authors
        .iter()
        .map(author_detail_token)
        .collect::<Vec<_>>()
        .join("| ")
}

const DETAIL_TAGS: [&str; 4] = ["FAU", "AU", "AUID", "AD"];

/// Parse an encoded author detail string back into ordered entries.
///
/// Segments are split on `|`; a segment is `TAG:value` for a known tag.
/// Values equal to [`UNKNOWN`] and empty values are dropped.
pub fn decode_author_details(encoded: &str) -> Vec<AuthorDetail> {
    encoded
        .split('|')
        .filter_map(|segment| {
            let (tag, value) = segment.trim_start().split_once(':')?;
            if !DETAIL_TAGS.contains(&tag) {
                return None;
            }
            let value = value.trim();
            if value.is_empty() || value == UNKNOWN {
                return None;
            }
            Some(AuthorDetail {
                tag: tag.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

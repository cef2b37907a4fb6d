//! PubMed flat-file (MEDLINE/NBIB) serializer
//!
//! Each record becomes a block of `"TAG - value"` lines in the canonical
//! MEDLINE field order. Absent fields are skipped, multi-valued fields expand
//! to one line per value and every line is wrapped to the configured width.

use std::io::Write;

use pmbib_parser::pubmed::{Field, HistoryStatus, MeshStyle, Record, UNKNOWN, format_mesh_heading};
use tracing::{debug, error, instrument};

use crate::config::ExportConfig;
use crate::error::{FormatError, Result};
use crate::wrap::wrap_line;

/// Tags in output order
pub const FIELD_ORDER: [&str; 40] = [
    "PMID", "OWN", "STAT", "DCOM", "LR", "IS", "VI", "IP", "DP", "TI", "PG", "LID", "AB", "CI",
    "FAU", "AU", "AUID", "AD", "LA", "SI", "PT", "DEP", "PL", "TA", "JT", "JID", "RN", "SB", "MH",
    "PMC", "COIS", "OTO", "OT", "EDAT", "MHDA", "CRDT", "PHST", "AID", "PST", "SO",
];

struct Block {
    lines: Vec<String>,
}

impl Block {
    fn push(&mut self, tag: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.lines.push(format!("{tag:<4}- {value}"));
        }
    }

    /// Like [`Block::push`], skipping the [`UNKNOWN`] placeholder
    fn push_known(&mut self, tag: &str, value: &str) {
        if value.trim() != UNKNOWN {
            self.push(tag, value);
        }
    }

    fn push_opt(&mut self, tag: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.push(tag, value);
        }
    }
}

/// Lines of one record, unwrapped, in [`FIELD_ORDER`]
pub fn format_record(record: &Record) -> Result<Vec<String>> {
    if record.pmid.trim().is_empty() {
        return Err(FormatError::MissingIdentifier);
    }

    let mut block = Block { lines: Vec::new() };

    block.push("PMID", &record.pmid);
    block.push_opt("OWN", record.get(Field::Owner));
    block.push_opt("STAT", record.get(Field::Status));
    block.push_opt("DCOM", record.date_completed.compact().as_deref());
    block.push_opt("LR", record.date_revised.compact().as_deref());
    if let Some(issn) = record.get(Field::IssnElectronic) {
        block.push("IS", &format!("{issn} (Electronic)"));
    }
    if let Some(issn) = record.get(Field::IssnLinking) {
        block.push("IS", &format!("{issn} (Linking)"));
    }
    block.push_opt("VI", record.get(Field::Volume));
    block.push_opt("IP", record.get(Field::Issue));
    if let Some(year) = record.get(Field::PubYear) {
        match record.get(Field::PubSeason) {
            Some(season) => block.push("DP", &format!("{year} {season}")),
            None => block.push("DP", year),
        }
    }
    block.push_opt("TI", record.get(Field::Title));
    block.push_opt("PG", record.get(Field::MedlinePgn));
    if let Some(doi) = record.get(Field::ElocationDoi) {
        block.push("LID", &format!("{doi} [doi]"));
    }
    if let Some(pii) = record.get(Field::ElocationPii) {
        block.push("LID", &format!("{pii} [pii]"));
    }
    block.push_opt("AB", record.get(Field::AbstractText));
    block.push_opt("CI", record.get(Field::Copyright));

    for author in &record.authors {
        block.push_known("FAU", &author.full_name());
        block.push_known("AU", &author.abbreviated_name());
        if let Some(orcid) = author.orcid.as_deref().filter(|o| !o.trim().is_empty()) {
            block.push("AUID", &format!("ORCID: {}", orcid.trim()));
        }
        for affiliation in &author.affiliations {
            block.push_known("AD", affiliation);
        }
    }

    block.push_opt("LA", record.get(Field::Language));
    for accession in &record.accession_numbers {
        match record.get(Field::DataBankName) {
            Some(bank) => block.push("SI", &format!("{bank}/{accession}")),
            None => block.push("SI", accession),
        }
    }
    for publication_type in &record.publication_types {
        block.push("PT", publication_type);
    }
    block.push_opt("DEP", record.article_date.compact().as_deref());
    block.push_opt("PL", record.get(Field::Country));
    block.push_opt("TA", record.get(Field::MedlineTa));
    block.push_opt("JT", record.get(Field::JournalTitle));
    block.push_opt("JID", record.get(Field::NlmUniqueId));
    for chemical in &record.chemicals {
        let registry = chemical.registry_number.as_deref().unwrap_or("0");
        block.push("RN", &format!("{registry} ({})", chemical.name));
    }
    block.push_opt("SB", record.get(Field::CitationSubset));
    for heading in &record.mesh_headings {
        block.push_opt("MH", format_mesh_heading(heading, MeshStyle::PubMed).as_deref());
    }
    block.push_opt("PMC", record.get(Field::Pmc));
    block.push_opt("COIS", record.get(Field::CoiStatement));
    block.push_opt("OTO", record.get(Field::KeywordOwner));
    for keyword in &record.keywords {
        block.push("OT", keyword);
    }
    block.push_opt("EDAT", record.history.get(HistoryStatus::Pubmed));
    block.push_opt("MHDA", record.history.get(HistoryStatus::Medline));
    block.push_opt("CRDT", record.history.get(HistoryStatus::Entrez));
    for (status, date) in record.history.entries() {
        block.push("PHST", &format!("{date} [{}]", status.as_str()));
    }
    if let Some(pii) = record.get(Field::Pii) {
        block.push("AID", &format!("{pii} [pii]"));
    }
    if let Some(doi) = record.get(Field::Doi) {
        block.push("AID", &format!("{doi} [doi]"));
    }
    block.push_opt("PST", record.get(Field::PublicationStatus));
    block.push_opt("SO", source_line(record, record.get(Field::PubSeason)).as_deref());

    Ok(block.lines)
}

/// The synthesized `SO` citation, e.g. `"PLoS One. 2024 Spring; 19(1): e0290001. doi: 10.1371/x."`
fn source_line(record: &Record, season: Option<&str>) -> Option<String> {
    let journal = record
        .get(Field::MedlineTa)
        .or_else(|| record.get(Field::JournalTitle));
    let year = record.get(Field::PubYear);
    let location = record
        .get(Field::MedlinePgn)
        .or_else(|| record.get(Field::ElocationDoi));

    let mut components = Vec::new();
    if let Some(journal) = journal {
        components.push(format!("{journal}."));
    }
    match (year, season.filter(|s| !s.is_empty())) {
        (Some(year), Some(season)) => components.push(format!("{year} {season};")),
        (Some(year), None) => components.push(format!("{year};")),
        _ => {}
    }
    if let (Some(volume), Some(issue)) = (record.get(Field::Volume), record.get(Field::Issue)) {
        components.push(format!("{volume}({issue}):"));
    }
    if let Some(location) = location {
        components.push(format!("{location}."));
    }
    if let Some(doi) = record.get(Field::Doi) {
        components.push(format!("doi: {doi}."));
    }

    (!components.is_empty()).then(|| components.join(" "))
}

/// Format and wrap one record into its output block
pub fn format_record_wrapped(record: &Record, config: &ExportConfig) -> Result<String> {
    let lines = format_record(record)?;
    Ok(lines
        .iter()
        .flat_map(|line| wrap_line(line, config.wrap_width, config.identifier_width))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Serialize records to PubMed flat-file text.
///
/// Records that cannot be formatted are logged and skipped. Blocks are
/// separated by one blank line.
#[instrument(skip(records, config), fields(records = records.len()))]
pub fn serialize_pubmed(records: &[Record], config: &ExportConfig) -> String {
    let blocks: Vec<String> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match format_record_wrapped(record, config) {
            Ok(block) => Some(block),
            Err(e) => {
                error!(index, pmid = %record.pmid, error = %e, "Skipping record in PubMed export");
                None
            }
        })
        .collect();

    debug!(blocks = blocks.len(), "Serialized PubMed records");
    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Serialize records and write them to `writer`
pub fn write_pubmed<W: Write>(
    records: &[Record],
    config: &ExportConfig,
    mut writer: W,
) -> Result<()> {
    writer.write_all(serialize_pubmed(records, config).as_bytes())?;
    writer.flush()?;
    Ok(())
}

//! Bibliometrix analysis tables
//!
//! Records are first flattened into the legacy intermediate table (one
//! column per PubMed field, lists joined with `"; "`). The standard and
//! extended bibliometrix tables are derived from it by adding institution,
//! country and short-reference columns and renaming through ordered
//! `(source, target)` pair lists.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use pmbib_parser::pubmed::{Field, ListField, MeshStyle, Record, format_mesh_headings};
use regex::Regex;
use tracing::{debug, instrument};

use crate::table::Table;

/// Columns of the flattened intermediate table, in order
pub const LEGACY_COLUMNS: [&str; 31] = [
    "PMID",
    "ArticleTitle",
    "JournalTitle",
    "ISOAbbreviation",
    "Country",
    "Volume",
    "Issue",
    "Pages",
    "ISSN",
    "Language",
    "AbstractText",
    "CopyrightInformation",
    "DOI",
    "PII",
    "PublicationYear",
    "PublicationSeason",
    "Authors",
    "Affiliations",
    "Keywords",
    "MeshTerms",
    "ChemicalSubstances",
    "GrantIDs",
    "GrantOrganizations",
    "DocumentTypes",
    "Status",
    "LastRevisionDate",
    "CompletionDate",
    "PublicationHistory",
    "ConflictOfInterest",
    "PMCID",
    "Citations",
];

/// Upper-case fragments that mark an affiliation segment as an institution
pub const INSTITUTION_KEYWORDS: [&str; 15] = [
    "UNIV", "COLL", "SCH", "INST", "ACAD", "CTR", "SCI", "HOSP", "ASSOC", "FOUNDAT", "LAB", "TECH",
    "RES", "FAC", "CENTER",
];

/// Ordered country aliases; the first substring match wins
pub const COUNTRY_MAPPINGS: [(&str, &str); 7] = [
    ("UNITED STATES", "USA"),
    ("RUSSIAN FEDERATION", "RUSSIA"),
    ("TAIWAN", "CHINA"),
    ("ENGLAND", "UNITED KINGDOM"),
    ("SCOTLAND", "UNITED KINGDOM"),
    ("WALES", "UNITED KINGDOM"),
    ("NORTH IRELAND", "UNITED KINGDOM"),
];

pub const NOT_REPORTED: &str = "NOTREPORTED";
pub const DATABASE: &str = "PUBMED";

/// Renames of the standard table; unmapped columns keep their names
pub const STANDARD_MAPPING: [(&str, &str); 20] = [
    ("Authors", "AU"),
    ("Affiliations", "C1"),
    ("ArticleTitle", "TI"),
    ("JournalTitle", "SO"),
    ("Country", "SO_CO"),
    ("Language", "LA"),
    ("DocumentTypes", "DT"),
    ("Keywords", "DE"),
    ("ChemicalSubstances", "ID"),
    ("MeshTerms", "MESH"),
    ("AbstractText", "AB"),
    ("ISOAbbreviation", "JI"),
    ("ISSN", "SN"),
    ("Pages", "PG"),
    ("Volume", "VL"),
    ("DOI", "DI"),
    ("PublicationYear", "PY"),
    ("GrantIDs", "GRANT_ID"),
    ("GrantOrganizations", "GRANT_ORG"),
    ("PMID", "PMID"),
];

/// Columns added to the standard table when missing
pub const STANDARD_DEFAULT_COLUMNS: [&str; 6] = ["TC", "DB", "AU_UN", "PY_IS", "J9", "UT"];

/// Where an extended column takes its values from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSource {
    /// Copy of a flattened column
    Column(&'static str),
    /// The same literal in every row
    Constant(&'static str),
    /// Always null
    Placeholder,
}

/// Target columns of the extended table; one source may feed several targets
pub const EXTENDED_MAPPING: [(MappingSource, &str); 32] = [
    (MappingSource::Column("Authors"), "AU"),
    (MappingSource::Column("Authors"), "AF"),
    (MappingSource::Column("Citations"), "CR"),
    (MappingSource::Column("AbstractText"), "AB"),
    (MappingSource::Column("Affiliations"), "C1"),
    (MappingSource::Column("Affiliations"), "C1raw"),
    (MappingSource::Column("Keywords"), "DE"),
    (MappingSource::Column("DOI"), "DI"),
    (MappingSource::Column("DocumentTypes"), "DT"),
    (MappingSource::Column("GrantOrganizations"), "FU"),
    (MappingSource::Placeholder, "FX"),
    (MappingSource::Column("ChemicalSubstances"), "ID"),
    (MappingSource::Column("Issue"), "IS"),
    (MappingSource::Column("ISOAbbreviation"), "J9"),
    (MappingSource::Column("ISSN"), "JI"),
    (MappingSource::Column("Language"), "LA"),
    (MappingSource::Placeholder, "OA"),
    (MappingSource::Placeholder, "PU"),
    (MappingSource::Column("PublicationYear"), "PY"),
    (MappingSource::Placeholder, "RP"),
    (MappingSource::Column("JournalTitle"), "SO"),
    (MappingSource::Placeholder, "TC"),
    (MappingSource::Column("ArticleTitle"), "TI"),
    (MappingSource::Column("PMID"), "UT"),
    (MappingSource::Column("Volume"), "VL"),
    (MappingSource::Constant(DATABASE), "DB"),
    (MappingSource::Column("Country"), "SO_CO"),
    (MappingSource::Column("MeshTerms"), "MESH"),
    (MappingSource::Column("ISSN"), "SN"),
    (MappingSource::Column("Pages"), "PG"),
    (MappingSource::Column("GrantIDs"), "GRANT_ID"),
    (MappingSource::Column("GrantOrganizations"), "GRANT_ORG"),
];

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// `"received: 2023-08-03; accepted: 2023-12-11"`
fn history_summary(record: &Record) -> String {
    record
        .history
        .entries()
        .map(|(status, date)| {
            let day = date.split_whitespace().next().unwrap_or(date);
            format!("{}: {}", status.as_str(), day.replace('/', "-"))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn legacy_row(record: &Record) -> Vec<Option<String>> {
    vec![
        Some(record.pmid.clone()),
        owned(record.get(Field::Title)),
        owned(record.get(Field::JournalTitle)),
        owned(record.get(Field::IsoAbbreviation)),
        owned(record.get(Field::Country)),
        owned(record.get(Field::Volume)),
        owned(record.get(Field::Issue)),
        owned(record.get(Field::MedlinePgn)),
        owned(record.get(Field::Issn)),
        owned(record.get(Field::Language)),
        owned(record.get(Field::AbstractText)),
        owned(record.get(Field::Copyright)),
        owned(record.get(Field::ElocationDoi)),
        owned(record.get(Field::ElocationPii)),
        owned(record.get(Field::PubYear)),
        owned(record.get(Field::PubSeason)),
        non_empty(record.joined(ListField::Authors)),
        non_empty(record.joined(ListField::Affiliations)),
        non_empty(record.joined(ListField::Keywords)),
        non_empty(format_mesh_headings(&record.mesh_headings, MeshStyle::Bibliometrix)),
        non_empty(record.joined(ListField::Chemicals)),
        non_empty(record.joined(ListField::GrantIds)),
        non_empty(record.joined(ListField::GrantAgencies)),
        non_empty(record.joined(ListField::PublicationTypes)),
        owned(record.get(Field::Status)),
        Some(record.date_revised.iso_or_zero()),
        Some(record.date_completed.iso_or_zero()),
        non_empty(history_summary(record)),
        owned(record.get(Field::CoiStatement)),
        owned(record.get(Field::Pmc)),
        non_empty(record.joined(ListField::Citations)),
    ]
}

/// Flatten records into the legacy intermediate table
pub fn flatten_records(records: &[Record]) -> Table {
    let mut table = Table::new(LEGACY_COLUMNS);
    for record in records {
        table.push_row(legacy_row(record));
    }
    table
}

/// Remove bracketed markers such as `[1]` and collapse whitespace
pub fn clean_affiliation(affiliation: &str) -> String {
    static BRACKET_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = BRACKET_REGEX
        .get_or_init(|| Regex::new(r"\[.*?\]").expect("Failed to compile bracket regex"));
    re.replace_all(affiliation, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `;`-segments naming an institution, joined by `;`, or [`NOT_REPORTED`]
pub fn extract_institutions(affiliations: &str) -> String {
    let institutions: Vec<&str> = affiliations
        .split(';')
        .filter(|segment| {
            let upper = segment.to_uppercase();
            INSTITUTION_KEYWORDS.iter().any(|k| upper.contains(k))
        })
        .collect();
    if institutions.is_empty() {
        NOT_REPORTED.to_string()
    } else {
        institutions.join(";")
    }
}

/// Country alias for the first matching entry of [`COUNTRY_MAPPINGS`]
pub fn extract_country(affiliations: &str) -> Option<&'static str> {
    let upper = affiliations.to_uppercase();
    COUNTRY_MAPPINGS
        .iter()
        .find(|(country, _)| upper.contains(country))
        .map(|(_, alias)| *alias)
}

/// `"<first author>, <year>, <journal>"` with `NA` for missing parts
pub fn short_reference(authors: Option<&str>, year: Option<&str>, journal: Option<&str>) -> String {
    let first_author = authors
        .and_then(|a| a.split(';').next())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("NA");
    let year = year
        .map(str::trim)
        .filter(|y| !y.is_empty() && y.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or("NA");
    let journal = journal.filter(|j| !j.is_empty()).unwrap_or("NA");
    format!("{first_author}, {year}, {journal}")
}

/// Make short references unique.
///
/// Rows are grouped by value in input order. Every member of a group with
/// more than one row gets a suffix: `-a` for the first, `-b` for the second
/// and so on. Unique values are returned unchanged. A suffix that would
/// produce a value already present is skipped in favour of the next letter.
pub fn deduplicate_short_references(values: &[String]) -> Vec<String> {
    let mut group_sizes: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *group_sizes.entry(value.as_str()).or_default() += 1;
    }
    let is_duplicate = |value: &str| group_sizes.get(value).copied().unwrap_or(0) > 1;

    let mut taken: HashSet<String> = values
        .iter()
        .filter(|value| !is_duplicate(value.as_str()))
        .cloned()
        .collect();
    let mut next_suffix: HashMap<&str, u32> = HashMap::new();
    values
        .iter()
        .map(|value| {
            if !is_duplicate(value.as_str()) {
                return value.clone();
            }
            let k = next_suffix.entry(value.as_str()).or_default();
            loop {
                *k += 1;
                let candidate = match char::from_u32(96 + *k) {
                    Some(suffix) => format!("{value}-{suffix}"),
                    None => format!("{value}-{k}"),
                };
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}

fn is_noncharacter(c: char) -> bool {
    let cp = u32::from(c);
    (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE
}

/// Drop characters that do not survive export: control characters other
/// than tab, newline and carriage return, U+FFFD and noncharacters
pub fn strip_unencodable(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            !(c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
                && c != char::REPLACEMENT_CHARACTER
                && !is_noncharacter(c)
        })
        .collect()
}

/// Add `Affiliations_cleaned`, `AU_UN`, `AU1_UN`, `AU_UN_NR`, `AU_CO`,
/// `SR_FULL` and `SR` to a flattened table
pub fn add_derived_columns(table: &mut Table) {
    let mut cleaned = Vec::with_capacity(table.len());
    let mut institutions = Vec::with_capacity(table.len());
    let mut first_institution = Vec::with_capacity(table.len());
    let mut not_reported = Vec::with_capacity(table.len());
    let mut countries = Vec::with_capacity(table.len());
    let mut full_references = Vec::with_capacity(table.len());

    for row in table.iter_rows() {
        let affiliations = clean_affiliation(row.get("Affiliations").unwrap_or(""));
        let au_un = extract_institutions(&affiliations);
        let au1_un = match au_un.split(';').next().map(str::trim) {
            Some(first) if !first.is_empty() => first.to_string(),
            _ => NOT_REPORTED.to_string(),
        };

        not_reported.push(Some(if au_un == NOT_REPORTED {
            NOT_REPORTED.to_string()
        } else {
            String::new()
        }));
        countries.push(Some(extract_country(&affiliations).unwrap_or("").to_string()));
        full_references.push(short_reference(
            row.get("Authors"),
            row.get("PublicationYear"),
            row.get("JournalTitle"),
        ));
        first_institution.push(Some(au1_un));
        institutions.push(Some(au_un));
        cleaned.push(Some(affiliations));
    }

    let short_references = deduplicate_short_references(&full_references);
    table.set_column("Affiliations_cleaned", cleaned);
    table.set_column("AU_UN", institutions);
    table.set_column("AU1_UN", first_institution);
    table.set_column("AU_UN_NR", not_reported);
    table.set_column("AU_CO", countries);
    table.set_column("SR_FULL", full_references.into_iter().map(Some).collect());
    table.set_column("SR", short_references.into_iter().map(Some).collect());
}

fn rename_columns(table: &mut Table, mapping: &[(&str, &str)]) {
    for column in &mut table.columns {
        if let Some((_, target)) = mapping.iter().find(|(source, _)| *source == column.as_str()) {
            *column = target.to_string();
        }
    }
}

/// Standard bibliometrix table from a flattened table
#[instrument(skip(flattened), fields(rows = flattened.len()))]
pub fn map_standard(flattened: &Table) -> Table {
    let mut table = flattened.clone();
    add_derived_columns(&mut table);
    table.map_cells(strip_unencodable);
    rename_columns(&mut table, &STANDARD_MAPPING);

    for column in STANDARD_DEFAULT_COLUMNS {
        if !table.has_column(column) {
            table.set_column(column, Vec::new());
        }
    }
    let rows = table.len();
    table.set_column("DB", vec![Some(DATABASE.to_string()); rows]);
    let pmids: Vec<Option<String>> = table
        .column("PMID")
        .map(|cells| cells.into_iter().map(owned).collect())
        .unwrap_or_default();
    table.set_column("UT", pmids);

    debug!(columns = table.columns.len(), "Built standard bibliometrix table");
    table
}

/// Extended bibliometrix table from a flattened table, reindexed to `columns`
#[instrument(skip(flattened, columns), fields(rows = flattened.len()))]
pub fn map_extended<S: AsRef<str>>(flattened: &Table, columns: &[S]) -> Table {
    let mut data = flattened.clone();
    add_derived_columns(&mut data);
    data.map_cells(strip_unencodable);

    let mut mapped = data.clone();
    for (source, target) in EXTENDED_MAPPING {
        let values: Vec<Option<String>> = match source {
            MappingSource::Column(name) => data
                .column(name)
                .map(|cells| cells.into_iter().map(owned).collect())
                .unwrap_or_default(),
            MappingSource::Constant(value) => vec![Some(value.to_string()); data.len()],
            MappingSource::Placeholder => Vec::new(),
        };
        mapped.set_column(target, values);
    }

    let table = mapped.select(columns);
    debug!(columns = table.columns.len(), "Built extended bibliometrix table");
    table
}

/// Standard bibliometrix table
pub fn to_bibliometrix(records: &[Record]) -> Table {
    map_standard(&flatten_records(records))
}

/// Extended bibliometrix table with exactly `columns`, in order
pub fn to_bibliometrix_extended<S: AsRef<str>>(records: &[Record], columns: &[S]) -> Table {
    map_extended(&flatten_records(records), columns)
}

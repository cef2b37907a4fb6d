//! Web of Science flat-file export
//!
//! The serializer reads a [`Table`] with WoS source column names
//! (`Authors`, `DocumentTitle`, `References`, ...). Each row becomes one
//! record of two-letter tags closed by `ER`; the file ends with `EF`.

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use pmbib_parser::pubmed::{Field, ListField, MeshStyle, Record, format_mesh_headings};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::table::{Table, TableRow};

pub const WOS_HEADER: &str = "FN Clarivate Analytics Web of Science\nVR 1.0\n";
pub const WOS_FOOTER: &str = "EF";

/// Source columns understood by the serializer
pub const WOS_COLUMNS: [&str; 43] = [
    "PublicationType",
    "Authors",
    "DocumentTitle",
    "PublicationName",
    "Language",
    "DocumentType",
    "Keywords",
    "MeshTerms",
    "Abstract",
    "AuthorAddress",
    "ReprintAddress",
    "EmailAddress",
    "FundingAgency",
    "FundingText",
    "References",
    "TimesCited",
    "TotalTimesCited",
    "UsageCountLast180Days",
    "UsageCountSince2013",
    "Publisher",
    "PublisherCity",
    "PublisherAddress",
    "ISSN",
    "EISSN",
    "ISOAbbreviation",
    "SourceAbbreviation",
    "PublicationDate",
    "YearPublished",
    "Volume",
    "Issue",
    "BeginningPage",
    "EndingPage",
    "DOI",
    "PageCount",
    "WebOfScienceCategories",
    "ResearchAreas",
    "DocumentDeliveryNumber",
    "AccessionNumber",
    "PubMedID",
    "PMID",
    "OpenAccessIndicator",
    "ReportGeneratedDate",
    "OnlinePublicationDate",
];

const IDENTIFIER_COLUMNS: [&str; 3] = ["PMID", "PubMedID", "DOI"];
const DATE_COLUMNS: [&str; 2] = ["OnlinePublicationDate", "ReportGeneratedDate"];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y %b %d",
    "%d %B %Y",
    "%B %d, %Y",
];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M"];

/// How a WoS tag gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagValue {
    Column(&'static str),
    /// Column value, or the fallback when the column is absent
    ColumnOr(&'static str, &'static str),
    /// `;`-delimited column, one item per physical line
    List(&'static str),
    /// Number of references
    ReferenceCount,
    /// `PubMedID`, falling back to `PMID`
    PubMedId,
}

const WOS_TAGS: [(&str, TagValue); 42] = [
    ("PT", TagValue::ColumnOr("PublicationType", "J")),
    ("AU", TagValue::List("Authors")),
    ("TI", TagValue::Column("DocumentTitle")),
    ("SO", TagValue::Column("PublicationName")),
    ("LA", TagValue::ColumnOr("Language", "eng")),
    ("DT", TagValue::Column("DocumentType")),
    ("DE", TagValue::List("Keywords")),
    ("ID", TagValue::List("MeshTerms")),
    ("AB", TagValue::Column("Abstract")),
    ("C1", TagValue::Column("AuthorAddress")),
    ("RP", TagValue::Column("ReprintAddress")),
    ("EM", TagValue::Column("EmailAddress")),
    ("FU", TagValue::Column("FundingAgency")),
    ("FX", TagValue::Column("FundingText")),
    ("CR", TagValue::List("References")),
    ("NR", TagValue::ReferenceCount),
    ("TC", TagValue::ColumnOr("TimesCited", "0")),
    ("Z9", TagValue::ColumnOr("TotalTimesCited", "0")),
    ("U1", TagValue::ColumnOr("UsageCountLast180Days", "0")),
    ("U2", TagValue::ColumnOr("UsageCountSince2013", "0")),
    ("PU", TagValue::Column("Publisher")),
    ("PI", TagValue::Column("PublisherCity")),
    ("PA", TagValue::Column("PublisherAddress")),
    ("SN", TagValue::Column("ISSN")),
    ("EI", TagValue::Column("EISSN")),
    ("J9", TagValue::Column("ISOAbbreviation")),
    ("JI", TagValue::Column("SourceAbbreviation")),
    ("PD", TagValue::Column("PublicationDate")),
    ("PY", TagValue::Column("YearPublished")),
    ("EA", TagValue::Column("OnlinePublicationDate")),
    ("VL", TagValue::Column("Volume")),
    ("IS", TagValue::Column("Issue")),
    ("BP", TagValue::Column("BeginningPage")),
    ("EP", TagValue::Column("EndingPage")),
    ("DI", TagValue::Column("DOI")),
    ("PG", TagValue::Column("PageCount")),
    ("WC", TagValue::Column("WebOfScienceCategories")),
    ("SC", TagValue::Column("ResearchAreas")),
    ("GA", TagValue::Column("DocumentDeliveryNumber")),
    ("UT", TagValue::Column("AccessionNumber")),
    ("PM", TagValue::PubMedId),
    ("OA", TagValue::Column("OpenAccessIndicator")),
];

/// Trim and flatten embedded line breaks
pub fn clean_cell(text: &str) -> String {
    text.trim().replace('\n', " ").replace('\r', "")
}

/// Trimmed, lower-cased identifier; `None` when empty
pub fn normalize_identifier(identifier: &str) -> Option<String> {
    let identifier = identifier.trim();
    (!identifier.is_empty()).then(|| identifier.to_lowercase())
}

/// Reformat a date as `YYYY-MM-DD`; `None` when no known layout matches
pub fn normalize_date(date: &str) -> Option<String> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
                .map(|datetime| datetime.date())
        })
        .map(|parsed| parsed.format("%Y-%m-%d").to_string())
}

/// Clean every cell, then normalize identifier and date columns
pub fn preprocess(table: &Table) -> Table {
    let mut table = table.clone();
    table.map_cells(clean_cell);

    for (columns, normalize) in [
        (&IDENTIFIER_COLUMNS[..], normalize_identifier as fn(&str) -> Option<String>),
        (&DATE_COLUMNS[..], normalize_date),
    ] {
        for &column in columns {
            if let Some(cells) = table.column(column) {
                let normalized: Vec<Option<String>> =
                    cells.into_iter().map(|cell| cell.and_then(normalize)).collect();
                table.set_column(column, normalized);
            }
        }
    }
    table
}

fn list_items<'a>(row: &TableRow<'a>, column: &str) -> Vec<&'a str> {
    row.get(column)
        .map(|value| {
            value
                .split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn tagged(tag: &str, value: &str) -> String {
    format!("{tag} {value}").trim_end().to_string()
}

/// Lines of one pre-processed row, without the closing `ER`
pub fn format_wos_record(row: &TableRow<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for (tag, value) in WOS_TAGS {
        match value {
            TagValue::Column(column) => lines.push(tagged(tag, row.get(column).unwrap_or(""))),
            TagValue::ColumnOr(column, fallback) => {
                lines.push(tagged(tag, row.get(column).unwrap_or(fallback)));
            }
            TagValue::List(column) => {
                let items = list_items(row, column);
                let mut items = items.iter();
                lines.push(tagged(tag, items.next().copied().unwrap_or("")));
                lines.extend(items.map(|item| format!("   {item}")));
            }
            TagValue::ReferenceCount => {
                lines.push(tagged(tag, &list_items(row, "References").len().to_string()));
            }
            TagValue::PubMedId => {
                let pmid = row.get("PubMedID").or_else(|| row.get("PMID"));
                lines.push(tagged(tag, pmid.unwrap_or("")));
            }
        }
    }
    lines.push(tagged("DA", row.get("ReportGeneratedDate").unwrap_or("")));
    lines
}

/// Serialize a WoS source table to flat-file text
#[instrument(skip(table), fields(rows = table.len()))]
pub fn serialize_wos(table: &Table) -> String {
    let table = preprocess(table);
    let mut out = String::from(WOS_HEADER);
    out.push('\n');
    for row in table.iter_rows() {
        for line in format_wos_record(&row) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("ER\n\n");
    }
    out.push_str(WOS_FOOTER);
    out.push('\n');
    debug!(records = table.len(), "Serialized Web of Science records");
    out
}

/// Serialize a WoS source table and write it to `writer`
pub fn write_wos<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    writer.write_all(serialize_wos(table).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Split a MEDLINE page range, expanding an abbreviated end page
/// (`"123-30"` becomes `("123", "130")`)
pub fn page_range(pages: &str) -> (Option<String>, Option<String>) {
    let mut parts = pages.splitn(2, '-').map(str::trim);
    let start = parts.next().filter(|p| !p.is_empty());
    let end = parts.next().filter(|p| !p.is_empty());

    let end = match (start, end) {
        (Some(start), Some(end))
            if end.len() < start.len()
                && start.chars().all(|c| c.is_ascii_digit())
                && end.chars().all(|c| c.is_ascii_digit()) =>
        {
            Some(format!("{}{end}", &start[..start.len() - end.len()]))
        }
        (_, end) => end.map(str::to_string),
    };
    (start.map(str::to_string), end)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn article_date(record: &Record) -> Option<String> {
    let date = &record.article_date;
    match (&date.year, &date.month, &date.day) {
        (Some(y), Some(m), Some(d)) => Some(format!("{y}-{m}-{d}")),
        _ => None,
    }
}

/// WoS source table built from extracted records
pub fn wos_table_from_records(records: &[Record]) -> Table {
    let mut table = Table::new(WOS_COLUMNS);
    for record in records {
        let (begin, end) = record
            .get(Field::MedlinePgn)
            .map(page_range)
            .unwrap_or_default();
        let authors: Vec<String> = record
            .authors
            .iter()
            .map(|a| a.abbreviated_name())
            .filter(|name| !name.is_empty())
            .collect();

        let mut row = vec![None; WOS_COLUMNS.len()];
        let mut set = |column: &str, value: Option<String>| {
            if let Some(index) = WOS_COLUMNS.iter().position(|c| *c == column) {
                row[index] = value;
            }
        };
        set("PublicationType", Some("J".to_string()));
        set("Authors", non_empty(authors.join("; ")));
        set("DocumentTitle", owned(record.get(Field::Title)));
        set("PublicationName", owned(record.get(Field::JournalTitle)));
        set("Language", owned(record.get(Field::Language)));
        set("DocumentType", non_empty(record.joined(ListField::PublicationTypes)));
        set("Keywords", non_empty(record.joined(ListField::Keywords)));
        set(
            "MeshTerms",
            non_empty(format_mesh_headings(&record.mesh_headings, MeshStyle::PubMed)),
        );
        set("Abstract", owned(record.get(Field::AbstractText)));
        set("AuthorAddress", non_empty(record.joined(ListField::Affiliations)));
        set("FundingAgency", non_empty(record.joined(ListField::GrantAgencies)));
        set("References", non_empty(record.joined(ListField::Citations)));
        set("ISSN", owned(record.get(Field::Issn)));
        set("EISSN", owned(record.get(Field::IssnElectronic)));
        set("ISOAbbreviation", owned(record.get(Field::IsoAbbreviation)));
        set("SourceAbbreviation", owned(record.get(Field::MedlineTa)));
        set("PublicationDate", owned(record.get(Field::PubSeason)));
        set("YearPublished", owned(record.get(Field::PubYear)));
        set("Volume", owned(record.get(Field::Volume)));
        set("Issue", owned(record.get(Field::Issue)));
        set("BeginningPage", owned(record.get(Field::StartPage)).or(begin));
        set("EndingPage", end);
        set("DOI", owned(record.best_doi()));
        set("AccessionNumber", Some(format!("MEDLINE:{}", record.pmid)));
        set("PubMedID", Some(record.pmid.clone()));
        set("PMID", Some(record.pmid.clone()));
        set("OnlinePublicationDate", article_date(record));

        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmbib_parser::pubmed::Author;
    use rstest::rstest;

    fn source_table() -> Table {
        let mut table = Table::new([
            "Authors",
            "DocumentTitle",
            "Keywords",
            "References",
            "PMID",
            "DOI",
            "OnlinePublicationDate",
        ]);
        table.push_row(vec![
            Some("Smith J; Doe A".to_string()),
            Some("A title\nspanning lines\r".to_string()),
            Some("alpha; beta".to_string()),
            Some("Ref one; Ref two; Ref three".to_string()),
            Some(" 12345 ".to_string()),
            Some("10.1000/ABC".to_string()),
            Some("2024/01/09".to_string()),
        ]);
        table
    }

    #[rstest]
    #[case("2024-01-09", Some("2024-01-09"))]
    #[case("2024/1/9", Some("2024-01-09"))]
    #[case("20240109", Some("2024-01-09"))]
    #[case("9 January 2024", Some("2024-01-09"))]
    #[case("2024-01-09T10:30:00", Some("2024-01-09"))]
    #[case("not a date", None)]
    #[case("", None)]
    fn test_normalize_date(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_date(input).as_deref(), expected);
    }

    #[test]
    fn test_preprocess_normalizes_cells() {
        let table = preprocess(&source_table());
        let row = table.row(0).unwrap();
        assert_eq!(row.get("DocumentTitle"), Some("A title spanning lines"));
        assert_eq!(row.get("PMID"), Some("12345"));
        assert_eq!(row.get("DOI"), Some("10.1000/abc"));
        assert_eq!(row.get("OnlinePublicationDate"), Some("2024-01-09"));
    }

    #[test]
    fn test_serialize_wos_layout() {
        let out = serialize_wos(&source_table());
        assert!(out.starts_with("FN Clarivate Analytics Web of Science\nVR 1.0\n\nPT J\n"));
        assert!(out.contains("\nAU Smith J\n   Doe A\nTI A title spanning lines\n"));
        assert!(out.contains("\nLA eng\n"));
        assert!(out.contains("\nDE alpha\n   beta\n"));
        assert!(out.contains("\nCR Ref one\n   Ref two\n   Ref three\nNR 3\nTC 0\nZ9 0\nU1 0\nU2 0\n"));
        assert!(out.contains("\nEA 2024-01-09\n"));
        assert!(out.contains("\nDI 10.1000/abc\n"));
        assert!(out.contains("\nPM 12345\n"));
        assert!(out.ends_with("DA\nER\n\nEF\n"));
    }

    #[test]
    fn test_tag_sequence() {
        let table = preprocess(&source_table());
        let lines = format_wos_record(&table.row(0).unwrap());
        let tags: Vec<&str> = lines
            .iter()
            .filter(|line| !line.starts_with(' '))
            .map(|line| &line[..2])
            .collect();
        let mut expected: Vec<&str> = WOS_TAGS.iter().map(|(tag, _)| *tag).collect();
        expected.push("DA");
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_empty_table_has_header_and_footer() {
        let out = serialize_wos(&Table::new(WOS_COLUMNS));
        assert_eq!(out, "FN Clarivate Analytics Web of Science\nVR 1.0\n\nEF\n");
    }

    #[rstest]
    #[case("123-30", Some("123"), Some("130"))]
    #[case("e0290001", Some("e0290001"), None)]
    #[case("S12-S19", Some("S12"), Some("S19"))]
    #[case("1001-9", Some("1001"), Some("1009"))]
    fn test_page_range(
        #[case] pages: &str,
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
    ) {
        let (s, e) = page_range(pages);
        assert_eq!(s.as_deref(), start);
        assert_eq!(e.as_deref(), end);
    }

    #[test]
    fn test_table_from_records() {
        let mut record = Record::new("12345");
        record.title = Some("Test Article".to_string());
        record.authors = vec![Author {
            last_name: Some("Smith".to_string()),
            initials: Some("J".to_string()),
            ..Author::default()
        }];
        record.pagination.medline_pgn = Some("123-30".to_string());
        record.ids.elocation_doi = Some("10.1/X".to_string());

        let table = wos_table_from_records(&[record]);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("Authors"), Some("Smith J"));
        assert_eq!(row.get("AccessionNumber"), Some("MEDLINE:12345"));
        assert_eq!(row.get("BeginningPage"), Some("123"));
        assert_eq!(row.get("EndingPage"), Some("130"));
        assert_eq!(row.get("DOI"), Some("10.1/X"));

        let out = serialize_wos(&table);
        assert!(out.contains("\nUT MEDLINE:12345\nPM 12345\n"));
        assert!(out.contains("\nDI 10.1/x\n"));
    }
}

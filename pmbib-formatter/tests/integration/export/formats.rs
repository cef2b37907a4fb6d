//! Serializer tests over hand-built records and the shared parser fixture

use std::fs;
use std::path::PathBuf;

use pmbib_formatter::bibliometrix::LEGACY_COLUMNS;
use pmbib_formatter::{
    DEFAULT_EXTENDED_COLUMNS, ExportConfig, Table, flatten_records, serialize_pubmed,
    serialize_wos, table_to_bibtex, table_to_ris, to_bibliometrix, to_bibliometrix_extended,
    wos_table_from_records,
};
use pmbib_parser::pubmed::{Author, MeshHeading, MeshTerm};
use pmbib_parser::{Record, extract_records};
use rstest::{fixture, rstest};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../pmbib-parser/tests/integration/test_data/pubmed_xml/article_set.xml")
}

#[fixture]
fn records() -> Vec<Record> {
    let xml = fs::read_to_string(fixture_path()).expect("fixture XML should be readable");
    extract_records(&xml).unwrap().records
}

fn minimal_record() -> Record {
    let mut record = Record::new("12345");
    record.title = Some("Test Article".to_string());
    record.authors = vec![Author {
        last_name: Some("Smith".to_string()),
        fore_name: Some("John".to_string()),
        ..Author::default()
    }];
    record.mesh_headings = vec![MeshHeading {
        descriptor: MeshTerm::new("Cancer", true),
        qualifiers: vec![],
    }];
    record
}

#[test]
fn test_minimal_record_pubmed_export() {
    let out = serialize_pubmed(&[minimal_record()], &ExportConfig::default());
    let lines: Vec<&str> = out.lines().collect();
    for expected in ["PMID- 12345", "TI  - Test Article", "FAU - Smith, John", "MH  - *Cancer"] {
        assert!(lines.contains(&expected), "missing {expected:?} in {out}");
    }
}

#[rstest]
#[case("PMID- 38012345")]
#[case("OWN - NLM")]
#[case("STAT- MEDLINE")]
#[case("DCOM- 20240214")]
#[case("LR  - 20240301")]
#[case("IS  - 1932-6203 (Electronic)")]
#[case("IS  - 1932-6203 (Linking)")]
#[case("DP  - 2024 Spring")]
#[case("LID - 10.1371/journal.pone.0290001 [doi]")]
#[case("LID - e0290001 [pii]")]
#[case("CI  - Copyright: © 2024 Smith et al.")]
#[case("FAU - Smith, John")]
#[case("AUID- ORCID: 0000-0002-1825-0097")]
#[case("FAU - DIAB-COHORT Study Group")]
#[case("PT  - Multicenter Study")]
#[case("DEP - 20240105")]
#[case("RN  - 9100L32L2N (Metformin)")]
#[case("MH  - *Diabetes Mellitus, Type 2/drug therapy/*blood")]
#[case("MH  - Humans")]
#[case("OTO - NOTNLM")]
#[case("OT  - HbA1c")]
#[case("EDAT- 2024/01/05 18:43")]
#[case("MHDA- 2024/02/14 06:42")]
#[case("CRDT- 2024/01/05 13:33")]
#[case("PHST- 2023/08/03 00:00 [received]")]
#[case("AID - PONE-D-23-12345 [pii]")]
#[case("PST - epublish")]
#[case("SO  - PLoS One. 2024 Spring; 19(1): e0290001. doi: 10.1371/journal.pone.0290001.")]
fn test_fixture_pubmed_lines(records: Vec<Record>, #[case] expected: &str) {
    let out = serialize_pubmed(&records, &ExportConfig::default());
    assert!(out.lines().any(|line| line == expected), "missing {expected:?}");
}

#[rstest]
fn test_pubmed_export_is_idempotent_and_wrapped(records: Vec<Record>) {
    let config = ExportConfig::default();
    let first = serialize_pubmed(&records, &config);
    assert_eq!(first, serialize_pubmed(&records, &config));

    for line in first.lines() {
        let single_word = line[config.identifier_width.min(line.len())..]
            .split_whitespace()
            .count()
            <= 1;
        assert!(line.chars().count() <= config.wrap_width || single_word, "{line:?}");
    }
    assert_eq!(first.matches("\n\nPMID- ").count(), records.len() - 1);
}

#[rstest]
fn test_narrow_wrap_width(records: Vec<Record>) {
    let config = ExportConfig::new().with_wrap_width(40);
    let out = serialize_pubmed(&records, &config);
    assert!(out.lines().any(|line| line.starts_with("      ")));
    assert!(out.lines().all(|line| line.is_empty() || !line.trim().is_empty()));
}

#[rstest]
fn test_flattened_table(records: Vec<Record>) {
    let table = flatten_records(&records);
    assert_eq!(table.columns, LEGACY_COLUMNS.to_vec());
    let row = table.row(0).unwrap();
    assert_eq!(
        row.get("Authors"),
        Some("Smith, John J; Doe, Anna A; DIAB-COHORT Study Group")
    );
    assert_eq!(row.get("CompletionDate"), Some("2024-02-14"));
    assert_eq!(row.get("DOI"), Some("10.1371/journal.pone.0290001"));
}

#[rstest]
fn test_bibliometrix_standard(records: Vec<Record>) {
    let table = to_bibliometrix(&records);
    assert_eq!(table.len(), records.len());
    let row = table.row(0).unwrap();
    assert_eq!(row.get("PMID"), Some("38012345"));
    assert_eq!(row.get("UT"), Some("38012345"));
    assert_eq!(row.get("DB"), Some("PUBMED"));
    assert_eq!(row.get("AU_CO"), Some("USA"));
    assert_eq!(row.get("SR"), Some("Smith, John J, 2024, PloS one"));
}

#[rstest]
fn test_bibliometrix_extended(records: Vec<Record>) {
    let table = to_bibliometrix_extended(&records, &DEFAULT_EXTENDED_COLUMNS);
    assert_eq!(table.columns, DEFAULT_EXTENDED_COLUMNS.to_vec());
    let row = table.row(0).unwrap();
    assert_eq!(row.get("IS"), Some("1"));
    assert_eq!(row.get("VL"), Some("19"));
    assert_eq!(row.get("AU1_UN"), Some("Department of Medicine, University of Oxford, Oxford, England."));
}

#[test]
fn test_short_references_are_unique() {
    let records = vec![minimal_record(), minimal_record(), minimal_record()];
    let table = to_bibliometrix(&records);
    let srs: Vec<Option<&str>> = table.column("SR").unwrap();
    assert_eq!(
        srs,
        vec![
            Some("Smith, John, NA, NA-a"),
            Some("Smith, John, NA, NA-b"),
            Some("Smith, John, NA, NA-c"),
        ]
    );
}

#[rstest]
fn test_bibtex_from_bibliometrix_table(records: Vec<Record>) {
    let bibtex = table_to_bibtex(&to_bibliometrix(&records)).unwrap();
    assert!(bibtex.starts_with("@journalarticle;multicenterstudy{38012345,\n"));
    assert!(bibtex.contains("  author = {Smith, John J and Doe, Anna A and DIAB-COHORT Study Group},"));
    assert!(bibtex.contains("  keywords = {HbA1c, cohort},"));
    assert_eq!(bibtex.matches("\n}").count(), records.len());
}

#[test]
fn test_ris_two_authors_no_doi() {
    let mut table = Table::new(["AU", "TI", "SO", "DI", "PG", "LA", "DE", "DT", "PMID"]);
    table.push_row(vec![Some("Smith J; Doe A".to_string()), Some("Foo".to_string())]);

    let ris = table_to_ris(&table).unwrap();
    assert_eq!(ris.matches("AU  - ").count(), 2);
    assert_eq!(ris.matches("TI  - ").count(), 1);
    assert!(!ris.contains("DO  - "));
    assert!(ris.ends_with("ER  -"));
}

#[rstest]
fn test_wos_from_records(records: Vec<Record>) {
    let out = serialize_wos(&wos_table_from_records(&records));
    assert!(out.starts_with("FN Clarivate Analytics Web of Science\nVR 1.0\n\n"));
    assert!(out.contains("\nUT MEDLINE:38012345\nPM 38012345\n"));
    assert!(out.contains("\nCR UK Prospective Diabetes Study Group. Lancet. 1998"));
    assert!(out.contains("\nEA 2024-01-05\n"));
    assert_eq!(out.matches("\nER\n").count(), records.len());
    assert!(out.ends_with("EF\n"));
}

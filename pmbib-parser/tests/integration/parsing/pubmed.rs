//! Extraction tests against the fixture article set

#[path = "../common/mod.rs"]
mod common;

use common::load_pubmed_xml;
use pmbib_parser::pubmed::{HistoryStatus, MeshStyle, format_mesh_headings};
use pmbib_parser::{Extraction, Field, ListField, Record, UNKNOWN, extract_records};
use rstest::{fixture, rstest};

#[fixture]
fn extraction() -> Extraction {
    extract_records(&load_pubmed_xml("article_set.xml")).unwrap()
}

fn record<'a>(extraction: &'a Extraction, pmid: &str) -> &'a Record {
    extraction
        .records
        .iter()
        .find(|r| r.pmid == pmid)
        .unwrap_or_else(|| panic!("record {pmid} missing"))
}

#[rstest]
fn test_one_record_per_well_formed_article(extraction: Extraction) {
    let pmids: Vec<_> = extraction.records.iter().map(|r| r.pmid.as_str()).collect();
    assert_eq!(pmids, vec!["38012345", "37654321"]);
    assert!(extraction.records.iter().all(|r| r.value(Field::Pmid) != UNKNOWN));

    assert_eq!(extraction.errors.len(), 1);
    assert_eq!(extraction.errors[0].index, 2);
    assert_eq!(extraction.errors[0].pmid, None);
}

#[rstest]
#[case(Field::Title, "Glycemic control in type 2 diabetes: a multicentre cohort study.")]
#[case(Field::JournalTitle, "PloS one")]
#[case(Field::IsoAbbreviation, "PLoS One")]
#[case(Field::MedlineTa, "PLoS One")]
#[case(Field::Country, "United States")]
#[case(Field::Volume, "19")]
#[case(Field::Issue, "1")]
#[case(Field::PubYear, "2024")]
#[case(Field::PubSeason, "Spring")]
#[case(Field::Issn, "1932-6203")]
#[case(Field::IssnElectronic, "1932-6203")]
#[case(Field::IssnLinking, "1932-6203")]
#[case(Field::MedlinePgn, "e0290001")]
#[case(Field::ElocationDoi, "10.1371/journal.pone.0290001")]
#[case(Field::ElocationPii, "e0290001")]
#[case(Field::Pii, "PONE-D-23-12345")]
#[case(Field::Pmc, "PMC10770001")]
#[case(Field::Language, "eng")]
#[case(Field::PublicationStatus, "epublish")]
#[case(Field::CitationSubset, "IM")]
#[case(Field::KeywordOwner, "NOTNLM")]
#[case(Field::Owner, "NLM")]
#[case(Field::Status, "MEDLINE")]
#[case(Field::DataBankName, UNKNOWN)]
fn test_scalar_fields(extraction: Extraction, #[case] field: Field, #[case] expected: &str) {
    assert_eq!(record(&extraction, "38012345").value(field), expected);
}

#[rstest]
fn test_structured_abstract(extraction: Extraction) {
    let r = record(&extraction, "38012345");
    assert_eq!(
        r.value(Field::AbstractText),
        "BACKGROUND: Poor glycemic control increases the risk of complications in type 2 \
         diabetes. METHODS: We followed 1,204 adults with HbA1c above 7% for two years. \
         CONCLUSIONS: Structured follow-up improved control."
    );
    assert_eq!(r.value(Field::Copyright), "Copyright: © 2024 Smith et al.");
}

#[rstest]
fn test_authors(extraction: Extraction) {
    let r = record(&extraction, "38012345");
    assert_eq!(r.authors.len(), 3);
    assert_eq!(r.authors[0].orcid.as_deref(), Some("0000-0002-1825-0097"));
    assert_eq!(r.authors[0].affiliations.len(), 2);
    assert_eq!(r.authors[2].last_name.as_deref(), Some("DIAB-COHORT Study Group"));
    assert_eq!(
        r.joined(ListField::Authors),
        "Smith, John J; Doe, Anna A; DIAB-COHORT Study Group"
    );
    assert_eq!(
        r.joined(ListField::Affiliations),
        "Department of Medicine, University of Oxford, Oxford, England.; \
         Harvard Medical School, Boston, MA, United States."
    );
}

#[rstest]
fn test_list_fields(extraction: Extraction) {
    let r = record(&extraction, "38012345");
    assert_eq!(r.joined(ListField::Keywords), "HbA1c; cohort");
    assert_eq!(
        r.joined(ListField::PublicationTypes),
        "Journal Article; Multicenter Study"
    );
    assert_eq!(r.joined(ListField::Chemicals), "Glycated Hemoglobin; Metformin");
    assert_eq!(r.joined(ListField::GrantIds), "R01 DK123456");
    assert_eq!(
        r.joined(ListField::GrantAgencies),
        "NIDDK NIH HHS; Wellcome Trust"
    );
    assert_eq!(r.citations.len(), 2);
}

#[rstest]
fn test_mesh_headings(extraction: Extraction) {
    let r = record(&extraction, "38012345");
    assert_eq!(
        format_mesh_headings(&r.mesh_headings, MeshStyle::PubMed),
        "*Diabetes Mellitus, Type 2/drug therapy/*blood; Humans"
    );
    assert_eq!(
        format_mesh_headings(&r.mesh_headings, MeshStyle::Bibliometrix),
        "Diabetes Mellitus, Type 2;drug therapy;blood; Humans"
    );
}

#[rstest]
fn test_history_and_dates(extraction: Extraction) {
    let r = record(&extraction, "38012345");
    assert_eq!(r.history.get(HistoryStatus::Received), Some("2023/08/03 00:00"));
    assert_eq!(r.history.get(HistoryStatus::Entrez), Some("2024/01/05 13:33"));
    assert_eq!(r.history.get(HistoryStatus::Medline), Some("2024/02/14 06:42"));
    assert_eq!(r.history.entries().count(), 5);
    assert_eq!(r.date_completed.compact().as_deref(), Some("20240214"));
    assert_eq!(r.article_date.compact().as_deref(), Some("20240105"));

    let second = record(&extraction, "37654321");
    assert_eq!(second.date_revised.iso_or_zero(), "2023-10-00");
    assert_eq!(second.date_completed.compact(), None);
}

#[rstest]
fn test_second_article_is_independent(extraction: Extraction) {
    let r = record(&extraction, "37654321");
    assert_eq!(r.value(Field::Doi), "10.1038/s41586-023-00001-1");
    assert_eq!(r.value(Field::ElocationDoi), UNKNOWN);
    assert_eq!(r.value(Field::Pmc), UNKNOWN);
    assert_eq!(r.value(Field::IssnElectronic), UNKNOWN);
    assert_eq!(r.value(Field::DataBankName), "GEO");
    assert_eq!(r.accession_numbers, vec!["GSE200001", "GSE200002"]);
    assert!(r.mesh_headings.is_empty());
    assert!(r.keywords.is_empty());
}

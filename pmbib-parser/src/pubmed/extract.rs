//! PubMed XML record extraction
//!
//! Turns an `efetch`-style `PubmedArticleSet` document into [`Record`]s. The
//! document is parsed once; each `PubmedArticle` is then read independently so
//! that a broken article is reported in [`Extraction::errors`] instead of
//! failing the batch.

use std::result;
use std::str::from_utf8;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::models::{
    Author, Chemical, Grant, HistoryStatus, MeshHeading, MeshTerm, PartialDate, Record,
};
use super::normalize::{concat_abstract, format_history_date};
use crate::common::xml_tree::{XmlNode, parse_document};
use crate::error::{RecordError, Result};

/// Outcome of one extraction call
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    /// One record per well-formed article, in document order
    pub records: Vec<Record>,
    /// Articles that could not be turned into records
    pub errors: Vec<RecordError>,
}

/// Extract every `PubmedArticle` in the document.
///
/// Fails only when the document itself is malformed. Per-article problems end
/// up in [`Extraction::errors`].
///
/// # Example
///
/// ```
/// use pmbib_parser::extract_records;
///
/// let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
///   <PMID>12345</PMID>
///   <Article><ArticleTitle>Test Article</ArticleTitle></Article>
/// </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;
///
/// let extraction = extract_records(xml).unwrap();
/// assert_eq!(extraction.records[0].pmid, "12345");
/// assert!(extraction.errors.is_empty());
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn extract_records(xml: &str) -> Result<Extraction> {
    let root = parse_document(xml)?;

    let articles = if root.name == "PubmedArticle" {
        vec![&root]
    } else {
        root.find_all("PubmedArticle")
    };

    let mut extraction = Extraction::default();
    for (index, article) in articles.into_iter().enumerate() {
        match build_record(article) {
            Ok(record) => {
                debug!(pmid = %record.pmid, authors = record.authors.len(), "Extracted record");
                extraction.records.push(record);
            }
            Err(message) => {
                let pmid = article.find_text("PMID");
                warn!(index, pmid = ?pmid, %message, "Skipping article");
                extraction
                    .errors
                    .push(RecordError::new(index, pmid, message));
            }
        }
    }

    debug!(
        records = extraction.records.len(),
        skipped = extraction.errors.len(),
        "Extraction finished"
    );
    Ok(extraction)
}

/// Extract records, logging and discarding per-article failures
pub fn parse_records_from_xml(xml: &str) -> Result<Vec<Record>> {
    extract_records(xml).map(|extraction| extraction.records)
}

/// Same as [`extract_records`] for raw bytes; invalid UTF-8 is an error
pub fn parse_records_from_bytes(bytes: &[u8]) -> Result<Extraction> {
    extract_records(from_utf8(bytes)?)
}

fn build_record(article: &XmlNode) -> result::Result<Record, String> {
    let citation = article
        .child("MedlineCitation")
        .ok_or("missing MedlineCitation element")?;
    let pmid = citation
        .child("PMID")
        .and_then(XmlNode::normalized_text)
        .ok_or("missing PMID")?;

    let mut record = Record::new(pmid);
    record.owner = attr_text(citation, "Owner");
    record.status = attr_text(citation, "Status");

    record.title = article.find_text("ArticleTitle");
    record.abstract_text = extract_abstract(article);
    record.copyright = article.find_text("Abstract/CopyrightInformation");
    record.language = article.find_text("Language");
    record.publication_status = article.find_text("PublicationStatus");
    record.citation_subset = article.find_text("CitationSubset");
    record.coi_statement = article.find_text("CoiStatement");
    record.keyword_owner = article
        .find("KeywordList")
        .and_then(|list| attr_text(list, "Owner"));
    record.data_bank_name = article.find_text("DataBank/DataBankName");

    fill_journal(article, &mut record);
    record.pagination.medline_pgn = article.find_text("Pagination/MedlinePgn");
    record.pagination.start_page = article.find_text("Pagination/StartPage");
    fill_ids(article, &mut record);

    record.authors = extract_authors(article);
    record.keywords = texts(article, "KeywordList/Keyword");
    record.mesh_headings = extract_mesh_headings(article);
    record.chemicals = extract_chemicals(article);
    record.grants = extract_grants(article);
    record.publication_types = texts(article, "PublicationTypeList/PublicationType");
    record.citations = texts(article, "ReferenceList/Reference/Citation");
    record.accession_numbers = texts(article, "AccessionNumberList/AccessionNumber");

    fill_history(article, &mut record);
    record.date_completed = partial_date(article, "DateCompleted");
    record.date_revised = partial_date(article, "DateRevised");
    record.article_date = partial_date(article, "ArticleDate");

    Ok(record)
}

fn attr_text(node: &XmlNode, name: &str) -> Option<String> {
    node.attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Non-empty normalized texts of every element matching `path`
fn texts(scope: &XmlNode, path: &str) -> Vec<String> {
    scope
        .find_all(path)
        .into_iter()
        .filter_map(XmlNode::normalized_text)
        .collect()
}

fn extract_abstract(article: &XmlNode) -> Option<String> {
    let fragments: Vec<String> = article
        .find_all("Abstract/AbstractText")
        .into_iter()
        .map(|fragment| {
            let text = fragment.normalized_text().unwrap_or_default();
            match attr_text(fragment, "Label") {
                Some(label) => format!("{label}: {text}").trim_end().to_string(),
                None => text,
            }
        })
        .collect();

    let joined = concat_abstract(&fragments);
    (!joined.is_empty()).then_some(joined)
}

fn fill_journal(article: &XmlNode, record: &mut Record) {
    let journal = &mut record.journal;
    journal.title = article.find_text("Journal/Title");
    journal.iso_abbreviation = article.find_text("Journal/ISOAbbreviation");
    journal.issn = article.find_text("Journal/ISSN");
    journal.issn_electronic = article
        .find_with_attr("Journal/ISSN", "IssnType", "Electronic")
        .and_then(XmlNode::normalized_text);
    journal.issn_linking = article.find_text("MedlineJournalInfo/ISSNLinking");
    journal.medline_ta = article.find_text("MedlineJournalInfo/MedlineTA");
    journal.nlm_unique_id = article.find_text("MedlineJournalInfo/NlmUniqueID");
    journal.country = article.find_text("MedlineJournalInfo/Country");
    journal.volume = article.find_text("JournalIssue/Volume");
    journal.issue = article.find_text("JournalIssue/Issue");
    journal.pub_season = article.find_text("JournalIssue/PubDate/Season");
    // MedlineDate ("1998 Dec-1999 Jan") stands in when there is no Year
    journal.pub_year = article.find_text("JournalIssue/PubDate/Year").or_else(|| {
        article
            .find_text("JournalIssue/PubDate/MedlineDate")
            .and_then(|date| date.get(..4).map(str::to_string))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    });
}

fn fill_ids(article: &XmlNode, record: &mut Record) {
    let elocation = |kind: &str| {
        article
            .find_with_attr("ELocationID", "EIdType", kind)
            .and_then(XmlNode::normalized_text)
    };
    record.ids.elocation_doi = elocation("doi");
    record.ids.elocation_pii = elocation("pii");

    // Only the article's own id list; references carry ArticleIdLists too
    let id_list = article
        .child("PubmedData")
        .and_then(|data| data.child("ArticleIdList"));
    let article_id = |kind: &str| {
        id_list.and_then(|list| {
            list.children_named("ArticleId")
                .find(|id| id.attr("IdType") == Some(kind))
                .and_then(XmlNode::normalized_text)
        })
    };
    record.ids.doi = article_id("doi");
    record.ids.pii = article_id("pii");
    record.ids.pmc = article_id("pmc");
}

fn extract_authors(article: &XmlNode) -> Vec<Author> {
    article
        .find_all("AuthorList/Author")
        .into_iter()
        .map(|author| Author {
            last_name: author
                .find_text("LastName")
                .or_else(|| author.find_text("CollectiveName")),
            fore_name: author.find_text("ForeName"),
            initials: author.find_text("Initials"),
            orcid: author
                .find_with_attr("Identifier", "Source", "ORCID")
                .and_then(XmlNode::normalized_text),
            affiliations: texts(author, "AffiliationInfo/Affiliation"),
        })
        .filter(|author| {
            author.last_name.is_some()
                || author.fore_name.is_some()
                || author.initials.is_some()
                || author.orcid.is_some()
        })
        .collect()
}

fn mesh_term(node: &XmlNode) -> Option<MeshTerm> {
    let name = node.normalized_text()?;
    Some(MeshTerm::new(name, node.attr("MajorTopicYN") == Some("Y")))
}

fn extract_mesh_headings(article: &XmlNode) -> Vec<MeshHeading> {
    article
        .find_all("MeshHeadingList/MeshHeading")
        .into_iter()
        .filter_map(|heading| {
            let descriptor = heading.child("DescriptorName").and_then(mesh_term)?;
            let qualifiers = heading
                .children_named("QualifierName")
                .filter_map(mesh_term)
                .collect();
            Some(MeshHeading {
                descriptor,
                qualifiers,
            })
        })
        .collect()
}

fn extract_chemicals(article: &XmlNode) -> Vec<Chemical> {
    article
        .find_all("ChemicalList/Chemical")
        .into_iter()
        .filter_map(|chemical| {
            Some(Chemical {
                name: chemical.find_text("NameOfSubstance")?,
                registry_number: chemical.find_text("RegistryNumber"),
            })
        })
        .collect()
}

fn extract_grants(article: &XmlNode) -> Vec<Grant> {
    article
        .find_all("GrantList/Grant")
        .into_iter()
        .map(|grant| Grant {
            id: grant.find_text("GrantID"),
            agency: grant.find_text("Agency"),
        })
        .filter(|grant| grant.id.is_some() || grant.agency.is_some())
        .collect()
}

fn fill_history(article: &XmlNode, record: &mut Record) {
    for date in article.find_all("History/PubMedPubDate") {
        let raw_status = date.attr("PubStatus").unwrap_or_default();
        let Some(status) = HistoryStatus::parse(raw_status) else {
            debug!(pmid = %record.pmid, status = raw_status, "Ignoring publication history status");
            continue;
        };
        let year = date.find_text("Year").unwrap_or_default();
        let month = date.find_text("Month").unwrap_or_default();
        let day = date.find_text("Day").unwrap_or_default();
        let hour = date.find_text("Hour");
        let minute = date.find_text("Minute");
        record.history.set(
            status,
            format_history_date(&year, &month, &day, hour.as_deref(), minute.as_deref()),
        );
    }
}

fn partial_date(article: &XmlNode, element: &str) -> PartialDate {
    match article.find(element) {
        Some(date) => PartialDate {
            year: date.find_text("Year"),
            month: date.find_text("Month"),
            day: date.find_text("Day"),
        },
        None => PartialDate::default(),
    }
}

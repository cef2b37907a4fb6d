use serde::{Deserialize, Serialize};

/// Placeholder returned by [`Record::value`] for absent scalar fields
pub const UNKNOWN: &str = "Unknown";

/// Journal metadata from `Article/Journal` and `MedlineJournalInfo`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    /// Full journal title (`Journal/Title`)
    pub title: Option<String>,
    /// ISO abbreviation (e.g., "J Biol Chem")
    pub iso_abbreviation: Option<String>,
    /// MEDLINE title abbreviation (`MedlineJournalInfo/MedlineTA`)
    pub medline_ta: Option<String>,
    pub nlm_unique_id: Option<String>,
    /// Country of publication
    pub country: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    /// `JournalIssue/PubDate/Year`
    pub pub_year: Option<String>,
    /// `JournalIssue/PubDate/Season` (e.g., "Spring")
    pub pub_season: Option<String>,
    /// First ISSN of any type
    pub issn: Option<String>,
    pub issn_electronic: Option<String>,
    pub issn_linking: Option<String>,
}

/// Page information
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Page range as printed by MEDLINE (e.g., "123-30")
    pub medline_pgn: Option<String>,
    pub start_page: Option<String>,
}

/// Article identifiers other than the PMID
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ArticleIds {
    /// `ELocationID[@EIdType='doi']`
    pub elocation_doi: Option<String>,
    /// `ELocationID[@EIdType='pii']`
    pub elocation_pii: Option<String>,
    /// `ArticleIdList/ArticleId[@IdType='doi']`
    pub doi: Option<String>,
    /// `ArticleIdList/ArticleId[@IdType='pii']`
    pub pii: Option<String>,
    /// PMC ID with prefix (e.g., "PMC7092803")
    pub pmc: Option<String>,
}

/// An author entry from `AuthorList/Author`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Surname, or the collective name for group authors
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
    /// ORCID identifier as given in the XML
    pub orcid: Option<String>,
    /// Every affiliation in source order
    pub affiliations: Vec<String>,
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn trim_name(name: &str) -> String {
    name.trim_matches(|c| c == ',' || c == ' ').to_string()
}

impl Author {
    /// `"Last, Fore Initials"`, as used in the bibliometrix `Authors` column
    pub fn display_name(&self) -> String {
        trim_name(&format!(
            "{}, {} {}",
            or_empty(&self.last_name),
            or_empty(&self.fore_name),
            or_empty(&self.initials)
        ))
    }

    /// `"Last, Fore"`, the PubMed `FAU` form
    pub fn full_name(&self) -> String {
        trim_name(&format!(
            "{}, {}",
            or_empty(&self.last_name),
            or_empty(&self.fore_name)
        ))
    }

    /// `"Last Initials"`, the PubMed `AU` form
    pub fn abbreviated_name(&self) -> String {
        format!("{} {}", or_empty(&self.last_name), or_empty(&self.initials))
            .trim()
            .to_string()
    }

    pub fn first_affiliation(&self) -> Option<&str> {
        self.affiliations.first().map(String::as_str)
    }
}

/// A MeSH descriptor or qualifier
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MeshTerm {
    pub name: String,
    /// `MajorTopicYN="Y"`
    pub major_topic: bool,
}

impl MeshTerm {
    pub fn new(name: impl Into<String>, major_topic: bool) -> Self {
        Self {
            name: name.into(),
            major_topic,
        }
    }
}

/// One `MeshHeading`: a descriptor refined by zero or more qualifiers
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MeshHeading {
    pub descriptor: MeshTerm,
    pub qualifiers: Vec<MeshTerm>,
}

/// Chemical substance from `ChemicalList`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Chemical {
    /// `NameOfSubstance`
    pub name: String,
    /// CAS or EC number; `"0"` in the source means none assigned
    pub registry_number: Option<String>,
}

/// Research grant from `GrantList`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub id: Option<String>,
    pub agency: Option<String>,
}

/// `PubStatus` values of `PubMedPubDate` that are retained
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Received,
    Accepted,
    Entrez,
    Pubmed,
    Medline,
}

impl HistoryStatus {
    /// All statuses in PubMed `PHST` output order
    pub const ALL: [HistoryStatus; 5] = [
        HistoryStatus::Received,
        HistoryStatus::Accepted,
        HistoryStatus::Entrez,
        HistoryStatus::Pubmed,
        HistoryStatus::Medline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Received => "received",
            HistoryStatus::Accepted => "accepted",
            HistoryStatus::Entrez => "entrez",
            HistoryStatus::Pubmed => "pubmed",
            HistoryStatus::Medline => "medline",
        }
    }

    /// Parse a `PubStatus` attribute; anything else (e.g. "revised") is `None`
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Publication history dates, formatted `"YYYY/MM/DD HH:MM"`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PublicationHistory {
    pub received: Option<String>,
    pub accepted: Option<String>,
    pub entrez: Option<String>,
    pub pubmed: Option<String>,
    pub medline: Option<String>,
}

impl PublicationHistory {
    pub fn get(&self, status: HistoryStatus) -> Option<&str> {
        match status {
            HistoryStatus::Received => self.received.as_deref(),
            HistoryStatus::Accepted => self.accepted.as_deref(),
            HistoryStatus::Entrez => self.entrez.as_deref(),
            HistoryStatus::Pubmed => self.pubmed.as_deref(),
            HistoryStatus::Medline => self.medline.as_deref(),
        }
    }

    /// Store a date for `status`, replacing any earlier value
    pub fn set(&mut self, status: HistoryStatus, date: String) {
        let slot = match status {
            HistoryStatus::Received => &mut self.received,
            HistoryStatus::Accepted => &mut self.accepted,
            HistoryStatus::Entrez => &mut self.entrez,
            HistoryStatus::Pubmed => &mut self.pubmed,
            HistoryStatus::Medline => &mut self.medline,
        };
        *slot = Some(date);
    }

    /// Present entries in `HistoryStatus::ALL` order
    pub fn entries(&self) -> impl Iterator<Item = (HistoryStatus, &str)> + '_ {
        HistoryStatus::ALL
            .into_iter()
            .filter_map(|status| self.get(status).map(|date| (status, date)))
    }
}

/// A date whose parts may be individually missing (`DateCompleted`, `DateRevised`, `ArticleDate`)
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PartialDate {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl PartialDate {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Present parts concatenated, e.g. `"20240115"`; `None` when no part is present
    pub fn compact(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}{}",
            or_empty(&self.year),
            or_empty(&self.month),
            or_empty(&self.day)
        ))
    }

    /// `"YYYY-MM-DD"` with `0000`/`00` standing in for missing parts
    pub fn iso_or_zero(&self) -> String {
        format!(
            "{}-{}-{}",
            self.year.as_deref().unwrap_or("0000"),
            self.month.as_deref().unwrap_or("00"),
            self.day.as_deref().unwrap_or("00")
        )
    }
}

/// Scalar fields addressable through [`Record::get`] and [`Record::value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Pmid,
    Owner,
    Status,
    Title,
    AbstractText,
    Copyright,
    Language,
    PublicationStatus,
    CitationSubset,
    CoiStatement,
    KeywordOwner,
    DataBankName,
    JournalTitle,
    IsoAbbreviation,
    MedlineTa,
    NlmUniqueId,
    Country,
    Volume,
    Issue,
    PubYear,
    PubSeason,
    Issn,
    IssnElectronic,
    IssnLinking,
    MedlinePgn,
    StartPage,
    ElocationDoi,
    ElocationPii,
    Doi,
    Pii,
    Pmc,
}

/// List fields exposed as `"; "`-joined strings through [`Record::joined`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    /// Author display names
    Authors,
    /// First affiliation of each author that has one
    Affiliations,
    Keywords,
    PublicationTypes,
    /// Chemical substance names
    Chemicals,
    GrantIds,
    GrantAgencies,
    Citations,
    AccessionNumbers,
}

/// Metadata of one `PubmedArticle`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// PubMed ID; never empty on extracted records
    pub pmid: String,
    /// `MedlineCitation/@Owner`
    pub owner: Option<String>,
    /// `MedlineCitation/@Status`
    pub status: Option<String>,
    pub title: Option<String>,
    /// Abstract fragments joined, labels included
    pub abstract_text: Option<String>,
    pub copyright: Option<String>,
    /// First `Language` element
    pub language: Option<String>,
    pub publication_status: Option<String>,
    pub citation_subset: Option<String>,
    pub coi_statement: Option<String>,
    /// `KeywordList/@Owner`
    pub keyword_owner: Option<String>,
    pub data_bank_name: Option<String>,
    pub journal: Journal,
    pub pagination: Pagination,
    pub ids: ArticleIds,
    pub authors: Vec<Author>,
    pub keywords: Vec<String>,
    pub mesh_headings: Vec<MeshHeading>,
    pub chemicals: Vec<Chemical>,
    pub grants: Vec<Grant>,
    pub publication_types: Vec<String>,
    /// Reference list citations
    pub citations: Vec<String>,
    pub accession_numbers: Vec<String>,
    pub history: PublicationHistory,
    pub date_completed: PartialDate,
    pub date_revised: PartialDate,
    /// Electronic publication date (`ArticleDate`)
    pub article_date: PartialDate,
}

impl Record {
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            pmid: pmid.into(),
            ..Self::default()
        }
    }

    /// Scalar field, `None` when absent
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Pmid => return (!self.pmid.is_empty()).then_some(self.pmid.as_str()),
            Field::Owner => &self.owner,
            Field::Status => &self.status,
            Field::Title => &self.title,
            Field::AbstractText => &self.abstract_text,
            Field::Copyright => &self.copyright,
            Field::Language => &self.language,
            Field::PublicationStatus => &self.publication_status,
            Field::CitationSubset => &self.citation_subset,
            Field::CoiStatement => &self.coi_statement,
            Field::KeywordOwner => &self.keyword_owner,
            Field::DataBankName => &self.data_bank_name,
            Field::JournalTitle => &self.journal.title,
            Field::IsoAbbreviation => &self.journal.iso_abbreviation,
            Field::MedlineTa => &self.journal.medline_ta,
            Field::NlmUniqueId => &self.journal.nlm_unique_id,
            Field::Country => &self.journal.country,
            Field::Volume => &self.journal.volume,
            Field::Issue => &self.journal.issue,
            Field::PubYear => &self.journal.pub_year,
            Field::PubSeason => &self.journal.pub_season,
            Field::Issn => &self.journal.issn,
            Field::IssnElectronic => &self.journal.issn_electronic,
            Field::IssnLinking => &self.journal.issn_linking,
            Field::MedlinePgn => &self.pagination.medline_pgn,
            Field::StartPage => &self.pagination.start_page,
            Field::ElocationDoi => &self.ids.elocation_doi,
            Field::ElocationPii => &self.ids.elocation_pii,
            Field::Doi => &self.ids.doi,
            Field::Pii => &self.ids.pii,
            Field::Pmc => &self.ids.pmc,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Scalar field, [`UNKNOWN`] when absent
    pub fn value(&self, field: Field) -> &str {
        self.get(field).unwrap_or(UNKNOWN)
    }

    /// List field items joined with `"; "`; empty string for an empty list
    pub fn joined(&self, field: ListField) -> String {
        let items: Vec<String> = match field {
            ListField::Authors => self.authors.iter().map(Author::display_name).collect(),
            ListField::Affiliations => self
                .authors
                .iter()
                .filter_map(Author::first_affiliation)
                .map(str::to_string)
                .collect(),
            ListField::Keywords => self.keywords.clone(),
            ListField::PublicationTypes => self.publication_types.clone(),
            ListField::Chemicals => self.chemicals.iter().map(|c| c.name.clone()).collect(),
            ListField::GrantIds => self.grants.iter().filter_map(|g| g.id.clone()).collect(),
            ListField::GrantAgencies => {
                self.grants.iter().filter_map(|g| g.agency.clone()).collect()
            }
            ListField::Citations => self.citations.clone(),
            ListField::AccessionNumbers => self.accession_numbers.clone(),
        };
        items
            .into_iter()
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// DOI from the article id list, falling back to the ELocationID
    pub fn best_doi(&self) -> Option<&str> {
        self.get(Field::Doi).or_else(|| self.get(Field::ElocationDoi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(last: &str, fore: &str, initials: &str) -> Author {
        Author {
            last_name: Some(last.to_string()),
            fore_name: Some(fore.to_string()),
            initials: Some(initials.to_string()),
            ..Author::default()
        }
    }

    #[test]
    fn test_author_names() {
        let a = author("Smith", "John", "J");
        assert_eq!(a.display_name(), "Smith, John J");
        assert_eq!(a.full_name(), "Smith, John");
        assert_eq!(a.abbreviated_name(), "Smith J");
    }

    #[test]
    fn test_collective_author_names_are_trimmed() {
        let group = Author {
            last_name: Some("COVID-19 Study Group".to_string()),
            ..Author::default()
        };
        assert_eq!(group.display_name(), "COVID-19 Study Group");
        assert_eq!(group.full_name(), "COVID-19 Study Group");
        assert_eq!(group.abbreviated_name(), "COVID-19 Study Group");
    }

    #[test]
    fn test_value_returns_sentinel_for_absent_fields() {
        let mut record = Record::new("12345");
        record.title = Some("Test Article".to_string());
        record.journal.volume = Some(String::new());

        assert_eq!(record.value(Field::Pmid), "12345");
        assert_eq!(record.value(Field::Title), "Test Article");
        assert_eq!(record.value(Field::Country), UNKNOWN);
        assert_eq!(record.get(Field::Volume), None);
        assert_eq!(Record::default().get(Field::Pmid), None);
    }

    #[test]
    fn test_joined_lists() {
        let mut record = Record::new("1");
        record.authors = vec![author("Smith", "John", "J"), author("Doe", "Anna", "A")];
        record.authors[1].affiliations = vec!["Univ A".to_string(), "Hosp B".to_string()];
        record.grants = vec![
            Grant {
                id: Some("R01 1".to_string()),
                agency: Some("NIH".to_string()),
            },
            Grant {
                id: None,
                agency: Some("NSF".to_string()),
            },
        ];

        assert_eq!(record.joined(ListField::Authors), "Smith, John J; Doe, Anna A");
        assert_eq!(record.joined(ListField::Affiliations), "Univ A");
        assert_eq!(record.joined(ListField::GrantIds), "R01 1");
        assert_eq!(record.joined(ListField::GrantAgencies), "NIH; NSF");
        assert_eq!(record.joined(ListField::Keywords), "");
    }

    #[test]
    fn test_partial_date_renderings() {
        let full = PartialDate {
            year: Some("2024".to_string()),
            month: Some("01".to_string()),
            day: Some("15".to_string()),
        };
        assert_eq!(full.compact().as_deref(), Some("20240115"));
        assert_eq!(full.iso_or_zero(), "2024-01-15");

        let year_only = PartialDate {
            year: Some("2023".to_string()),
            ..PartialDate::default()
        };
        assert_eq!(year_only.compact().as_deref(), Some("2023"));
        assert_eq!(year_only.iso_or_zero(), "2023-00-00");

        assert_eq!(PartialDate::default().compact(), None);
        assert_eq!(PartialDate::default().iso_or_zero(), "0000-00-00");
    }

    #[test]
    fn test_history_keeps_last_value_and_orders_entries() {
        let mut history = PublicationHistory::default();
        history.set(HistoryStatus::Pubmed, "2024/01/02 06:00".to_string());
        history.set(HistoryStatus::Received, "2023/05/01 00:00".to_string());
        history.set(HistoryStatus::Pubmed, "2024/01/03 06:00".to_string());

        let entries: Vec<_> = history.entries().collect();
        assert_eq!(
            entries,
            vec![
                (HistoryStatus::Received, "2023/05/01 00:00"),
                (HistoryStatus::Pubmed, "2024/01/03 06:00"),
            ]
        );
        assert_eq!(HistoryStatus::parse("revised"), None);
        assert_eq!(HistoryStatus::parse("entrez"), Some(HistoryStatus::Entrez));
    }

    #[test]
    fn test_record_json_roundtrip_keeps_structure() {
        let mut record = Record::new("999");
        record.mesh_headings.push(MeshHeading {
            descriptor: MeshTerm::new("Cancer", true),
            qualifiers: vec![MeshTerm::new("therapy", false)],
        });
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

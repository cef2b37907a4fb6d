use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pmbib_formatter::flatten_records;
use pmbib_parser::{Record, parse_records_from_bytes};
use tracing::{debug, info, warn};

use super::{OutputFormat, render};
use crate::collaborators::{DelimitedFileSink, LocalXmlSource, MetadataSource, RecordSink};
use crate::config::AppConfig;

/// Search the metadata source, fetch every hit and write all export formats
#[derive(Args, Debug)]
pub struct Fetch {
    /// Query passed to the metadata source; empty matches all
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Maximum number of records to fetch
    #[arg(short, long, default_value = "200")]
    pub limit: usize,
}

/// What a fetch run produced
#[derive(Debug, Default, PartialEq)]
pub struct FetchSummary {
    /// Total matches reported by the source
    pub count: usize,
    /// Raw XML documents retrieved
    pub fetched: usize,
    pub records: usize,
    /// Export files written, in format order
    pub written: Vec<PathBuf>,
}

impl Fetch {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        let source = LocalXmlSource::new(config.input_dir()).with_max_results(self.limit);
        let summary = self.run(config, &source, &DelimitedFileSink::default())?;
        info!(
            count = summary.count,
            fetched = summary.fetched,
            records = summary.records,
            files = summary.written.len(),
            "Fetch completed"
        );
        Ok(())
    }

    pub fn run(
        &self,
        config: &AppConfig,
        source: &impl MetadataSource,
        sink: &impl RecordSink,
    ) -> Result<FetchSummary> {
        let (count, ids) = source.search(&self.query);
        let mut summary = FetchSummary {
            count,
            ..FetchSummary::default()
        };
        if ids.is_empty() {
            warn!(query = %self.query, "No records matched");
            return Ok(summary);
        }

        let mut records: Vec<Record> = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            let Some(xml) = source.fetch(id) else {
                continue;
            };
            summary.fetched += 1;

            let saved = config.xml_dir().join(format!("{i}_article_{id}.xml"));
            fs::write(&saved, &xml)
                .with_context(|| format!("Failed to save {}", saved.display()))?;
            debug!(id = %id, path = %saved.display(), "Saved raw XML");

            match parse_records_from_bytes(&xml) {
                Ok(extraction) => {
                    for failure in &extraction.errors {
                        warn!(id = %id, index = failure.index, "{}", failure.message);
                    }
                    records.extend(extraction.records);
                }
                Err(e) => warn!(id = %id, error = %e, "Skipping unparseable document"),
            }
        }
        summary.records = records.len();
        if records.is_empty() {
            warn!(query = %self.query, "No records extracted");
            return Ok(summary);
        }

        sink.append(
            &flatten_records(&records),
            &config.output_path(&config.files.records),
        )?;

        let files = &config.files;
        for (format, file_name) in [
            (OutputFormat::Pubmed, &files.pubmed),
            (OutputFormat::Bibliometrix, &files.bibliometrix),
            (OutputFormat::BibliometrixExtended, &files.bibliometrix_extended),
            (OutputFormat::Bibtex, &files.bibtex),
            (OutputFormat::Ris, &files.ris),
            (OutputFormat::Wos, &files.wos),
        ] {
            let path = config.output_path(file_name);
            let content = render(&records, format, &config.export)?;
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(format = ?format, path = %path.display(), "Exported");
            summary.written.push(path);
        }
        Ok(summary)
    }
}

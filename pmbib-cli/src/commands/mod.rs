pub mod clean;
pub mod convert;
pub mod fetch;
pub mod search;
pub mod wos;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use pmbib_formatter::{
    EXPORT_DELIMITER, ExportConfig, serialize_pubmed, serialize_wos, table_to_bibtex,
    table_to_ris, to_bibliometrix, to_bibliometrix_extended, wos_table_from_records,
};
use pmbib_parser::{Record, parse_records_from_bytes};
use tracing::{info, warn};

/// Output formats of `convert`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// PubMed flat file (MEDLINE/NBIB)
    Pubmed,
    /// Standard bibliometrix table (CSV)
    Bibliometrix,
    /// Extended bibliometrix table (CSV)
    BibliometrixExtended,
    Bibtex,
    Ris,
    /// Web of Science flat file
    Wos,
    /// Extracted records as JSON
    Json,
}

/// Render records in `format`
pub fn render(records: &[Record], format: OutputFormat, config: &ExportConfig) -> Result<String> {
    let content = match format {
        OutputFormat::Pubmed => serialize_pubmed(records, config),
        OutputFormat::Bibliometrix => to_bibliometrix(records).to_csv_string(EXPORT_DELIMITER)?,
        OutputFormat::BibliometrixExtended => {
            to_bibliometrix_extended(records, &config.extended_columns)
                .to_csv_string(EXPORT_DELIMITER)?
        }
        OutputFormat::Bibtex => table_to_bibtex(&to_bibliometrix(records))?,
        OutputFormat::Ris => table_to_ris(&to_bibliometrix(records))?,
        OutputFormat::Wos => serialize_wos(&wos_table_from_records(records)),
        OutputFormat::Json => serde_json::to_string_pretty(records)?,
    };
    Ok(content)
}

/// Extract records from XML files; per-article failures are logged and skipped
pub fn read_records(inputs: &[PathBuf]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for input in inputs {
        let bytes =
            fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
        let extraction = parse_records_from_bytes(&bytes)
            .with_context(|| format!("Failed to parse {}", input.display()))?;
        for failure in &extraction.errors {
            warn!(
                file = %input.display(),
                index = failure.index,
                pmid = failure.pmid.as_deref().unwrap_or(""),
                "{}",
                failure.message
            );
        }
        info!(
            file = %input.display(),
            records = extraction.records.len(),
            skipped = extraction.errors.len(),
            "Extracted records"
        );
        records.extend(extraction.records);
    }
    Ok(records)
}

/// Write to a file, or stdout when no path is given
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Results saved to file");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}

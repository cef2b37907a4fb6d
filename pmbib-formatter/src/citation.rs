//! BibTeX and RIS export
//!
//! Both formats are projections over a bibliometrix-mapped [`Table`]
//! (columns `AU`, `TI`, `SO`, `DI`, `PG`, `LA`, `DE`, `DT`, `PMID`).
//! List cells are `;`-delimited. The standard table from
//! [`crate::to_bibliometrix`] carries every column; the extended default
//! column set has no `PG` or `PMID` and is rejected.

use tracing::debug;

use crate::error::Result;
use crate::table::{Table, TableRow};

/// Columns every citation export reads
pub const CITATION_COLUMNS: [&str; 9] = ["AU", "TI", "SO", "DI", "PG", "LA", "DE", "DT", "PMID"];

/// Trait for exporting one table row to citation formats
pub trait ExportFormat {
    /// Export the row as a BibTeX entry
    fn to_bibtex(&self) -> String;

    /// Export the row as an RIS record ending in `ER  -`
    fn to_ris(&self) -> String;
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim)
}

impl ExportFormat for TableRow<'_> {
    fn to_bibtex(&self) -> String {
        let entry_type = self
            .get("DT")
            .map(|dt| dt.to_lowercase().replace(' ', ""))
            .unwrap_or_else(|| "article".to_string());
        let mut lines = vec![format!("@{entry_type}{{{},", self.get("PMID").unwrap_or(""))];

        if let Some(authors) = self.get("AU") {
            let authors: Vec<&str> = split_list(authors).collect();
            lines.push(format!("  author = {{{}}},", authors.join(" and ")));
        }
        for (name, column) in [
            ("title", "TI"),
            ("journal", "SO"),
            ("doi", "DI"),
            ("pages", "PG"),
            ("language", "LA"),
        ] {
            if let Some(value) = self.get(column) {
                lines.push(format!("  {name} = {{{value}}},"));
            }
        }
        if let Some(keywords) = self.get("DE") {
            let keywords: Vec<&str> = split_list(keywords).collect();
            lines.push(format!("  keywords = {{{}}},", keywords.join(", ")));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn to_ris(&self) -> String {
        let mut lines = Vec::new();

        if let Some(authors) = self.get("AU") {
            for author in split_list(authors) {
                lines.push(format!("AU  - {author}"));
            }
        }
        for (tag, column) in [
            ("TI", "TI"),
            ("JO", "SO"),
            ("TY", "DT"),
            ("LA", "LA"),
            ("KW", "DE"),
            ("DO", "DI"),
            ("SP", "PG"),
            ("ID", "PMID"),
        ] {
            if let Some(value) = self.get(column) {
                lines.push(format!("{tag}  - {value}"));
            }
        }

        lines.push("ER  -".to_string());
        lines.join("\n")
    }
}

/// Export every row as BibTeX, entries separated by a blank line.
///
/// Expects the standard bibliometrix table; a table without one of
/// [`CITATION_COLUMNS`] is a [`FormatError::MissingColumn`](crate::FormatError::MissingColumn).
pub fn table_to_bibtex(table: &Table) -> Result<String> {
    table.require_columns(&CITATION_COLUMNS)?;
    debug!(rows = table.len(), "Exporting BibTeX");
    Ok(table
        .iter_rows()
        .map(|row| row.to_bibtex())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// Export every row as RIS, records separated by a blank line.
///
/// Same column requirements as [`table_to_bibtex`].
pub fn table_to_ris(table: &Table) -> Result<String> {
    table.require_columns(&CITATION_COLUMNS)?;
    debug!(rows = table.len(), "Exporting RIS");
    Ok(table
        .iter_rows()
        .map(|row| row.to_ris())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

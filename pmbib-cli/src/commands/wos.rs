use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Args;
use pmbib_formatter::{Table, serialize_wos};
use tracing::info;

use super::write_output;
use crate::config::AppConfig;

/// Convert a delimited table with WoS source columns into a WoS flat file
#[derive(Args, Debug)]
pub struct Wos {
    /// Delimited file with a header row
    pub table: PathBuf,

    /// Field delimiter of the table
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Output file (defaults to the configured WoS file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Wos {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        ensure!(
            self.delimiter.is_ascii(),
            "Delimiter must be a single ASCII character"
        );
        let file = File::open(&self.table)
            .with_context(|| format!("Failed to open {}", self.table.display()))?;
        let table = Table::read_delimited(file, self.delimiter as u8)
            .with_context(|| format!("Failed to read {}", self.table.display()))?;
        info!(rows = table.len(), "Loaded WoS source table");

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| config.output_path(&config.files.wos));
        write_output(&serialize_wos(&table), Some(&output))
    }
}

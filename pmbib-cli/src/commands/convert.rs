use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{OutputFormat, read_records, render, write_output};
use crate::config::AppConfig;

/// Convert PubMed XML files into a bibliographic format
#[derive(Args, Debug)]
pub struct Convert {
    /// PubMed XML files (`PubmedArticleSet` documents)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pubmed")]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Convert {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        info!(inputs = self.inputs.len(), format = ?self.format, "Converting");

        let records = read_records(&self.inputs)?;
        let content = render(&records, self.format, &config.export)?;
        write_output(&content, self.output.as_deref())?;

        info!(records = records.len(), "Conversion completed");
        Ok(())
    }
}

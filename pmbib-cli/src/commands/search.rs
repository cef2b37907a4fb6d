use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::write_output;
use crate::collaborators::{LocalXmlSource, MetadataSource};
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct Search {
    /// Case-insensitive text matched against the local XML files; empty matches all
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Maximum number of ids to return
    #[arg(short, long, default_value = "200")]
    pub limit: usize,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show only ids (one per line)
    #[arg(long)]
    pub ids_only: bool,
}

#[derive(Serialize, Debug)]
struct SearchResult<'a> {
    query: &'a str,
    count: usize,
    ids: Vec<String>,
}

impl Search {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        let source = LocalXmlSource::new(config.input_dir()).with_max_results(self.limit);
        let content = self.run(&source)?;
        write_output(&content, self.output.as_deref())
    }

    fn run(&self, source: &impl MetadataSource) -> Result<String> {
        let (count, ids) = source.search(&self.query);
        info!(query = %self.query, count, "Found matching records");

        if self.ids_only {
            return Ok(ids.join("\n"));
        }
        let result = SearchResult {
            query: &self.query,
            count,
            ids,
        };
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

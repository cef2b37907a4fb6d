use std::fs::{self, File};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use crate::config::AppConfig;

/// Remove exported files and saved XML, and truncate the log file
#[derive(Args, Debug)]
pub struct Clean {
    /// Keep the raw XML saved by `fetch`
    #[arg(long)]
    pub keep_xml: bool,
}

impl Clean {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        let mut removed = 0;
        for name in config.files.all() {
            let path = config.output_path(name);
            if path.is_file() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                debug!(path = %path.display(), "Removed");
                removed += 1;
            }
        }

        let xml_dir = config.xml_dir();
        if !self.keep_xml && xml_dir.is_dir() {
            for entry in fs::read_dir(&xml_dir)? {
                let path = entry?.path();
                if path.is_file() {
                    fs::remove_file(&path)
                        .with_context(|| format!("Failed to remove {}", path.display()))?;
                    removed += 1;
                }
            }
        }

        if let Some(log) = config.log_path().filter(|p| p.is_file()) {
            File::create(&log)
                .with_context(|| format!("Failed to truncate {}", log.display()))?;
        }

        info!(removed, "Cleaned workspace");
        Ok(())
    }
}

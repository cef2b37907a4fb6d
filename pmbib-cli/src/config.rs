//! Application configuration loaded from YAML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pmbib_formatter::ExportConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Directories relative to [`AppConfig::root`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Directories {
    /// Local XML files served by the metadata source
    pub input: PathBuf,
    /// Exported files
    pub output: PathBuf,
    /// Raw XML saved by `fetch`
    pub xml: PathBuf,
    pub logs: PathBuf,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/input"),
            output: PathBuf::from("data/output"),
            xml: PathBuf::from("data/xml"),
            logs: PathBuf::from("logs"),
        }
    }
}

/// Output file names inside the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    /// Append-only `|`-delimited record store
    pub records: String,
    pub pubmed: String,
    pub bibliometrix: String,
    pub bibliometrix_extended: String,
    pub bibtex: String,
    pub ris: String,
    pub wos: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            records: "records.csv".to_string(),
            pubmed: "pubmed.txt".to_string(),
            bibliometrix: "bibliometrix.csv".to_string(),
            bibliometrix_extended: "bibliometrix_extended.csv".to_string(),
            bibtex: "references.bib".to_string(),
            ris: "references.ris".to_string(),
            wos: "wos.txt".to_string(),
        }
    }
}

impl OutputFiles {
    /// Every configured file name
    pub fn all(&self) -> [&str; 7] {
        [
            self.records.as_str(),
            self.pubmed.as_str(),
            self.bibliometrix.as_str(),
            self.bibliometrix_extended.as_str(),
            self.bibtex.as_str(),
            self.ris.as_str(),
            self.wos.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Log file relative to the root; stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base directory for every relative path below
    pub root: PathBuf,
    pub directories: Directories,
    pub files: OutputFiles,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load from YAML. A missing file yields the defaults; malformed YAML is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn input_dir(&self) -> PathBuf {
        self.resolve(&self.directories.input)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.directories.output)
    }

    pub fn xml_dir(&self) -> PathBuf {
        self.resolve(&self.directories.xml)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.resolve(&self.directories.logs)
    }

    /// Path of a file in the output directory
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir().join(file_name)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging.log_file.as_deref().map(|p| self.resolve(p))
    }

    /// Create every configured directory that does not exist yet
    pub fn setup_directories(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in [
            self.input_dir(),
            self.output_dir(),
            self.xml_dir(),
            self.logs_dir(),
        ] {
            if dir.exists() {
                debug!(path = %dir.display(), "Directory already exists");
                continue;
            }
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            info!(path = %dir.display(), "Created directory");
            created.push(dir);
        }
        Ok(created)
    }
}

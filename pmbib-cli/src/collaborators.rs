//! Metadata source and record sink used by the `search` and `fetch` commands

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pmbib_formatter::{STORE_DELIMITER, Table};
use tracing::{debug, error, info};

/// Count/id lookup and raw record retrieval
pub trait MetadataSource {
    /// Total match count and the matching ids; `(0, [])` on failure
    fn search(&self, query: &str) -> (usize, Vec<String>);

    /// Raw XML of one record; `None` on failure
    fn fetch(&self, id: &str) -> Option<Vec<u8>>;
}

/// Append-only persistence of the intermediate record table
pub trait RecordSink {
    fn append(&self, table: &Table, path: &Path) -> Result<()>;
}

/// A directory of `*.xml` files; the file stem is the record id
pub struct LocalXmlSource {
    dir: PathBuf,
    max_results: usize,
}

impl LocalXmlSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_results: 200,
        }
    }

    /// Cap on returned ids; the count still reports every match
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    fn xml_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "xml"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn matching_ids(&self, query: &str) -> io::Result<Vec<String>> {
        let needle = query.trim().to_lowercase();
        let mut ids = Vec::new();
        for path in self.xml_files()? {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if needle.is_empty() || fs::read_to_string(&path)?.to_lowercase().contains(&needle) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }
}

impl MetadataSource for LocalXmlSource {
    fn search(&self, query: &str) -> (usize, Vec<String>) {
        match self.matching_ids(query) {
            Ok(mut ids) => {
                let count = ids.len();
                ids.truncate(self.max_results);
                info!(query, count, returned = ids.len(), "Search completed");
                (count, ids)
            }
            Err(e) => {
                error!(query, dir = %self.dir.display(), error = %e, "Error during query execution");
                (0, Vec::new())
            }
        }
    }

    fn fetch(&self, id: &str) -> Option<Vec<u8>> {
        let path = self.dir.join(format!("{id}.xml"));
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(id, size = bytes.len(), "Fetched record");
                Some(bytes)
            }
            Err(e) => {
                error!(id, path = %path.display(), error = %e, "Error during data fetch");
                None
            }
        }
    }
}

/// Writes delimited rows; the header is written only when the file is created
pub struct DelimitedFileSink {
    delimiter: u8,
}

impl DelimitedFileSink {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for DelimitedFileSink {
    fn default() -> Self {
        Self::new(STORE_DELIMITER)
    }
}

impl RecordSink for DelimitedFileSink {
    fn append(&self, table: &Table, path: &Path) -> Result<()> {
        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        table.write_delimited(file, self.delimiter, is_new)?;
        info!(path = %path.display(), rows = table.len(), header = is_new, "Appended records");
        Ok(())
    }
}

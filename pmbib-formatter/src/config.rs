//! Export configuration

use serde::{Deserialize, Serialize};

/// Column order of the extended bibliometrix table
pub const DEFAULT_EXTENDED_COLUMNS: [&str; 31] = [
    "AU", "AF", "CR", "AB", "C1", "DE", "DI", "DT", "FU", "FX", "ID", "IS", "J9", "JI", "LA", "OA",
    "PU", "PY", "RP", "SO", "TC", "TI", "UT", "VL", "C1raw", "DB", "AU_UN", "AU1_UN", "AU_UN_NR",
    "SR_FULL", "SR",
];

/// Options shared by the serializers
///
/// # Example
///
/// ```
/// use pmbib_formatter::ExportConfig;
///
/// let config = ExportConfig::new().with_wrap_width(80);
/// assert_eq!(config.wrap_width, 80);
/// assert_eq!(config.identifier_width, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Maximum characters per line in PubMed output
    pub wrap_width: usize,
    /// Width of the `"TAG - "` prefix kept on the first line and used as
    /// indentation on continuation lines
    pub identifier_width: usize,
    /// Columns of the extended bibliometrix table, in output order
    pub extended_columns: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            wrap_width: 87,
            identifier_width: 6,
            extended_columns: DEFAULT_EXTENDED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PubMed line width
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    /// Set the tag prefix width
    pub fn with_identifier_width(mut self, width: usize) -> Self {
        self.identifier_width = width;
        self
    }

    /// Set the extended bibliometrix column list
    pub fn with_extended_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extended_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

//! Common test utilities for PubMed XML extraction tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the fixture XML, resolved from the workspace or crate root
pub fn pubmed_xml_dir() -> PathBuf {
    let xml_dir_workspace = Path::new("pmbib-parser/tests/integration/test_data/pubmed_xml");
    let xml_dir_local = Path::new("tests/integration/test_data/pubmed_xml");

    if xml_dir_workspace.exists() {
        xml_dir_workspace.to_path_buf()
    } else {
        xml_dir_local.to_path_buf()
    }
}

/// Read a fixture file by name
pub fn load_pubmed_xml(name: &str) -> String {
    let path = pubmed_xml_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read XML file: {path:?}"))
}

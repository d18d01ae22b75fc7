pub mod ingest;
pub mod inspect;
pub mod status;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::CleaningArgs;
use crate::extract::{CleaningOptions, ExtractOptions};
use crate::model::SourceDocument;

pub fn extract_options(cleaning: CleaningArgs) -> ExtractOptions {
    ExtractOptions {
        cleaning: CleaningOptions {
            repair_operator_case: !cleaning.no_operator_case_repair,
        },
        ..ExtractOptions::default()
    }
}

pub fn load_document(path: &Path) -> Result<SourceDocument> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

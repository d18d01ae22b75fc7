use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InspectArgs;
use crate::commands::{extract_options, load_document};
use crate::extract::WellExtractor;

pub fn run(args: InspectArgs) -> Result<()> {
    let document = load_document(&args.document_path)?;
    let extractor = WellExtractor::new(extract_options(args.cleaning))?;

    let source_name = args
        .document_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extracted = extractor.extract(&document, &source_name);

    info!(
        path = %args.document_path.display(),
        api_number = %extracted.well.api_number,
        stimulation_rows = extracted.stimulations.len(),
        "inspected document"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, &extracted)
        .context("failed to serialize extracted document")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::db_setup::{DB_SCHEMA_VERSION, configure_connection, count_rows, ensure_schema};
use super::store::apply_document;
use crate::cli::IngestArgs;
use crate::commands::{extract_options, load_document};
use crate::extract::WellExtractor;
use crate::model::{DocumentOutcome, IngestCounts, IngestPaths, IngestRunManifest};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

pub fn run(args: IngestArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(input_dir = %args.input_dir.display(), run_id = %run_id, "starting ingest");

    let documents = discover_documents(&args.input_dir)?;
    let mut output = io::BufWriter::new(io::stdout().lock());

    if documents.is_empty() {
        writeln!(
            output,
            "No JSON files found in '{}/'.",
            args.input_dir.display()
        )?;
        output.flush()?;
        return Ok(());
    }

    writeln!(
        output,
        "Found {} JSON file(s) in '{}/'\n",
        documents.len(),
        args.input_dir.display()
    )?;

    let extractor = WellExtractor::new(extract_options(args.cleaning))?;

    let mut connection = Connection::open(&args.db_path)
        .with_context(|| format!("failed to open {}", args.db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;

    let mut counts = IngestCounts {
        documents_found: documents.len(),
        ..IngestCounts::default()
    };
    let mut outcomes = Vec::with_capacity(documents.len());
    let mut warnings = Vec::new();

    for path in &documents {
        let filename = display_name(path);
        let sha256 = if args.manifest_path.is_some() {
            sha256_file(path).ok()
        } else {
            None
        };

        let document = match load_document(path) {
            Ok(document) => document,
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(path = %path.display(), error = %reason, "skipping unreadable document");
                counts.documents_failed += 1;
                warnings.push(format!("{filename}: {reason}"));
                outcomes.push(DocumentOutcome {
                    filename,
                    sha256,
                    api_number: None,
                    stimulation_rows: 0,
                    status: "failed".to_string(),
                    failure_reason: Some(reason),
                });
                continue;
            }
        };

        let extracted = extractor.extract(&document, &filename);
        let applied = apply_document(&mut connection, &extracted)?;
        debug!(
            api_number = %applied.api_number,
            well_created = applied.well_created,
            stimulation_rows = applied.stimulation_rows,
            "applied document"
        );

        counts.documents_processed += 1;
        counts.wells_upserted += 1;
        counts.stimulation_rows_inserted += applied.stimulation_rows;

        writeln!(
            output,
            "{}",
            progress_line(&filename, &applied.api_number, applied.stimulation_rows)
        )?;

        outcomes.push(DocumentOutcome {
            filename,
            sha256,
            api_number: Some(applied.api_number),
            stimulation_rows: applied.stimulation_rows,
            status: "ok".to_string(),
            failure_reason: None,
        });
    }

    counts.wells_total = count_rows(&connection, "SELECT COUNT(*) FROM wells")?;
    counts.stimulation_total = count_rows(&connection, "SELECT COUNT(*) FROM stimulation")?;

    writeln!(output, "\nDone.  Database: {}", args.db_path.display())?;
    writeln!(output, "  wells        : {} row(s)", counts.wells_total)?;
    writeln!(output, "  stimulation  : {} row(s)", counts.stimulation_total)?;
    output.flush()?;

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = IngestRunManifest {
            manifest_version: 1,
            run_id,
            db_schema_version: DB_SCHEMA_VERSION.to_string(),
            started_at,
            finished_at: now_utc_string(),
            paths: IngestPaths {
                input_dir: args.input_dir.display().to_string(),
                db_path: args.db_path.display().to_string(),
            },
            counts: counts.clone(),
            documents: outcomes,
            warnings,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote ingest run manifest");
    }

    info!(
        processed = counts.documents_processed,
        failed = counts.documents_failed,
        wells = counts.wells_total,
        stimulation = counts.stimulation_total,
        "ingest completed"
    );

    Ok(())
}

/// Input documents in the directory, sorted by filename.
pub fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn progress_line(filename: &str, api_number: &str, stimulation_rows: usize) -> String {
    let note = if stimulation_rows > 0 {
        format!(", {stimulation_rows} stim row(s)")
    } else {
        String::new()
    };
    format!("  {filename:<50}  →  {api_number}{note}")
}

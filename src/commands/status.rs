use std::io::{self, Write};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::ingest::count_rows;
use crate::extract::{FALLBACK_KEY_PREFIX, UNKNOWN_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub wells: i64,
    pub stimulation: i64,
    pub fallback_keyed_wells: i64,
    pub unknown_keyed_wells: i64,
    pub wells_with_coordinates: i64,
    pub orphan_stimulation_rows: i64,
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(db_path = %args.db_path.display(), "status requested");

    if !args.db_path.exists() {
        warn!(path = %args.db_path.display(), "database file missing");
        return Ok(());
    }

    let connection = Connection::open(&args.db_path)
        .with_context(|| format!("failed to open {}", args.db_path.display()))?;
    let status = collect_status(&connection)?;

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(output, "Database: {}", args.db_path.display())?;
    writeln!(output, "  wells              : {} row(s)", status.wells)?;
    writeln!(output, "  stimulation        : {} row(s)", status.stimulation)?;
    writeln!(output, "  fallback keys      : {}", status.fallback_keyed_wells)?;
    writeln!(output, "  unknown keys       : {}", status.unknown_keyed_wells)?;
    writeln!(output, "  with coordinates   : {}", status.wells_with_coordinates)?;
    writeln!(output, "  orphan stimulation : {}", status.orphan_stimulation_rows)?;
    output.flush()?;

    Ok(())
}

pub fn collect_status(connection: &Connection) -> Result<StoreStatus> {
    Ok(StoreStatus {
        wells: count_rows(connection, "SELECT COUNT(*) FROM wells")?,
        stimulation: count_rows(connection, "SELECT COUNT(*) FROM stimulation")?,
        fallback_keyed_wells: count_matching(
            connection,
            "SELECT COUNT(*) FROM wells WHERE api_number LIKE ?1 || '%'",
            FALLBACK_KEY_PREFIX,
        )?,
        unknown_keyed_wells: count_matching(
            connection,
            "SELECT COUNT(*) FROM wells WHERE api_number = ?1",
            UNKNOWN_KEY,
        )?,
        wells_with_coordinates: count_rows(
            connection,
            "SELECT COUNT(*) FROM wells WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
        )?,
        orphan_stimulation_rows: count_rows(
            connection,
            "
            SELECT COUNT(*) FROM stimulation s
            LEFT JOIN wells w ON w.api_number = s.api_number
            WHERE w.api_number IS NULL
            ",
        )?,
    })
}

fn count_matching(connection: &Connection, sql: &str, value: &str) -> Result<i64> {
    let count = connection
        .query_row(sql, [value], |row| row.get(0))
        .with_context(|| format!("failed to count rows: {sql}"))?;
    Ok(count)
}

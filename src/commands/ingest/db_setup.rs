use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::util::now_utc_string;

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

pub fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    // Stimulation rows may outlive or precede their well row.
    connection
        .pragma_update(None, "foreign_keys", "OFF")
        .context("failed to set foreign_keys=OFF")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS wells (
              api_number   TEXT PRIMARY KEY,
              well_name    TEXT,
              well_number  TEXT,
              operator     TEXT,
              county       TEXT,
              state        TEXT,
              shl_desc     TEXT,
              latitude     REAL,
              longitude    REAL,
              datum        TEXT,
              pdf_filename TEXT
            );

            CREATE TABLE IF NOT EXISTS stimulation (
              stimulation_id  INTEGER PRIMARY KEY AUTOINCREMENT,
              api_number      TEXT,
              date_stimulated TEXT,
              formation       TEXT,
              top_ft          REAL,
              bottom_ft       REAL,
              stages          INTEGER,
              volume          REAL,
              volume_units    TEXT,
              treatment_type  TEXT,
              acid_percent    REAL,
              lbs_proppant    REAL,
              max_pressure    REAL,
              max_rate        REAL,
              details         TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_stimulation_api ON stimulation(api_number);
            ",
        )
        .context("failed to create well schema")?;

    let now = now_utc_string();
    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            [DB_SCHEMA_VERSION],
        )
        .context("failed to record db_schema_version")?;
    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES('updated_at', ?1)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            [now],
        )
        .context("failed to record updated_at")?;

    Ok(())
}

pub fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection
        .query_row(sql, [], |row| row.get(0))
        .with_context(|| format!("failed to count rows: {sql}"))?;
    Ok(count)
}

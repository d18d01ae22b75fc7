use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};

use crate::extract::merge_well;
use crate::model::{ExtractedDocument, StimulationRecord, WellRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDocument {
    pub api_number: String,
    pub well_created: bool,
    pub stimulation_rows: usize,
}

/// Writes one document's well upsert and stimulation inserts as a unit.
pub fn apply_document(
    connection: &mut Connection,
    document: &ExtractedDocument,
) -> Result<AppliedDocument> {
    let tx = connection.transaction()?;

    let api_number = document.well.api_number.clone();
    let existing = load_well(&tx, &api_number)?;
    let well_created = existing.is_none();
    let merged = match existing {
        Some(existing) => merge_well(existing, document.well.clone()),
        None => document.well.clone(),
    };
    upsert_well(&tx, &merged)?;

    for record in &document.stimulations {
        insert_stimulation(&tx, &api_number, record)?;
    }

    tx.commit()
        .with_context(|| format!("failed to commit document for {api_number}"))?;

    Ok(AppliedDocument {
        api_number,
        well_created,
        stimulation_rows: document.stimulations.len(),
    })
}

pub fn load_well(connection: &Connection, api_number: &str) -> Result<Option<WellRecord>> {
    connection
        .query_row(
            "
            SELECT api_number, well_name, well_number, operator, county, state,
                   shl_desc, latitude, longitude, datum, pdf_filename
            FROM wells
            WHERE api_number = ?1
            ",
            [api_number],
            well_from_row,
        )
        .optional()
        .with_context(|| format!("failed to load well {api_number}"))
}

fn well_from_row(row: &Row<'_>) -> rusqlite::Result<WellRecord> {
    Ok(WellRecord {
        api_number: row.get(0)?,
        well_name: row.get(1)?,
        well_number: row.get(2)?,
        operator: row.get(3)?,
        county: row.get(4)?,
        state: row.get(5)?,
        shl_desc: row.get(6)?,
        latitude: row.get(7)?,
        longitude: row.get(8)?,
        datum: row.get(9)?,
        pdf_filename: row.get(10)?,
    })
}

fn upsert_well(tx: &Transaction<'_>, well: &WellRecord) -> Result<()> {
    tx.execute(
        "
        INSERT INTO wells(
          api_number, well_name, well_number, operator, county, state,
          shl_desc, latitude, longitude, datum, pdf_filename
        )
        VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(api_number) DO UPDATE SET
          well_name=excluded.well_name,
          well_number=excluded.well_number,
          operator=excluded.operator,
          county=excluded.county,
          state=excluded.state,
          shl_desc=excluded.shl_desc,
          latitude=excluded.latitude,
          longitude=excluded.longitude,
          datum=excluded.datum,
          pdf_filename=excluded.pdf_filename
        ",
        params![
            well.api_number,
            well.well_name,
            well.well_number,
            well.operator,
            well.county,
            well.state,
            well.shl_desc,
            well.latitude,
            well.longitude,
            well.datum,
            well.pdf_filename,
        ],
    )
    .with_context(|| format!("failed to upsert well {}", well.api_number))?;
    Ok(())
}

fn insert_stimulation(
    tx: &Transaction<'_>,
    api_number: &str,
    record: &StimulationRecord,
) -> Result<()> {
    tx.execute(
        "
        INSERT INTO stimulation(
          api_number, date_stimulated, formation, top_ft, bottom_ft,
          stages, volume, volume_units, treatment_type, acid_percent,
          lbs_proppant, max_pressure, max_rate, details
        )
        VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        ",
        params![
            api_number,
            record.date_stimulated,
            record.formation,
            record.top_ft,
            record.bottom_ft,
            record.stages,
            record.volume,
            record.volume_units,
            record.treatment_type,
            record.acid_percent,
            record.lbs_proppant,
            record.max_pressure,
            record.max_rate,
            record.details,
        ],
    )
    .with_context(|| format!("failed to insert stimulation row for {api_number}"))?;
    Ok(())
}

//! Line-oriented recovery of stimulation treatment rows from page text.
//!
//! The scanner is a small state machine. [`transition`] is the whole table:
//! it maps the current state and the classified line to the next state and
//! the action the driver performs. Row and treatment matches are decided by
//! the driver, since only a successful row match opens a record body.

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::StimulationRecord;
use crate::util::parse_grouped_f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for a "Date Stimulated" header.
    Seek,
    /// Header seen; the next non-blank, non-header line must be a data row.
    AwaitRow,
    /// Inside a record. `details` is set once a "Details" line was seen.
    Body { details: bool },
    /// "Type Treatment" header seen; the next non-blank line is its row.
    AwaitTreatment { details: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    StimulationHeader,
    TreatmentHeader,
    DetailsMarker,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    /// Match the line against the row grammar; a miss returns to `Seek`.
    ParseRow,
    ParseTreatment,
    AppendDetail,
    /// Close the open record and feed the same line to the next state.
    FinishAndReplay,
}

pub fn transition(state: ScanState, line: LineKind) -> (ScanState, Action) {
    use Action::*;
    use LineKind::*;
    use ScanState::*;

    match (state, line) {
        (Seek, StimulationHeader) => (AwaitRow, Skip),
        (Seek, _) => (Seek, Skip),
        (AwaitRow, Blank | StimulationHeader) => (AwaitRow, Skip),
        (AwaitRow, _) => (AwaitRow, ParseRow),
        (Body { .. }, StimulationHeader) => (Seek, FinishAndReplay),
        (Body { details }, TreatmentHeader) => (AwaitTreatment { details }, Skip),
        (Body { .. }, DetailsMarker) => (Body { details: true }, Skip),
        (Body { details: true }, Text) => (Body { details: true }, AppendDetail),
        (Body { details }, Blank | Text) => (Body { details }, Skip),
        (AwaitTreatment { details }, Blank) => (AwaitTreatment { details }, Skip),
        (AwaitTreatment { details }, _) => (Body { details }, ParseTreatment),
    }
}

#[derive(Debug)]
pub struct StimulationParser {
    stimulation_header: Regex,
    treatment_header: Regex,
    row: Regex,
    treatment_row: Regex,
}

impl StimulationParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            stimulation_header: Regex::new(r"(?i)Date\s+Stimulat")
                .context("failed to compile stimulation header regex")?,
            treatment_header: Regex::new(r"(?i)Type\s+Treatment")
                .context("failed to compile treatment header regex")?,
            row: Regex::new(
                r"(\d{1,2}/\d{1,2}/\d{4})\s+([A-Za-z][A-Za-z ]{1,30}?)\s+(\d+)\s+(\d+)\s+(\d+)\s+([\d,]+)\s+([A-Za-z]+)",
            )
            .context("failed to compile stimulation row regex")?,
            treatment_row: Regex::new(
                r"^([A-Za-z][A-Za-z ]{1,30}?)\s+([\d,]+(?:\.\d+)?)(?:\s+([\d,]+(?:\.\d+)?))?(?:\s+([\d,]+(?:\.\d+)?))?(?:\s+([\d,]+(?:\.\d+)?))?",
            )
            .context("failed to compile treatment row regex")?,
        })
    }

    /// Cheap pre-check so pages without a stimulation table skip the scan.
    pub fn has_table(&self, page_text: &str) -> bool {
        self.stimulation_header.is_match(page_text)
    }

    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            LineKind::Blank
        } else if self.stimulation_header.is_match(line) {
            LineKind::StimulationHeader
        } else if self.treatment_header.is_match(line) {
            LineKind::TreatmentHeader
        } else if trimmed.eq_ignore_ascii_case("details") {
            LineKind::DetailsMarker
        } else {
            LineKind::Text
        }
    }

    /// Scans one page. Malformed layout never errors; it yields fewer records.
    pub fn parse_page(&self, page_text: &str) -> Vec<StimulationRecord> {
        let lines: Vec<&str> = page_text.lines().collect();
        let mut records = Vec::new();
        let mut open: Option<OpenRecord> = None;
        let mut state = ScanState::Seek;
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];
            let (next, action) = transition(state, self.classify(line));
            state = next;

            match action {
                Action::Skip => {}
                Action::ParseRow => match self.parse_row(line) {
                    Some(record) => {
                        open = Some(OpenRecord::new(record));
                        state = ScanState::Body { details: false };
                    }
                    None => state = ScanState::Seek,
                },
                Action::ParseTreatment => {
                    if let Some(current) = open.as_mut() {
                        self.apply_treatment_row(line, &mut current.record);
                    }
                }
                Action::AppendDetail => {
                    if let Some(current) = open.as_mut() {
                        current.details.push(line.trim().to_string());
                    }
                }
                Action::FinishAndReplay => {
                    if let Some(current) = open.take() {
                        records.push(current.finish());
                    }
                    continue;
                }
            }

            index += 1;
        }

        if let Some(current) = open.take() {
            records.push(current.finish());
        }

        records
    }

    pub fn parse_row(&self, line: &str) -> Option<StimulationRecord> {
        let caps = self.row.captures(line)?;

        Some(StimulationRecord {
            date_stimulated: caps[1].to_string(),
            formation: Some(caps[2].trim().to_string()),
            top_ft: parse_grouped_f64(&caps[3]),
            bottom_ft: parse_grouped_f64(&caps[4]),
            stages: caps[5].parse::<i64>().ok(),
            volume: parse_grouped_f64(&caps[6]),
            volume_units: Some(caps[7].to_string()),
            ..StimulationRecord::default()
        })
    }

    /// Numeric columns are right-aligned: four values fill acid percent,
    /// proppant, pressure and rate; three drop acid percent; fewer fill only
    /// proppant.
    pub fn apply_treatment_row(&self, line: &str, record: &mut StimulationRecord) -> bool {
        let Some(caps) = self.treatment_row.captures(line.trim()) else {
            return false;
        };

        let values: Vec<f64> = (2..=5)
            .filter_map(|group| caps.get(group))
            .filter_map(|value| parse_grouped_f64(value.as_str()))
            .collect();

        record.treatment_type = Some(caps[1].trim().to_string());
        match values.as_slice() {
            [acid, proppant, pressure, rate] => {
                record.acid_percent = Some(*acid);
                record.lbs_proppant = Some(*proppant);
                record.max_pressure = Some(*pressure);
                record.max_rate = Some(*rate);
            }
            [proppant, pressure, rate] => {
                record.lbs_proppant = Some(*proppant);
                record.max_pressure = Some(*pressure);
                record.max_rate = Some(*rate);
            }
            [proppant, ..] => record.lbs_proppant = Some(*proppant),
            [] => {}
        }

        true
    }
}

#[derive(Debug)]
struct OpenRecord {
    record: StimulationRecord,
    details: Vec<String>,
}

impl OpenRecord {
    fn new(record: StimulationRecord) -> Self {
        Self {
            record,
            details: Vec::new(),
        }
    }

    fn finish(mut self) -> StimulationRecord {
        if !self.details.is_empty() {
            self.record.details = Some(self.details.join("\n"));
        }
        self.record
    }
}

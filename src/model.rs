use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One extracted source document: per-page text plus label/value guesses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDocument {
    #[serde(default, deserialize_with = "lenient_text")]
    pub pdf_filename: String,
    #[serde(default)]
    pub well_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_pages")]
    pub pages: Vec<SourcePage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePage {
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_fields")]
    pub fields: HashMap<String, String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn lenient_pages<'de, D>(deserializer: D) -> Result<Vec<SourcePage>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<SourcePage>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

// Scalars are kept in string form; nulls and nested values are dropped.
fn lenient_fields<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, serde_json::Value>>::deserialize(deserializer)?;
    let fields = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(label, value)| {
            let text = match value {
                serde_json::Value::String(text) => text,
                serde_json::Value::Number(number) => number.to_string(),
                serde_json::Value::Bool(flag) => flag.to_string(),
                _ => return None,
            };
            Some((label, text))
        })
        .collect();
    Ok(fields)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WellRecord {
    pub api_number: String,
    pub well_name: Option<String>,
    pub well_number: Option<String>,
    pub operator: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub shl_desc: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub datum: Option<String>,
    pub pdf_filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StimulationRecord {
    pub date_stimulated: String,
    pub formation: Option<String>,
    pub top_ft: Option<f64>,
    pub bottom_ft: Option<f64>,
    pub stages: Option<i64>,
    pub volume: Option<f64>,
    pub volume_units: Option<String>,
    pub treatment_type: Option<String>,
    pub acid_percent: Option<f64>,
    pub lbs_proppant: Option<f64>,
    pub max_pressure: Option<f64>,
    pub max_rate: Option<f64>,
    pub details: Option<String>,
}

/// Everything the engine derives from one source document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    pub well: WellRecord,
    pub stimulations: Vec<StimulationRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestPaths {
    pub input_dir: String,
    pub db_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestCounts {
    pub documents_found: usize,
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub wells_upserted: usize,
    pub stimulation_rows_inserted: usize,
    pub wells_total: i64,
    pub stimulation_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub filename: String,
    pub sha256: Option<String>,
    pub api_number: Option<String>,
    pub stimulation_rows: usize,
    pub status: String,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub started_at: String,
    pub finished_at: String,
    pub paths: IngestPaths,
    pub counts: IngestCounts,
    pub documents: Vec<DocumentOutcome>,
    pub warnings: Vec<String>,
}

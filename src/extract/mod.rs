//! Extraction and normalization of well-completion report text.
//!
//! Nothing here fails on malformed content: unusable values come back as
//! `None`, unparseable tables as empty vectors. Only building the extractor
//! (compiling the rule tables) can fail.

mod clean;
mod fields;
mod geo;
mod identity;
mod merge;
mod rules;
mod stimulation;
#[cfg(test)]
mod tests;

use anyhow::Result;

use crate::model::{ExtractedDocument, SourceDocument, StimulationRecord, WellRecord};
use crate::util::collapse_whitespace;

pub use clean::CleaningOptions;
pub use identity::{FALLBACK_KEY_PREFIX, UNKNOWN_KEY};
pub use merge::merge_well;

use clean::TextCleaners;
use fields::DocumentView;
use geo::{CoordinateParser, Jurisdiction, NORTH_DAKOTA};
use identity::resolve_identity;
use rules::{
    API_RULES, COUNTY_FIELDS, COUNTY_RULES, DATUM_FIELDS, DATUM_RULES, LATITUDE_FIELD,
    LATITUDE_RULES, LONGITUDE_RULES, OPERATOR_FIELDS, OPERATOR_RULES, RuleSet, SHL_FIELDS,
    SHL_RULES, Strategy, WELL_NUMBER_RULES, first_valid,
};
use stimulation::StimulationParser;

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub jurisdiction: Jurisdiction,
    pub cleaning: CleaningOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            jurisdiction: NORTH_DAKOTA,
            cleaning: CleaningOptions::default(),
        }
    }
}

#[derive(Debug)]
struct RuleTables {
    api: RuleSet,
    well_number: RuleSet,
    operator: RuleSet,
    county: RuleSet,
    shl: RuleSet,
    latitude: RuleSet,
    longitude: RuleSet,
    datum: RuleSet,
}

impl RuleTables {
    fn compile() -> Result<Self> {
        Ok(Self {
            api: RuleSet::compile(API_RULES)?,
            well_number: RuleSet::compile(WELL_NUMBER_RULES)?,
            operator: RuleSet::compile(OPERATOR_RULES)?,
            county: RuleSet::compile(COUNTY_RULES)?,
            shl: RuleSet::compile(SHL_RULES)?,
            latitude: RuleSet::compile(LATITUDE_RULES)?,
            longitude: RuleSet::compile(LONGITUDE_RULES)?,
            datum: RuleSet::compile(DATUM_RULES)?,
        })
    }
}

#[derive(Debug)]
pub struct WellExtractor {
    jurisdiction: Jurisdiction,
    rules: RuleTables,
    cleaners: TextCleaners,
    coordinates: CoordinateParser,
    stimulation: StimulationParser,
}

impl WellExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self> {
        Ok(Self {
            jurisdiction: options.jurisdiction,
            rules: RuleTables::compile()?,
            cleaners: TextCleaners::new(options.cleaning)?,
            coordinates: CoordinateParser::new(options.jurisdiction)?,
            stimulation: StimulationParser::new()?,
        })
    }

    /// `source_name` stands in for a missing `pdf_filename`.
    pub fn extract(&self, document: &SourceDocument, source_name: &str) -> ExtractedDocument {
        let pdf_filename = if document.pdf_filename.trim().is_empty() {
            source_name
        } else {
            document.pdf_filename.trim()
        };

        let view = DocumentView::merge(&document.pages);
        let well = self.extract_well(&view, document.well_name.as_deref(), pdf_filename);
        let stimulations = self.extract_stimulations(document);

        ExtractedDocument { well, stimulations }
    }

    fn extract_well(
        &self,
        view: &DocumentView<'_>,
        well_name: Option<&str>,
        pdf_filename: &str,
    ) -> WellRecord {
        let identity = resolve_identity(
            view,
            pdf_filename,
            &self.rules.api,
            &self.rules.well_number,
        );

        let operator = first_valid(
            &[
                Strategy::PageFields(OPERATOR_FIELDS),
                Strategy::Search(&self.rules.operator),
            ],
            view,
            "operator",
            |raw| self.cleaners.clean_operator(raw),
        );

        let county = first_valid(
            &[
                Strategy::Fields(COUNTY_FIELDS),
                Strategy::Search(&self.rules.county),
            ],
            view,
            "county",
            |raw| self.cleaners.clean_county(raw),
        );

        let shl_desc = first_valid(
            &[Strategy::Fields(SHL_FIELDS), Strategy::Search(&self.rules.shl)],
            view,
            "shl_desc",
            |raw| {
                let value = collapse_whitespace(raw);
                (!value.is_empty()).then_some(value)
            },
        );

        let latitude = first_valid(
            &[
                Strategy::SearchField(LATITUDE_FIELD, &self.rules.latitude),
                Strategy::Search(&self.rules.latitude),
            ],
            view,
            "latitude",
            |raw| self.coordinates.latitude(raw),
        );

        let longitude = first_valid(
            &[
                Strategy::SearchField(LATITUDE_FIELD, &self.rules.longitude),
                Strategy::Search(&self.rules.longitude),
            ],
            view,
            "longitude",
            |raw| self.coordinates.longitude(raw),
        );

        let datum = first_valid(
            &[
                Strategy::Fields(DATUM_FIELDS),
                Strategy::SearchField(LATITUDE_FIELD, &self.rules.datum),
                Strategy::Search(&self.rules.datum),
            ],
            view,
            "datum",
            |raw| self.cleaners.clean_datum(raw),
        );

        WellRecord {
            api_number: identity.api_number,
            well_name: well_name.and_then(|name| self.cleaners.clean_well_name(name)),
            well_number: identity.well_number,
            operator,
            county,
            state: Some(self.jurisdiction.state.to_string()),
            shl_desc,
            latitude,
            longitude,
            datum,
            pdf_filename: (!pdf_filename.is_empty()).then(|| pdf_filename.to_string()),
        }
    }

    /// Records from every page, in page order.
    pub fn extract_stimulations(&self, document: &SourceDocument) -> Vec<StimulationRecord> {
        document
            .pages
            .iter()
            .filter(|page| self.stimulation.has_table(&page.text))
            .flat_map(|page| self.stimulation.parse_page(&page.text))
            .collect()
    }
}

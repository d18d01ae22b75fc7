//! Cleaners for free-text fields corrupted by OCR and layout bleed.

use anyhow::{Context, Result};
use regex::Regex;

use crate::util::collapse_whitespace;

const OPERATOR_MIN_CHARS: usize = 5;
const COUNTY_MAX_CHARS: usize = 30;
const DATUM_MAX_CHARS: usize = 25;

#[derive(Debug, Clone, Copy)]
pub struct CleaningOptions {
    pub repair_operator_case: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            repair_operator_case: true,
        }
    }
}

#[derive(Debug)]
pub struct TextCleaners {
    options: CleaningOptions,
    operator_junk_start: Regex,
    operator_stop: Regex,
    column_gap: Regex,
    stray_leading_char: Regex,
    merged_leading_char: Regex,
    non_operator_word: Regex,
    county_boundary: Regex,
    county_shape: Regex,
    well_name_api: Regex,
    well_name_file_no: Regex,
    well_name_contacts: Regex,
    well_name_label_only: Regex,
    datum_nad83: Regex,
    datum_nad27: Regex,
    datum_measurement: Regex,
    datum_prefix: Regex,
    datum_keyword: Regex,
    datum_noise: Regex,
}

impl TextCleaners {
    pub fn new(options: CleaningOptions) -> Result<Self> {
        Ok(Self {
            options,
            operator_junk_start: Regex::new(
                r"(?i)^(?:Kick-off|Rig\b|Job\s+Type|Enseco|Well\s+Name|Telephone)\s*[#:\d]",
            )
            .context("failed to compile operator junk-prefix regex")?,
            operator_stop: Regex::new(
                r"(?i)\s+(?:Kick-off|Rig|API|Telephone|Well\s+Name|Job\s+Type|Enseco)\s*[#:]",
            )
            .context("failed to compile operator stop-phrase regex")?,
            column_gap: Regex::new(r"\s{3,}").context("failed to compile column gap regex")?,
            stray_leading_char: Regex::new(r"^[a-z]\s+")
                .context("failed to compile stray leading character regex")?,
            merged_leading_char: Regex::new(r"^([a-z])([A-Z])")
                .context("failed to compile merged leading character regex")?,
            non_operator_word: Regex::new(r"(?i)^(?:Well|Lease|Field|County|State|None)$")
                .context("failed to compile non-operator word regex")?,
            county_boundary: Regex::new(r"\s*(?:State|Section|Township|Directional|:)")
                .context("failed to compile county boundary regex")?,
            county_shape: Regex::new(r"^[A-Za-z ]+$")
                .context("failed to compile county shape regex")?,
            well_name_api: Regex::new(r"(?i)\s+API\s*:.*$")
                .context("failed to compile well name API regex")?,
            well_name_file_no: Regex::new(r"(?i)\s+Well\s+File\s+No\.?:?.*$")
                .context("failed to compile well name file number regex")?,
            well_name_contacts: Regex::new(
                r"(?i)\s+(?:Directional\s+Drillers|Field|Pad\s+OD|Company\s+Man)(?:\s*:|)\s*\S.*$",
            )
            .context("failed to compile well name contact label regex")?,
            well_name_label_only: Regex::new(
                r"(?i)^.{0,5}(?:Location|Field\s*/\s*Prospect|Directional\s+Drillers|Mud\s+Record)\s*:?$",
            )
            .context("failed to compile well name label-only regex")?,
            datum_nad83: Regex::new(r"(?i)North\s+American\s+Datum\s+1983")
                .context("failed to compile NAD83 regex")?,
            datum_nad27: Regex::new(r"(?i)North\s+American\s+Datum\s+1927")
                .context("failed to compile NAD27 regex")?,
            datum_measurement: Regex::new(r"(?i)\d.*(?:ft|usft|RKB|WELL|@)")
                .context("failed to compile datum measurement regex")?,
            datum_prefix: Regex::new(r"(?i)^((?:NAD|WGS|NAO)\s*\d{2,4})")
                .context("failed to compile datum prefix regex")?,
            datum_keyword: Regex::new(r"(?i)NAD|WGS|North\s+American|GRS|NAVD")
                .context("failed to compile datum keyword regex")?,
            datum_noise: Regex::new(r"[()@\\]").context("failed to compile datum noise regex")?,
        })
    }

    /// Cleans one operator candidate, returning `None` when it is junk.
    pub fn clean_operator(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if self.operator_junk_start.is_match(raw) {
            return None;
        }

        let before_stop = self.operator_stop.split(raw).next().unwrap_or_default();
        let before_gap = self.column_gap.split(before_stop).next().unwrap_or_default();
        let mut cleaned = collapse_whitespace(before_gap);

        if self.options.repair_operator_case {
            cleaned = self.repair_leading_case(&cleaned);
        }

        if cleaned.ends_with(':')
            || cleaned.chars().count() < OPERATOR_MIN_CHARS
            || self.non_operator_word.is_match(&cleaned)
        {
            return None;
        }

        Some(cleaned)
    }

    /// Drops a lone lowercase character before the first word and uppercases
    /// a lowercase character fused onto a capitalized word (`eEOG` style).
    pub fn repair_leading_case(&self, value: &str) -> String {
        let without_stray = self.stray_leading_char.replace(value, "");
        self.merged_leading_char
            .replace(&without_stray, |caps: &regex::Captures<'_>| {
                format!("{}{}", caps[1].to_uppercase(), &caps[2])
            })
            .into_owned()
    }

    pub fn clean_county(&self, raw: &str) -> Option<String> {
        let head = self.county_boundary.split(raw).next().unwrap_or_default();
        let county = title_case(&collapse_whitespace(head));
        let length = county.chars().count();

        ((2..=COUNTY_MAX_CHARS).contains(&length) && self.county_shape.is_match(&county))
            .then_some(county)
    }

    pub fn clean_well_name(&self, raw: &str) -> Option<String> {
        let mut name = collapse_whitespace(raw);
        for pattern in [
            &self.well_name_api,
            &self.well_name_file_no,
            &self.well_name_contacts,
        ] {
            name = pattern.replace(&name, "").trim().to_string();
        }

        if name.is_empty() || name.ends_with(':') || self.well_name_label_only.is_match(&name) {
            return None;
        }

        Some(name)
    }

    pub fn clean_datum(&self, raw: &str) -> Option<String> {
        let datum = collapse_whitespace(raw);
        if datum.is_empty() {
            return None;
        }

        if self.datum_nad83.is_match(&datum) {
            return Some("NAD83".to_string());
        }
        if self.datum_nad27.is_match(&datum) {
            return Some("NAD27".to_string());
        }
        if self.datum_measurement.is_match(&datum) {
            return None;
        }

        if let Some(caps) = self.datum_prefix.captures(&datum) {
            let prefix = caps[1].trim();
            let head = prefix.get(..3).unwrap_or(prefix);
            if head.eq_ignore_ascii_case("NAO") {
                return Some(format!("NAD{}", &prefix[3..]));
            }
            return Some(prefix.to_string());
        }

        (self.datum_keyword.is_match(&datum)
            && datum.chars().count() <= DATUM_MAX_CHARS
            && !self.datum_noise.is_match(&datum))
        .then_some(datum)
    }
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_alpha = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            output.push(ch);
            previous_alpha = false;
        }
    }

    output
}

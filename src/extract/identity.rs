use std::path::Path;

use super::fields::DocumentView;
use super::rules::{API_FIELDS, RuleSet, Strategy, WELL_NUMBER_FIELDS, first_valid};
use crate::util::digits_only;

pub const UNKNOWN_KEY: &str = "UNKNOWN";
pub const FALLBACK_KEY_PREFIX: &str = "NDIC-";

const API_MIN_DIGITS: usize = 8;
const WELL_NUMBER_MIN: u64 = 1_000;
const WELL_NUMBER_MAX: u64 = 199_999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellIdentity {
    pub api_number: String,
    pub well_number: Option<String>,
}

/// Canonicalizes an API candidate.
///
/// Whitespace is dropped; anything carrying letters or fewer than eight
/// digits is rejected. Ten and fourteen digit values are regrouped as `NN-NNN-NNNNN[-NN-NN]`; other
/// lengths come back as the whitespace-free input.
pub fn normalize_api(raw: &str) -> Option<String> {
    let candidate: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if candidate.chars().any(char::is_alphabetic) {
        return None;
    }

    let digits = digits_only(&candidate);
    match digits.len() {
        len if len < API_MIN_DIGITS => None,
        14 => Some(format!(
            "{}-{}-{}-{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..10],
            &digits[10..12],
            &digits[12..]
        )),
        10 => Some(format!(
            "{}-{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..10]
        )),
        _ => Some(candidate),
    }
}

/// Accepts a file number whose digits fall inside the issued range.
pub fn validate_well_number(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    let value = digits.parse::<u64>().ok()?;
    (WELL_NUMBER_MIN..=WELL_NUMBER_MAX)
        .contains(&value)
        .then_some(digits)
}

pub fn well_number_from_filename(pdf_filename: &str) -> Option<String> {
    let stem = Path::new(pdf_filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let digits = digits_only(stem);
    (!digits.is_empty()).then_some(digits)
}

pub fn fallback_key(well_number: Option<&str>) -> String {
    match well_number {
        Some(number) => format!("{FALLBACK_KEY_PREFIX}{number}"),
        None => UNKNOWN_KEY.to_string(),
    }
}

pub fn resolve_identity(
    view: &DocumentView<'_>,
    pdf_filename: &str,
    api_rules: &RuleSet,
    well_number_rules: &RuleSet,
) -> WellIdentity {
    let api = first_valid(
        &[Strategy::Fields(API_FIELDS), Strategy::Search(api_rules)],
        view,
        "api_number",
        normalize_api,
    );

    let well_number = first_valid(
        &[
            Strategy::Fields(WELL_NUMBER_FIELDS),
            Strategy::Search(well_number_rules),
        ],
        view,
        "well_number",
        validate_well_number,
    )
    .or_else(|| well_number_from_filename(pdf_filename));

    let api_number = api.unwrap_or_else(|| fallback_key(well_number.as_deref()));

    WellIdentity {
        api_number,
        well_number,
    }
}

//! Named extraction rules and the priority-ordered lookup chains built on them.
//!
//! Rule tables are plain data: a name plus a pattern whose first capture group
//! holds the value. Table order is priority order. Chains combine field-label
//! lookups with rule searches and stop at the first candidate the caller's
//! validator accepts.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use super::fields::DocumentView;
use crate::util::collapse_whitespace;

#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub name: &'static str,
    pub pattern: &'static str,
}

const fn rule(name: &'static str, pattern: &'static str) -> RuleSpec {
    RuleSpec { name, pattern }
}

pub const API_RULES: &[RuleSpec] = &[
    rule(
        "api_number_label",
        r"(?i)API\s*[#N][O.]*\s*[:\s]+([0-9][\d\s\-]{8,19})",
    ),
    rule("api_colon", r"(?i)API\s*:\s*([0-9][\d\s\-]{8,19})"),
    rule("api_bare", r"(?i)\bAPI\b\s*([0-9][\d\-]{8,18})"),
];

pub const WELL_NUMBER_RULES: &[RuleSpec] = &[
    rule("ndic_file_number", r"(?i)NDIC\s+File\s+Number\s*:\s*(\d+)"),
    rule("nd_well_file", r"(?i)ND\s+Well\s+File\s*#\s*[:\s]+(\d+)"),
    rule("well_file_no", r"(?i)Well\s+File\s+No\.?\s*[:\s]+(\d+)"),
    rule(
        "well_or_facility_no",
        r"(?i)Well\s+or\s+Facility\s+No\.?\s*[:\s]+(\d+)",
    ),
];

pub const OPERATOR_RULES: &[RuleSpec] = &[
    rule("well_operator", r"(?i)Well\s+Operator\s*:\s*([^\n]+)"),
    rule("operator_line", r"(?im)^Operator\s*:\s*([^\n]+)"),
];

pub const COUNTY_RULES: &[RuleSpec] = &[
    rule("county_line", r"(?im)^County\s*:\s*([A-Za-z ]+?)\r?$"),
    rule(
        "county_state_pair",
        r"(?i)County,\s*State\s*:\s*([A-Za-z ]+?)\s+County",
    ),
];

pub const SHL_RULES: &[RuleSpec] = &[
    rule(
        "surface_hole_location_shl",
        r"(?i)Well\s+Surface\s+Hole\s+Location\s*\(SHL\)\s*:\s*([^\n]+)",
    ),
    rule(
        "surface_location",
        r"(?i)Surface\s+(?:Hole\s+)?Location\s*:\s*([^\n]+)",
    ),
    rule("shl", r"(?i)\bSHL\s*:\s*([^\n]+)"),
];

pub const LATITUDE_RULES: &[RuleSpec] = &[
    rule(
        "latitude_dms",
        r#"(?i)Lat(?:itude)?\s*[:\s]+(\d{1,2}\s*°\s*\d{1,2}\s*['′]\s*[\d.]+\s*(?:"|″|'')?\s*N)"#,
    ),
    rule("latitude_decimal", r"(?i)Lat(?:itude)?\s*[:\s]+(\d{1,3}\.\d+)"),
];

pub const LONGITUDE_RULES: &[RuleSpec] = &[
    rule(
        "longitude_dms",
        r#"(?i)Lon(?:gitude)?\s*[:\s]+(\d{1,3}\s*°\s*\d{1,2}\s*['′]\s*[\d.]+\s*(?:"|″|'')?\s*W)"#,
    ),
    rule(
        "longitude_decimal",
        r"(?i)Lon(?:gitude)?\s*[:\s]+(-?\d{1,3}\.\d+)",
    ),
];

pub const DATUM_RULES: &[RuleSpec] = &[
    rule("datum_label", r"(?i)Datum\s*:\s*([^\n:]{2,30})"),
    rule("datum_token", r"(?i)(NAD\s*\d+|WGS\s*\d+)"),
];

pub const API_FIELDS: &[&str] = &["API #", "API Number", "API"];
pub const WELL_NUMBER_FIELDS: &[&str] = &["NDIC File Number", "ND Well File #", "Well or Facility No"];
pub const OPERATOR_FIELDS: &[&str] = &["Well Operator", "Operator"];
pub const COUNTY_FIELDS: &[&str] = &["County"];
pub const SHL_FIELDS: &[&str] = &["Well Surface Hole Location (SHL)", "Surface Location", "SHL"];
pub const LATITUDE_FIELD: &str = "Latitude";
pub const DATUM_FIELDS: &[&str] = &["Datum"];

#[derive(Debug)]
pub struct ExtractionRule {
    pub name: &'static str,
    regex: Regex,
}

#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<ExtractionRule>,
}

impl RuleSet {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|spec| {
                Regex::new(spec.pattern)
                    .with_context(|| format!("failed to compile extraction rule {}", spec.name))
                    .map(|regex| ExtractionRule {
                        name: spec.name,
                        regex,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// First match of each rule against `text`, in rule order, whitespace
    /// collapsed. Empty captures are skipped.
    pub fn search<'s>(
        &'s self,
        text: &'s str,
    ) -> impl Iterator<Item = (&'static str, String)> + 's {
        self.rules.iter().filter_map(move |rule| {
            let captures = rule.regex.captures(text)?;
            let value = collapse_whitespace(captures.get(1)?.as_str());
            (!value.is_empty()).then_some((rule.name, value))
        })
    }
}

/// One step of a lookup chain.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'r> {
    /// Merged field map, labels in order.
    Fields(&'static [&'static str]),
    /// Each page's own field map in page order, labels in order within a page.
    PageFields(&'static [&'static str]),
    /// Rule search over the merged value of one field.
    SearchField(&'static str, &'r RuleSet),
    /// Rule search over page texts; texts outer, rules inner.
    Search(&'r RuleSet),
}

/// Walks `chain` in order and returns the first candidate `accept` maps to
/// `Some`.
pub fn first_valid<T>(
    chain: &[Strategy<'_>],
    view: &DocumentView<'_>,
    target: &'static str,
    mut accept: impl FnMut(&str) -> Option<T>,
) -> Option<T> {
    for strategy in chain {
        let found = match *strategy {
            Strategy::Fields(labels) => labels.iter().find_map(|label| {
                let value = view.field(label)?;
                accept_logged(target, label, value, &mut accept)
            }),
            Strategy::PageFields(labels) => view.pages.iter().find_map(|page| {
                labels.iter().find_map(|label| {
                    let value = page.fields.get(*label)?;
                    if value.trim().is_empty() {
                        return None;
                    }
                    accept_logged(target, label, value, &mut accept)
                })
            }),
            Strategy::SearchField(label, rules) => view.field(label).and_then(|text| {
                rules
                    .search(text)
                    .find_map(|(name, value)| accept_logged(target, name, &value, &mut accept))
            }),
            Strategy::Search(rules) => view.texts.iter().find_map(|text| {
                rules
                    .search(text)
                    .find_map(|(name, value)| accept_logged(target, name, &value, &mut accept))
            }),
        };

        if found.is_some() {
            return found;
        }
    }

    None
}

fn accept_logged<T>(
    target: &'static str,
    source: &str,
    value: &str,
    accept: &mut impl FnMut(&str) -> Option<T>,
) -> Option<T> {
    let accepted = accept(value);
    if accepted.is_none() {
        debug!(target_field = target, source, value, "candidate rejected");
    }
    accepted
}

use anyhow::{Context, Result};
use regex::Regex;

/// Jurisdiction the engine targets: state code plus plausible coordinate bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jurisdiction {
    pub state: &'static str,
    pub latitude_band: (f64, f64),
    /// West longitude band as positive degrees; stored values are negated.
    pub west_longitude_band: (f64, f64),
}

pub const NORTH_DAKOTA: Jurisdiction = Jurisdiction {
    state: "ND",
    latitude_band: (45.0, 50.0),
    west_longitude_band: (96.0, 105.0),
};

#[derive(Debug)]
pub struct CoordinateParser {
    jurisdiction: Jurisdiction,
    dms: Regex,
}

impl CoordinateParser {
    pub fn new(jurisdiction: Jurisdiction) -> Result<Self> {
        Ok(Self {
            jurisdiction,
            dms: Regex::new(
                r#"^(\d{1,3})\s*°\s*(\d{1,2})\s*['′]\s*(\d+(?:\.\d*)?)\s*(?:"|″|'')?\s*([NSEWnsew])"#,
            )
            .context("failed to compile degree-minute-second regex")?,
        })
    }

    /// Degree-minute-second with a hemisphere letter, or plain decimal degrees.
    pub fn parse(&self, raw: &str) -> Option<f64> {
        let raw = raw.trim();
        if raw.contains('°') {
            return self.dms_to_decimal(raw);
        }
        raw.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn dms_to_decimal(&self, raw: &str) -> Option<f64> {
        let caps = self.dms.captures(raw.trim())?;
        let degrees = caps[1].parse::<f64>().ok()?;
        let minutes = caps[2].parse::<f64>().ok()?;
        let seconds = caps[3].parse::<f64>().ok()?;

        let mut decimal = degrees + minutes / 60.0 + seconds / 3600.0;
        if matches!(&caps[4], "S" | "s" | "W" | "w") {
            decimal = -decimal;
        }
        Some(round_to_places(decimal, 7))
    }

    /// Out-of-band values are discarded, never clamped.
    pub fn accept_latitude(&self, value: f64) -> Option<f64> {
        let (low, high) = self.jurisdiction.latitude_band;
        (low..=high).contains(&value).then_some(value)
    }

    /// Positive in-band values are read as West longitudes printed without a
    /// sign; anything else must already be in the negated band.
    pub fn accept_longitude(&self, value: f64) -> Option<f64> {
        let (low, high) = self.jurisdiction.west_longitude_band;
        if (low..=high).contains(&value) {
            return Some(-value);
        }
        (-high..=-low).contains(&value).then_some(value)
    }

    pub fn latitude(&self, raw: &str) -> Option<f64> {
        self.parse(raw).and_then(|value| self.accept_latitude(value))
    }

    pub fn longitude(&self, raw: &str) -> Option<f64> {
        self.parse(raw).and_then(|value| self.accept_longitude(value))
    }
}

fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

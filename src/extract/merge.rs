use crate::model::WellRecord;

/// Folds a new observation of a well into the stored row.
///
/// The stored key always wins. `well_name` is replaced only by a strictly
/// longer name; every other field keeps its stored value unless that value is
/// absent.
pub fn merge_well(existing: WellRecord, incoming: WellRecord) -> WellRecord {
    WellRecord {
        api_number: existing.api_number,
        well_name: prefer_longer(existing.well_name, incoming.well_name),
        well_number: existing.well_number.or(incoming.well_number),
        operator: existing.operator.or(incoming.operator),
        county: existing.county.or(incoming.county),
        state: existing.state.or(incoming.state),
        shl_desc: existing.shl_desc.or(incoming.shl_desc),
        latitude: existing.latitude.or(incoming.latitude),
        longitude: existing.longitude.or(incoming.longitude),
        datum: existing.datum.or(incoming.datum),
        pdf_filename: existing.pdf_filename.or(incoming.pdf_filename),
    }
}

fn prefer_longer(existing: Option<String>, incoming: Option<String>) -> Option<String> {
    let existing_len = existing.as_deref().map_or(0, |name| name.chars().count());
    match incoming {
        Some(name) if name.chars().count() > existing_len => Some(name),
        _ => existing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(api_number: &str) -> WellRecord {
        WellRecord {
            api_number: api_number.to_string(),
            ..WellRecord::default()
        }
    }

    #[test]
    fn existing_operator_survives_absent_incoming_value() {
        let existing = WellRecord {
            operator: Some("Acme Oil".to_string()),
            ..well("33-053-02102")
        };
        let merged = merge_well(existing, well("33-053-02102"));
        assert_eq!(merged.operator.as_deref(), Some("Acme Oil"));
    }

    #[test]
    fn existing_values_are_never_overwritten() {
        let existing = WellRecord {
            county: Some("Mckenzie".to_string()),
            latitude: Some(47.8),
            ..well("33-053-02102")
        };
        let incoming = WellRecord {
            county: Some("Williams".to_string()),
            latitude: Some(48.1),
            longitude: Some(-103.2),
            ..well("33-053-02102")
        };
        let merged = merge_well(existing, incoming);
        assert_eq!(merged.county.as_deref(), Some("Mckenzie"));
        assert_eq!(merged.latitude, Some(47.8));
        assert_eq!(merged.longitude, Some(-103.2));
    }

    #[test]
    fn longer_well_name_replaces_shorter_one() {
        let existing = WellRecord {
            well_name: Some("WELL A".to_string()),
            ..well("NDIC-12345")
        };
        let incoming = WellRecord {
            well_name: Some("WELL A UNIT 2".to_string()),
            ..well("NDIC-12345")
        };
        let merged = merge_well(existing, incoming);
        assert_eq!(merged.well_name.as_deref(), Some("WELL A UNIT 2"));
    }

    #[test]
    fn shorter_or_equal_well_name_is_ignored() {
        let existing = WellRecord {
            well_name: Some("WELL A UNIT 2".to_string()),
            ..well("NDIC-12345")
        };
        let incoming = WellRecord {
            well_name: Some("WELL B UNIT 9".to_string()),
            ..well("NDIC-12345")
        };
        let merged = merge_well(existing, incoming);
        assert_eq!(merged.well_name.as_deref(), Some("WELL A UNIT 2"));
    }
}

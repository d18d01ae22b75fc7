use super::clean::{TextCleaners, title_case};
use super::geo::CoordinateParser;
use super::identity::{normalize_api, validate_well_number, well_number_from_filename};
use super::*;
use crate::model::SourcePage;

fn extractor() -> WellExtractor {
    WellExtractor::new(ExtractOptions::default()).expect("extractor should compile")
}

fn cleaners() -> TextCleaners {
    TextCleaners::new(CleaningOptions::default()).expect("cleaners should compile")
}

fn coordinates() -> CoordinateParser {
    CoordinateParser::new(NORTH_DAKOTA).expect("coordinate parser should compile")
}

fn page(text: &str, fields: &[(&str, &str)]) -> SourcePage {
    SourcePage {
        text: text.to_string(),
        fields: fields
            .iter()
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .collect(),
    }
}

fn document(pdf_filename: &str, pages: Vec<SourcePage>) -> SourceDocument {
    SourceDocument {
        pdf_filename: pdf_filename.to_string(),
        well_name: None,
        pages,
    }
}

#[test]
fn normalize_api_regroups_ten_and_fourteen_digits() {
    assert_eq!(normalize_api("3305302102").as_deref(), Some("33-053-02102"));
    assert_eq!(
        normalize_api("33053021020000").as_deref(),
        Some("33-053-02102-00-00")
    );
    assert_eq!(normalize_api("33 053 02102").as_deref(), Some("33-053-02102"));
}

#[test]
fn normalize_api_is_idempotent_on_canonical_forms() {
    for canonical in ["33-053-02102", "33-053-02102-00-00"] {
        assert_eq!(normalize_api(canonical).as_deref(), Some(canonical));
    }
}

#[test]
fn normalize_api_rejects_letters_and_short_values() {
    assert_eq!(normalize_api("33-053-ABC12"), None);
    assert_eq!(normalize_api("N/A"), None);
    assert_eq!(normalize_api("  "), None);
    assert_eq!(normalize_api("0"), None);
    assert_eq!(normalize_api("33-053-0"), None);
}

#[test]
fn normalize_api_keeps_other_plausible_lengths_raw() {
    assert_eq!(normalize_api("33-053-021").as_deref(), Some("33-053-021"));
    assert_eq!(
        normalize_api("33-053-021020").as_deref(),
        Some("33-053-021020")
    );
}

#[test]
fn junk_api_field_falls_back_to_file_number_key() {
    let doc = document(
        "W28654.pdf",
        vec![page("Completion report", &[("API #", "0")])],
    );
    let extracted = extractor().extract(&doc, "W28654.json");
    assert_eq!(extracted.well.api_number, "NDIC-28654");
}

#[test]
fn well_number_range_is_enforced() {
    assert_eq!(validate_well_number("12345").as_deref(), Some("12345"));
    assert_eq!(validate_well_number("File 23,456").as_deref(), Some("23456"));
    assert_eq!(validate_well_number("500"), None);
    assert_eq!(validate_well_number("1000000"), None);
    assert_eq!(validate_well_number("none"), None);
}

#[test]
fn well_number_falls_back_to_filename_digits() {
    assert_eq!(well_number_from_filename("W28654.pdf").as_deref(), Some("28654"));
    assert_eq!(well_number_from_filename("report.pdf"), None);
}

#[test]
fn identity_without_api_uses_file_number_key() {
    let doc = document("W28654.pdf", vec![page("Completion report", &[])]);
    let extracted = extractor().extract(&doc, "W28654.json");
    assert_eq!(extracted.well.api_number, "NDIC-28654");
    assert_eq!(extracted.well.well_number.as_deref(), Some("28654"));
}

#[test]
fn identity_without_any_number_is_unknown() {
    let doc = document("scan.pdf", vec![page("Completion report", &[])]);
    let extracted = extractor().extract(&doc, "scan.json");
    assert_eq!(extracted.well.api_number, UNKNOWN_KEY);
    assert_eq!(extracted.well.well_number, None);
}

#[test]
fn api_field_outranks_page_text() {
    let doc = document(
        "W1.pdf",
        vec![page(
            "API #: 33-105-01234",
            &[("API #", "33053060660000")],
        )],
    );
    let extracted = extractor().extract(&doc, "W1.json");
    assert_eq!(extracted.well.api_number, "33-053-06066-00-00");
}

#[test]
fn invalid_api_field_falls_through_to_text_search() {
    let doc = document(
        "W1.pdf",
        vec![
            page("Well File No.: 28654", &[("API", "N/A")]),
            page("API #: 33-053-06066", &[]),
            page("API #: 33-105-01234", &[]),
        ],
    );
    let extracted = extractor().extract(&doc, "W1.json");
    assert_eq!(extracted.well.api_number, "33-053-06066");
    assert_eq!(extracted.well.well_number.as_deref(), Some("28654"));
}

#[test]
fn out_of_range_file_number_is_not_used() {
    let doc = document(
        "W31000.pdf",
        vec![page("NDIC File Number: 500", &[("NDIC File Number", "9")])],
    );
    let extracted = extractor().extract(&doc, "W31000.json");
    assert_eq!(extracted.well.well_number.as_deref(), Some("31000"));
}

#[test]
fn operator_skips_junk_and_truncates_at_stop_phrase() {
    let doc = document(
        "W1.pdf",
        vec![
            page("", &[("Operator", "Rig #: 12 Nabors")]),
            page(
                "",
                &[(
                    "Well Operator",
                    "Continental Resources Inc   Telephone: 405-234-9000",
                )],
            ),
        ],
    );
    let extracted = extractor().extract(&doc, "W1.json");
    assert_eq!(
        extracted.well.operator.as_deref(),
        Some("Continental Resources Inc")
    );
}

#[test]
fn operator_column_gap_ends_the_value() {
    let cleaners = cleaners();
    assert_eq!(
        cleaners.clean_operator("Whiting Oil and Gas   Field: Sanish").as_deref(),
        Some("Whiting Oil and Gas")
    );
}

#[test]
fn operator_rejects_short_and_label_words() {
    let cleaners = cleaners();
    assert_eq!(cleaners.clean_operator("Lease"), None);
    assert_eq!(cleaners.clean_operator("County"), None);
    assert_eq!(cleaners.clean_operator("XTO"), None);
    assert_eq!(cleaners.clean_operator("Operator Name:"), None);
}

#[test]
fn operator_falls_through_to_text_search() {
    let doc = document(
        "W1.pdf",
        vec![page(
            "Operator: Whiting Oil and Gas Corporation\n",
            &[("Operator", "Well")],
        )],
    );
    let extracted = extractor().extract(&doc, "W1.json");
    assert_eq!(
        extracted.well.operator.as_deref(),
        Some("Whiting Oil and Gas Corporation")
    );
}

#[test]
fn operator_case_repair_can_be_disabled() {
    assert_eq!(
        cleaners().clean_operator("oXY USA Inc").as_deref(),
        Some("OXY USA Inc")
    );
    assert_eq!(
        cleaners().clean_operator("x Hess Bakken Investments").as_deref(),
        Some("Hess Bakken Investments")
    );

    let plain = TextCleaners::new(CleaningOptions {
        repair_operator_case: false,
    })
    .expect("cleaners should compile");
    assert_eq!(
        plain.clean_operator("oXY USA Inc").as_deref(),
        Some("oXY USA Inc")
    );
}

#[test]
fn county_is_truncated_title_cased_and_shape_checked() {
    let cleaners = cleaners();
    assert_eq!(
        cleaners.clean_county("MCKENZIE State: ND").as_deref(),
        Some("Mckenzie")
    );
    assert_eq!(
        cleaners.clean_county("golden  valley   Section 12").as_deref(),
        Some("Golden Valley")
    );
    assert_eq!(cleaners.clean_county("12345"), None);
    assert_eq!(cleaners.clean_county("Williams, ND"), None);
    assert_eq!(cleaners.clean_county("Township"), None);
}

#[test]
fn county_text_pattern_matches_whole_line() {
    let doc = document("W1.pdf", vec![page("Field: Sanish\nCounty: Mountrail\n", &[])]);
    let extracted = extractor().extract(&doc, "W1.json");
    assert_eq!(extracted.well.county.as_deref(), Some("Mountrail"));
}

#[test]
fn title_case_lowercases_inner_letters() {
    assert_eq!(title_case("BURKE county"), "Burke County");
}

#[test]
fn well_name_strips_trailing_metadata() {
    let cleaners = cleaners();
    assert_eq!(
        cleaners
            .clean_well_name("Atlantis Federal 1-2H   API: 33-053-03413")
            .as_deref(),
        Some("Atlantis Federal 1-2H")
    );
    assert_eq!(
        cleaners
            .clean_well_name("BANKS 2-1H Well File No.: 20000")
            .as_deref(),
        Some("BANKS 2-1H")
    );
    assert_eq!(
        cleaners
            .clean_well_name("Lucy 1-11H Company Man: J. Smith")
            .as_deref(),
        Some("Lucy 1-11H")
    );
}

#[test]
fn well_name_label_residue_is_cleared() {
    let cleaners = cleaners();
    assert_eq!(cleaners.clean_well_name("Location:"), None);
    assert_eq!(cleaners.clean_well_name("Mud Record"), None);
    assert_eq!(cleaners.clean_well_name("Field / Prospect"), None);
    assert_eq!(cleaners.clean_well_name("   "), None);
}

#[test]
fn datum_maps_names_and_rejects_measurements() {
    let cleaners = cleaners();
    assert_eq!(
        cleaners.clean_datum("North American Datum 1983").as_deref(),
        Some("NAD83")
    );
    assert_eq!(
        cleaners.clean_datum("North  American Datum 1927 (US)").as_deref(),
        Some("NAD27")
    );
    assert_eq!(cleaners.clean_datum("NAO83").as_deref(), Some("NAD83"));
    assert_eq!(cleaners.clean_datum("NAD 27 (CONUS)").as_deref(), Some("NAD 27"));
    assert_eq!(cleaners.clean_datum("GRS 80").as_deref(), Some("GRS 80"));
    assert_eq!(cleaners.clean_datum("2150 ft KB @ WELL"), None);
    assert_eq!(cleaners.clean_datum("Sea Level"), None);
}

#[test]
fn dms_converts_to_signed_decimal_degrees() {
    let parser = coordinates();
    assert_eq!(parser.dms_to_decimal("47° 30' 0\" N"), Some(47.5));
    assert_eq!(parser.dms_to_decimal("101° 15' 0\" W"), Some(-101.25));
    assert_eq!(parser.dms_to_decimal("47 degrees"), None);
}

#[test]
fn dms_accepts_seconds_with_trailing_point() {
    let parser = coordinates();
    assert_eq!(parser.dms_to_decimal("47° 30' 36. N"), Some(47.51));
    assert_eq!(parser.latitude("47° 30' 36. N"), Some(47.51));
}

#[test]
fn longitude_sign_is_corrected_and_bands_enforced() {
    let parser = coordinates();
    assert_eq!(parser.accept_longitude(101.5), Some(-101.5));
    assert_eq!(parser.accept_longitude(-103.0), Some(-103.0));
    assert_eq!(parser.accept_longitude(47.0), None);
    assert_eq!(parser.accept_latitude(48.2), Some(48.2));
    assert_eq!(parser.accept_latitude(51.0), None);
    assert_eq!(parser.latitude("not a number"), None);
}

#[test]
fn out_of_band_latitude_is_left_absent() {
    let doc = document("W1.pdf", vec![page("Latitude: 38.5512\nLongitude: 47.0", &[])]);
    let extracted = extractor().extract(&doc, "W1.json");
    assert_eq!(extracted.well.latitude, None);
    assert_eq!(extracted.well.longitude, None);
}

#[test]
fn full_document_extracts_well_and_stimulation() {
    let raw = r#"{
      "pdf_filename": "W20197.pdf",
      "well_name": "Atlantis Federal 1-2H   Well File No.: 20197",
      "pages": [
        {
          "text": "NDIC File Number: 20197\nWell Operator: Oasis Petroleum North America LLC    Telephone: 281-404-9500\nLatitude: 47° 58' 12.00\" N   Longitude: 103° 22' 48.00\" W\nDatum: North American Datum 1983\n",
          "fields": {"API #": "33-053-03413", "County": "MCKENZIE State: ND", "Junk": null}
        },
        {
          "text": "Date Stimulated   Stimulated Formation   Top (Ft)   Bottom (Ft)   Stages   Volume   Units\n05/14/2014   Bakken   10912   20415   36   123,456   Barrels\nType Treatment   Acid %   Lbs Proppant   Max Pressure   Max Rate\nSand Frac   3256000   8950   35.5\nDetails\n100 Mesh: 250000\n40/70 White: 3006000\n",
          "fields": {"Surface Location": "250 FNL   1200 FWL"}
        }
      ]
    }"#;

    let doc: SourceDocument = serde_json::from_str(raw).expect("document should deserialize");
    let extracted = extractor().extract(&doc, "W20197.json");
    let well = &extracted.well;

    assert_eq!(well.api_number, "33-053-03413");
    assert_eq!(well.well_number.as_deref(), Some("20197"));
    assert_eq!(well.well_name.as_deref(), Some("Atlantis Federal 1-2H"));
    assert_eq!(
        well.operator.as_deref(),
        Some("Oasis Petroleum North America LLC")
    );
    assert_eq!(well.county.as_deref(), Some("Mckenzie"));
    assert_eq!(well.state.as_deref(), Some("ND"));
    assert_eq!(well.shl_desc.as_deref(), Some("250 FNL 1200 FWL"));
    assert_eq!(well.datum.as_deref(), Some("NAD83"));
    assert_eq!(well.pdf_filename.as_deref(), Some("W20197.pdf"));

    let latitude = well.latitude.expect("latitude should parse");
    let longitude = well.longitude.expect("longitude should parse");
    assert!((latitude - 47.97).abs() < 1e-9);
    assert!((longitude + 103.38).abs() < 1e-9);

    assert_eq!(extracted.stimulations.len(), 1);
    let stimulation = &extracted.stimulations[0];
    assert_eq!(stimulation.formation.as_deref(), Some("Bakken"));
    assert_eq!(stimulation.acid_percent, None);
    assert_eq!(stimulation.lbs_proppant, Some(3_256_000.0));
    assert_eq!(
        stimulation.details.as_deref(),
        Some("100 Mesh: 250000\n40/70 White: 3006000")
    );
}

#[test]
fn numeric_field_values_are_read_as_text() {
    let raw = r#"{"pdf_filename": "scan.pdf", "pages": [{"text": null, "fields": {"NDIC File Number": 23456}}]}"#;
    let doc: SourceDocument = serde_json::from_str(raw).expect("document should deserialize");
    let extracted = extractor().extract(&doc, "scan.json");
    assert_eq!(extracted.well.api_number, "NDIC-23456");
}

#[test]
fn null_top_level_values_decode_as_empty() {
    let raw = r#"{"pdf_filename": null, "well_name": null, "pages": [{"text": "Well File No.: 28654", "fields": null}]}"#;
    let doc: SourceDocument = serde_json::from_str(raw).expect("document should deserialize");
    assert!(doc.pdf_filename.is_empty());
    let extracted = extractor().extract(&doc, "W28654.json");
    assert_eq!(extracted.well.pdf_filename.as_deref(), Some("W28654.json"));
    assert_eq!(extracted.well.api_number, "NDIC-28654");

    let doc: SourceDocument =
        serde_json::from_str(r#"{"pdf_filename": "W1.pdf", "pages": null}"#)
            .expect("null pages should deserialize");
    assert!(doc.pages.is_empty());
}

#[test]
fn missing_pdf_filename_uses_source_name() {
    let doc = SourceDocument::default();
    let extracted = extractor().extract(&doc, "W15500.json");
    assert_eq!(extracted.well.pdf_filename.as_deref(), Some("W15500.json"));
    assert_eq!(extracted.well.api_number, "NDIC-15500");
    assert!(extracted.stimulations.is_empty());
}

#[test]
fn later_page_fields_override_earlier_ones() {
    let pages = vec![
        page("first", &[("County", "Dunn")]),
        page("  ", &[("County", "Stark")]),
    ];
    let view = DocumentView::merge(&pages);
    assert_eq!(view.field("County"), Some("Stark"));
    assert_eq!(view.texts, vec!["first"]);
}

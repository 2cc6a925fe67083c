use super::*;

// -----------------------------------------------------------------------
// parse_container
// -----------------------------------------------------------------------

#[test]
fn four_segments_map_to_city_region_postal() {
    let fields = parse_container("V1;Addison Ave|Niagara Falls|ON|L2J;43.128025;-79.091698");
    assert_eq!(
        fields,
        ContainerFields {
            street: Some("Addison Ave".to_owned()),
            city: "Niagara Falls".to_owned(),
            state: "ON".to_owned(),
            zip: "L2J".to_owned(),
        }
    );
}

#[test]
fn three_segments_with_numeric_second_part_is_postal_then_city() {
    let fields = parse_container("V1;5th Ave|10001|New York");
    assert_eq!(fields.street.as_deref(), Some("5th Ave"));
    assert_eq!(fields.zip, "10001");
    assert_eq!(fields.city, "New York");
    assert_eq!(fields.state, "");
}

#[test]
fn three_segments_with_alphabetic_second_part_is_city_then_region() {
    let fields = parse_container("V1;Broadway|Manhattan|NY;40.7128;-74.0060");
    assert_eq!(fields.city, "Manhattan");
    assert_eq!(fields.state, "NY");
    assert_eq!(fields.zip, "");
}

#[test]
fn short_alphabetic_district_is_never_a_postal_code() {
    let fields = parse_container("V1;High St|Soho|London");
    assert_eq!(fields.city, "Soho");
    assert_eq!(fields.state, "London");
    assert_eq!(fields.zip, "");
}

#[test]
fn alphanumeric_postcode_with_space_is_postal() {
    let fields = parse_container("V1;Downing St|SW1A 2AA|London;51.5;-0.12");
    assert_eq!(fields.zip, "SW1A 2AA");
    assert_eq!(fields.city, "London");
}

#[test]
fn digits_longer_than_ten_characters_are_a_place() {
    let fields = parse_container("V1;Main St|Block 12345678|Springfield");
    assert_eq!(fields.city, "Block 12345678");
    assert_eq!(fields.state, "Springfield");
    assert_eq!(fields.zip, "");
}

#[test]
fn ten_character_boundary_is_inclusive() {
    assert!(looks_like_postal_code("1234567890"));
    assert!(!looks_like_postal_code("12345678901"));
    assert!(!looks_like_postal_code("Manhattan"));
    assert!(!looks_like_postal_code(""));
}

#[test]
fn head_without_version_marker_leaves_street_unset() {
    let fields = parse_container("Addison Ave|Niagara Falls|ON|L2J");
    assert!(fields.street.is_none());
    assert_eq!(fields.city, "Niagara Falls");
}

#[test]
fn two_segments_extract_nothing() {
    assert_eq!(parse_container("V1;Foo|Bar"), ContainerFields::default());
}

#[test]
fn five_segments_extract_nothing() {
    assert_eq!(
        parse_container("V1;A|B|C|D|E"),
        ContainerFields::default()
    );
}

// -----------------------------------------------------------------------
// normalize
// -----------------------------------------------------------------------

#[test]
fn normalize_four_part_canadian_address() {
    let raw = RawProviderResult::new(
        "Addison Ave",
        "Niagara Falls",
        Some("V1;Addison Ave|Niagara Falls|ON|L2J"),
        "CA",
    );
    assert_eq!(
        normalize(&raw),
        NormalizedAddress {
            address: "Addison Ave".to_owned(),
            city: "Niagara Falls".to_owned(),
            state: "ON".to_owned(),
            zip: "L2J".to_owned(),
            country: "CA".to_owned(),
            full_text: "Addison Ave, Niagara Falls".to_owned(),
        }
    );
}

#[test]
fn container_street_overrides_primary_text() {
    let raw = RawProviderResult::new(
        "5th Avenue",
        "New York, NY",
        Some("V1;5th Ave|10001|New York"),
        "US",
    );
    let address = normalize(&raw);
    assert_eq!(address.address, "5th Ave");
    assert_eq!(address.zip, "10001");
    assert_eq!(address.city, "New York");
}

#[test]
fn unrecognized_container_keeps_primary_street_only() {
    let raw = RawProviderResult::new("Main St", "Springfield", Some("V1;Other St|X"), "US");
    let address = normalize(&raw);
    assert_eq!(address.address, "Main St");
    assert_eq!(address.city, "Springfield");
    assert_eq!(address.state, "");
    assert_eq!(address.zip, "");
}

#[test]
fn missing_container_falls_back_to_secondary_for_city() {
    let raw = RawProviderResult::new("Main St", "Springfield", None, "US");
    let address = normalize(&raw);
    assert_eq!(address.address, "Main St");
    assert_eq!(address.city, "Springfield");
}

#[test]
fn empty_container_is_treated_as_absent() {
    let raw = RawProviderResult::new("Main St", "Springfield", Some(""), "US");
    assert_eq!(normalize(&raw).city, "Springfield");
}

#[test]
fn empty_city_segment_falls_back_to_secondary() {
    let raw = RawProviderResult::new("Main St", "Springfield", Some("V1;Main St||IL|62701"), "US");
    let address = normalize(&raw);
    assert_eq!(address.city, "Springfield");
    assert_eq!(address.state, "IL");
}

#[test]
fn country_code_is_copied_verbatim() {
    let raw = RawProviderResult::new("Main St", "Springfield", None, "us");
    assert_eq!(normalize(&raw).country, "us");
}

#[test]
fn full_text_drops_dangling_comma_when_secondary_is_empty() {
    let raw = RawProviderResult::new("Main St", "", None, "US");
    assert_eq!(normalize(&raw).full_text, "Main St");
}

#[test]
fn full_text_is_empty_only_when_both_texts_are_empty() {
    let fixtures = [
        RawProviderResult::default(),
        RawProviderResult::new("", "", Some("V1;A|B|C|D"), ""),
        RawProviderResult::new("Main St", "", None, ""),
        RawProviderResult::new("", "Springfield", None, ""),
        RawProviderResult::new("Main St", "Springfield", Some("|||"), "US"),
        RawProviderResult::new("Main St", "Springfield", Some(";;;"), "US"),
        RawProviderResult::new("Main St", "Springfield", Some("V1;|;|;"), "US"),
    ];

    for raw in &fixtures {
        let address = normalize(raw);
        let both_empty = raw.primary_text().is_empty() && raw.secondary_text().is_empty();
        assert_eq!(
            address.full_text.is_empty(),
            both_empty,
            "unexpected fullText {:?} for {raw:?}",
            address.full_text
        );
    }
}

#[test]
fn normalize_handles_fully_empty_result() {
    let address = normalize(&RawProviderResult::default());
    assert_eq!(address, NormalizedAddress::default());
}

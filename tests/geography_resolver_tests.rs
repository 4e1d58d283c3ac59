use indexmap::IndexMap;
use market_chart::core::{
    DataRecord, GeographyDimension, GeographyLevel, GeographyMatch, GeographyResolver,
};

fn india_dimension() -> GeographyDimension {
    let mut countries = IndexMap::new();
    countries.insert(
        "West India".to_owned(),
        vec!["Maharashtra".to_owned(), "Gujarat".to_owned()],
    );
    GeographyDimension {
        global: Some("India".to_owned()),
        regions: vec![
            "North India".to_owned(),
            "South India".to_owned(),
            "West India".to_owned(),
        ],
        countries,
    }
}

fn selection(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[test]
fn is_match_accepts_equal_prefix_suffix_and_substring_variants() {
    let resolver = GeographyResolver::new(india_dimension());

    assert!(resolver.is_match("Maharashtra", &selection(&["Maharashtra"])));
    assert!(resolver.is_match("West India (5 states)", &selection(&["West India"])));
    assert!(resolver.is_match("West India", &selection(&["West India (5 states)"])));
    assert!(resolver.is_match("North India", &selection(&["India"])));
    assert!(!resolver.is_match("Kerala", &selection(&["Karnataka", "Goa"])));
    assert!(!resolver.is_match("Kerala", &[]));
}

#[test]
fn match_kind_reports_the_first_rule_that_fired() {
    let resolver = GeographyResolver::new(india_dimension());

    assert_eq!(
        resolver.match_kind("maharashtra", "Maharashtra"),
        Some(GeographyMatch::Exact)
    );
    assert_eq!(
        resolver.match_kind("West India (5 states)", "West India"),
        Some(GeographyMatch::Prefix)
    );
    assert_eq!(
        resolver.match_kind("India", "Greater India"),
        Some(GeographyMatch::Suffix)
    );
    assert_eq!(
        resolver.match_kind("North India", "India"),
        Some(GeographyMatch::Contains)
    );
}

#[test]
fn resolve_key_prefers_exact_then_declared_order() {
    let resolver = GeographyResolver::new(india_dimension());
    let selected = selection(&["India", "North India"]);

    assert_eq!(resolver.resolve_key("North India", &selected), Some("North India"));
    assert_eq!(resolver.resolve_key("South India", &selected), Some("India"));
    assert_eq!(resolver.resolve_key("Kerala", &selected), None);
}

#[test]
fn global_entry_is_the_default_rollup_parent() {
    let resolver = GeographyResolver::new(india_dimension());

    assert!(resolver.is_rollup_parent("India"));
    assert!(resolver.is_rollup_parent(" india "));
    assert!(!resolver.is_rollup_parent("West India"));

    let configured = GeographyResolver::new(india_dimension()).with_rollup_parents(["West India"]);
    assert!(configured.is_rollup_parent("West India"));
    assert!(!configured.is_rollup_parent("India"));
}

#[test]
fn children_come_from_record_parent_or_dimension_layout() {
    let resolver = GeographyResolver::new(india_dimension());

    let by_parent = DataRecord::new("Ladakh", "By Application", "B2B > Food")
        .with_geography_level(GeographyLevel::Region)
        .with_parent_geography("India");
    let by_layout = DataRecord::new("South India", "By Application", "B2B > Food")
        .with_geography_level(GeographyLevel::Region);
    let state = DataRecord::new("Gujarat", "By Application", "B2B > Food");

    assert!(resolver.is_child_of("India", &by_parent));
    assert!(resolver.is_child_of("India", &by_layout));
    assert!(resolver.is_child_of("West India", &state));
    assert!(!resolver.is_child_of("India", &state));
}

#[test]
fn rollup_parent_for_skips_the_parent_itself() {
    let resolver = GeographyResolver::new(india_dimension());
    let selected = selection(&["India"]);

    let north = DataRecord::new("North India", "By Application", "B2B > Food")
        .with_parent_geography("India");
    let india = DataRecord::new("India", "By Application", "B2B > Food")
        .with_geography_level(GeographyLevel::Global);

    assert_eq!(resolver.rollup_parent_for(&north, &selected), Some("India"));
    assert_eq!(resolver.rollup_parent_for(&india, &selected), None);
}

#[test]
fn dimension_is_derived_from_record_levels() {
    let records = vec![
        DataRecord::new("India", "T", "A").with_geography_level(GeographyLevel::Global),
        DataRecord::new("West India", "T", "A").with_geography_level(GeographyLevel::Region),
        DataRecord::new("Maharashtra", "T", "A").with_parent_geography("West India"),
        DataRecord::new("Gujarat", "T", "A").with_parent_geography("West India"),
        DataRecord::new("Kerala", "T", "A").with_parent_geography("South India"),
    ];

    let dimension = GeographyDimension::from_records(&records);
    assert_eq!(dimension.global.as_deref(), Some("India"));
    assert_eq!(dimension.regions, vec!["West India", "South India"]);
    assert_eq!(
        dimension.children_of("West India"),
        ["Maharashtra".to_owned(), "Gujarat".to_owned()].as_slice()
    );
    assert_eq!(dimension.region_of("kerala"), Some("South India"));
    assert_eq!(dimension.children_of("India").len(), 2);
}

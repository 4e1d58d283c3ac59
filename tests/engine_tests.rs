use market_chart::api::{
    DatasetMetadata, PROJECTION_JSON_SCHEMA_V1, ProjectionContractV1, ProjectionRequest,
};
use market_chart::core::{
    BarLayout, DataRecord, DataType, FilterState, ViewMode, WaterfallKind, YearRange,
};
use market_chart::{ChartProjection, Dataset, EngineConfig, MarketEngine, MarketError, OutputShape};

const ENVELOPE: &str = r#"{
  "metadata": {
    "currency": "USD",
    "value_unit": "Million",
    "volume_unit": "Units",
    "start_year": 2024,
    "base_year": 2024,
    "forecast_year": 2026,
    "years": [2024, 2025, 2026]
  },
  "dimensions": {
    "geographies": {
      "global": "India",
      "regions": ["North India", "South India"]
    },
    "segments": {
      "By Application": {
        "type": "hierarchical",
        "items": ["B2B > Food", "B2B > Beverages"],
        "hierarchy": {}
      }
    }
  },
  "data": {
    "value": {
      "records": [
        {
          "geography": " North India ",
          "geography_level": "region",
          "parent_geography": "India",
          "segment_type": "By Application",
          "segment": "B2B > Food",
          "time_series": { "2024": 30.0, "2025": 40.0, "2026": 50.0 },
          "cagr": 29.1
        },
        {
          "geography": "South India",
          "geography_level": "region",
          "parent_geography": "India",
          "segment_type": "By Application",
          "segment": "B2B > Beverages",
          "time_series": { "2024": 20.0, "2025": 35.0, "2026": 50.0 }
        },
        {
          "geography": "",
          "geography_level": "region",
          "segment_type": "By Application",
          "segment": "B2B > Food",
          "time_series": { "2024": 1.0 }
        }
      ]
    },
    "volume": {
      "records": [
        {
          "geography": "North India",
          "geography_level": "region",
          "parent_geography": "India",
          "segment_type": "By Application",
          "segment": "B2B > Food",
          "time_series": { "2024": 3.0, "2026": 4.0 }
        }
      ]
    }
  }
}"#;

fn engine() -> MarketEngine {
    MarketEngine::from_json_str(ENVELOPE, EngineConfig::default()).expect("engine from envelope")
}

fn india_state() -> FilterState {
    FilterState::new("By Application", YearRange::new(2024, 2026))
        .with_view_mode(ViewMode::GeographyMode)
        .with_geographies(["India"])
        .with_segments(["B2B > Food", "B2B > Beverages"])
}

#[test]
fn envelope_loads_and_canonicalizes_records() {
    let engine = engine();
    let dataset = engine.dataset();

    assert_eq!(dataset.records(DataType::Value).len(), 2);
    assert_eq!(dataset.records(DataType::Volume).len(), 1);
    assert_eq!(dataset.records(DataType::Value)[0].geography, "North India");
    assert_eq!(dataset.segment_types(DataType::Value), vec!["By Application"]);
    assert_eq!(
        dataset.geographies(DataType::Value),
        vec!["North India", "South India"]
    );
    assert_eq!(engine.base_year(), 2024);
    assert_eq!(engine.forecast_year(), 2026);
}

#[test]
fn default_state_spans_the_dataset() {
    let state = engine().default_filter_state();
    assert_eq!(state.segment_type, "By Application");
    assert_eq!(state.year_range, YearRange::new(2024, 2026));
    assert!(state.geographies.is_empty());
}

#[test]
fn invalid_metadata_is_rejected() {
    let metadata = DatasetMetadata::new(2024, 2030, 2026);
    let err = Dataset::from_records(metadata, Vec::new()).expect_err("base after forecast");
    assert!(matches!(err, MarketError::InvalidData(_)));

    let mut gapped = DatasetMetadata::new(2024, 2024, 2026);
    gapped.years = vec![2024, 2026];
    assert!(Dataset::from_records(gapped, Vec::new()).is_err());

    assert!(MarketEngine::from_json_str("{ not json", EngineConfig::default()).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let dataset = Dataset::from_records(DatasetMetadata::new(2024, 2024, 2026), Vec::new())
        .expect("empty dataset");

    let err = MarketEngine::new(dataset.clone(), EngineConfig::default().with_segment_separator("  "))
        .expect_err("blank separator");
    assert!(matches!(err, MarketError::InvalidConfig(_)));

    assert!(
        MarketEngine::new(
            dataset.clone(),
            EngineConfig::default().with_reference_years(2026, 2024)
        )
        .is_err()
    );

    let mut late_base = EngineConfig::default();
    late_base.base_year = Some(2040);
    let err = MarketEngine::new(dataset.clone(), late_base).expect_err("base after metadata forecast");
    assert!(matches!(err, MarketError::InvalidConfig(_)));

    let err = MarketEngine::new(
        dataset.clone(),
        EngineConfig::default().with_reference_years(2024, 2030),
    )
    .expect_err("forecast outside dataset years");
    assert!(matches!(err, MarketError::InvalidConfig(_)));

    let engine = MarketEngine::new(dataset, EngineConfig::default().with_reference_years(2025, 2026))
        .expect("overrides inside dataset years");
    assert_eq!(engine.base_year(), 2025);
}

fn west_india_engine() -> MarketEngine {
    let records = vec![
        DataRecord::new("West India", "By Application", "B2B > Food")
            .with_series([(2024, 100.0), (2032, 200.0)]),
        DataRecord::new("West India", "By Application", "B2B > Beverages")
            .with_series([(2024, 300.0), (2032, 400.0)]),
    ];
    let dataset = Dataset::from_records(DatasetMetadata::new(2024, 2024, 2032), records)
        .expect("dataset");
    MarketEngine::new(dataset, EngineConfig::default()).expect("engine")
}

#[test]
fn market_share_is_measured_against_the_unselected_market() {
    let engine = west_india_engine();
    let state = FilterState::new("By Application", YearRange::new(2024, 2032))
        .with_geographies(["West India"])
        .with_segments(["B2B > Food"]);

    let rows = engine.opportunity_matrix(&state);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].segment, "B2B > Food");
    assert!((rows[0].market_share - 25.0).abs() < 1e-9);
    assert!((rows[0].market_share_index - 100.0).abs() < 1e-9);
}

#[test]
fn opportunity_matrix_accepts_display_variant_geographies() {
    let engine = west_india_engine();
    let state = FilterState::new("By Application", YearRange::new(2024, 2032))
        .with_geographies(["West India (5 states)"]);

    assert_eq!(engine.filter(&state).len(), 2);
    let rows = engine.opportunity_matrix(&state);
    assert_eq!(rows.len(), 2);
    let share_sum: f64 = rows.iter().map(|row| row.market_share).sum();
    assert!((share_sum - 100.0).abs() < 1e-9);
}

#[test]
fn geography_rollup_reaches_the_bar_projection() {
    let engine = engine();
    let state = india_state();

    let ChartProjection::Bar(bar) = engine.project(&state, OutputShape::bar_for(&state)) else {
        panic!("expected bar projection");
    };
    assert_eq!(bar.layout, BarLayout::Simple);
    assert_eq!(bar.series_keys, vec!["India", "North India", "South India"]);
    assert_eq!(bar.rows[2].values.get("India"), Some(&100.0));
}

#[test]
fn volume_state_reads_volume_records() {
    let engine = engine();
    let state = FilterState::new("By Application", YearRange::new(2024, 2026))
        .with_data_type(DataType::Volume)
        .with_view_mode(ViewMode::GeographyMode);

    let table = engine.aggregate(&state);
    assert_eq!(table.value("North India", 2025), Some(0.0));
    assert_eq!(table.value("North India", 2026), Some(4.0));

    let labels = engine.labels(&state);
    assert_eq!(labels.value_axis_title, "Market Volume (Units)");
    assert_eq!(labels.currency, None);
}

#[test]
fn labels_follow_metadata_units() {
    let labels = engine().labels(&india_state());
    assert_eq!(labels.value_axis_title, "Market Value (USD Million)");
    assert_eq!(labels.unit_label, "USD Million");
    assert_eq!(labels.currency.as_deref(), Some("USD"));
    assert_eq!(labels.year_span, "2024-2026");
}

#[test]
fn every_shape_projects_for_the_same_state() {
    let engine = engine();
    let state = india_state();

    for shape in [
        OutputShape::Bar(BarLayout::Simple),
        OutputShape::Bar(BarLayout::Stacked),
        OutputShape::Line,
        OutputShape::Heatmap,
        OutputShape::Table,
        OutputShape::Waterfall,
        OutputShape::Bubble,
    ] {
        let projection = engine.project(&state, shape);
        assert!(!projection.is_empty(), "{} should not be empty", shape.name());
    }
}

#[test]
fn opportunity_matrix_defaults_to_the_global_geography() {
    let engine = engine();
    let state = FilterState::new("By Application", YearRange::new(2024, 2026));

    assert_eq!(engine.opportunity_geography(&state).as_deref(), Some("India"));
    let rows = engine.opportunity_matrix(&state);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].segment, "B2B > Beverages");
    assert!((rows[0].opportunity_index - 100.0).abs() < 1e-9);
}

#[test]
fn cached_projection_counts_hits_and_misses() {
    let mut engine = engine();
    let state = india_state();

    let first = engine.project_cached(&state, OutputShape::Waterfall);
    let second = engine.project_cached(&state, OutputShape::Waterfall);
    assert_eq!(first, second);

    let stats = engine.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 1);

    engine.clear_cache();
    assert_eq!(engine.cache_stats().size, 0);
}

#[test]
fn disabled_cache_never_stores() {
    let mut engine = MarketEngine::from_json_str(ENVELOPE, EngineConfig::default().with_cache_capacity(0))
        .expect("engine");
    let state = india_state();

    let _ = engine.project_cached(&state, OutputShape::Line);
    let _ = engine.project_cached(&state, OutputShape::Line);
    let stats = engine.cache_stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.size, 0);
}

#[test]
fn batch_results_keep_request_order() {
    let engine = engine();
    let state = india_state();
    let requests = vec![
        ProjectionRequest::new(state.clone(), OutputShape::Table),
        ProjectionRequest::new(state.clone(), OutputShape::Waterfall),
        ProjectionRequest::new(state.clone(), OutputShape::Heatmap),
    ];

    let results = engine.project_batch(&requests);
    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], ChartProjection::Table(_)));
    assert!(matches!(results[1], ChartProjection::Waterfall(_)));
    assert!(matches!(results[2], ChartProjection::Heatmap(_)));
    assert_eq!(results[1], engine.project(&state, OutputShape::Waterfall));
}

#[test]
fn json_contract_round_trips_a_waterfall() {
    let engine = engine();
    let state = india_state();

    let json = engine
        .projection_json_contract_v1_pretty(&state, OutputShape::Waterfall)
        .expect("serialize contract");
    let payload = ProjectionContractV1::from_json_str(&json).expect("parse contract");

    assert_eq!(payload.schema_version, PROJECTION_JSON_SCHEMA_V1);
    assert_eq!(payload.labels.year_span, "2024-2026");
    let ChartProjection::Waterfall(steps) = payload.projection else {
        panic!("expected waterfall payload");
    };
    assert_eq!(steps.first().map(|step| step.kind), Some(WaterfallKind::Start));
    assert_eq!(steps.last().map(|step| step.name.as_str()), Some("2026 Total"));
    assert_eq!(steps.len(), 4);
}

#[test]
fn json_contract_rejects_unknown_schema_version() {
    let engine = engine();
    let json = engine
        .projection_json_contract_v1_pretty(&india_state(), OutputShape::Table)
        .expect("serialize contract")
        .replace("\"schema_version\": 1", "\"schema_version\": 9");

    let err = ProjectionContractV1::from_json_str(&json).expect_err("version 9 rejected");
    assert!(matches!(err, MarketError::InvalidData(_)));
}

#[test]
fn filter_state_round_trips_through_camel_case_json() {
    let input = r#"{
      "geographies": ["India"],
      "segments": ["B2B > Food"],
      "segmentType": "By Application",
      "yearRange": { "start": 2024, "end": 2026 },
      "dataType": "volume",
      "viewMode": "geography-mode",
      "businessType": "B2B"
    }"#;

    let state = FilterState::from_json_str(input).expect("parse state");
    assert_eq!(state.view_mode, ViewMode::GeographyMode);
    assert_eq!(state.data_type, DataType::Volume);
    let back = FilterState::from_json_str(&state.to_json_pretty().expect("serialize state"))
        .expect("reparse state");
    assert_eq!(back, state);
}

#[test]
fn engine_config_json_fills_defaults() {
    let config = EngineConfig::from_json_str(r#"{ "cache_capacity": 8 }"#).expect("parse config");
    assert_eq!(config.cache_capacity, 8);
    assert_eq!(config.segment_separator, " > ");
    assert_eq!(config.series_key_separator, "::");
    assert!(config.opportunity.validate().is_ok());

    let round_trip =
        EngineConfig::from_json_str(&config.to_json_pretty().expect("serialize config"))
            .expect("reparse config");
    assert_eq!(round_trip, config);
}

#[test]
fn in_memory_records_build_an_engine() {
    let records = vec![
        DataRecord::new("Goa", "By Application", "B2C > Retail").with_series([(2024, 1.0), (2026, 3.0)]),
    ];
    let dataset = Dataset::from_records(DatasetMetadata::new(2024, 2024, 2026), records)
        .expect("dataset");
    let engine = MarketEngine::new(dataset, EngineConfig::default()).expect("engine");

    let state = engine.default_filter_state();
    let table = engine.aggregate(&state);
    assert_eq!(table.value("B2C > Retail", 2026), Some(3.0));
    assert_eq!(engine.filter(&state).len(), 1);
}

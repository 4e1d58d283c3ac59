mod dataset;
mod engine;
mod engine_config;
mod json_contract;
mod labels;
mod output_shape;
mod projection_cache;
mod projection_controller;
mod query_controller;
mod validation;

pub use dataset::{DataSection, Dataset, DatasetEnvelope, DatasetMetadata, RecordSet};
pub use engine::MarketEngine;
pub use engine_config::EngineConfig;
pub use json_contract::{PROJECTION_JSON_SCHEMA_V1, ProjectionContractV1};
pub use labels::{ChartLabels, chart_labels, unit_label};
pub use output_shape::{ChartProjection, OutputShape};
pub use projection_cache::{ProjectionCacheStats, ProjectionRequest};

//! market-chart-rs: hierarchical market-data aggregation and chart projection.
//!
//! Turns flat (geography × segment × year) records into the literal
//! structures bar, stacked-bar, line, heatmap, table, waterfall and bubble
//! charts consume. Rendering stays with the host; everything here is a
//! pure function of the dataset, a [`core::FilterState`] and the session
//! context.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ChartProjection, Dataset, EngineConfig, MarketEngine, OutputShape};
pub use error::{MarketError, MarketResult};

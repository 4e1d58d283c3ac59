use crate::core::{
    DataType, FilterState, GeographyDimension, GeographyResolver, QueryContext, SegmentMatcher,
    SegmentTree, Year,
};
use crate::error::MarketResult;

use super::labels::chart_labels;
use super::projection_cache::{ProjectionCache, ProjectionCacheStats};
use super::validation::{validate_engine_config, validate_reference_years};
use super::{ChartLabels, Dataset, DatasetMetadata, EngineConfig};

/// Session facade consumed by host applications.
///
/// Owns the immutable dataset, the resolvers built from it and a
/// per-session projection cache. Sessions share nothing, so independent
/// engines can serve concurrent requests.
#[derive(Debug)]
pub struct MarketEngine {
    pub(super) dataset: Dataset,
    pub(super) config: EngineConfig,
    pub(super) context: QueryContext,
    pub(super) cache: ProjectionCache,
}

impl MarketEngine {
    pub fn new(dataset: Dataset, config: EngineConfig) -> MarketResult<Self> {
        validate_engine_config(&config)?;
        let metadata = dataset.metadata();
        validate_reference_years(
            metadata,
            config.base_year.unwrap_or(metadata.base_year),
            config.forecast_year.unwrap_or(metadata.forecast_year),
        )?;

        let dimension = dataset
            .dimensions()
            .geographies
            .clone()
            .unwrap_or_else(|| GeographyDimension::from_records(dataset.all_records()));
        let resolver =
            GeographyResolver::new(dimension).with_rollup_parents(&config.rollup_geographies);
        let tree = SegmentTree::from_paths(
            config.segment_separator.as_str(),
            dataset.all_records().map(|record| record.segment.as_str()),
        );
        let context = QueryContext::new(resolver, SegmentMatcher::new(tree))
            .with_segment_dimensions(dataset.dimensions().segments.clone())
            .with_series_key_separator(config.series_key_separator.clone());
        let cache = ProjectionCache::new(config.cache_capacity);

        Ok(Self {
            dataset,
            config,
            context,
            cache,
        })
    }

    /// Parses an envelope and builds an engine with `config`.
    pub fn from_json_str(input: &str, config: EngineConfig) -> MarketResult<Self> {
        Self::new(Dataset::from_json_str(input)?, config)
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn metadata(&self) -> &DatasetMetadata {
        self.dataset.metadata()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    #[must_use]
    pub fn base_year(&self) -> Year {
        self.config.base_year.unwrap_or(self.metadata().base_year)
    }

    #[must_use]
    pub fn forecast_year(&self) -> Year {
        self.config
            .forecast_year
            .unwrap_or(self.metadata().forecast_year)
    }

    /// Starting state covering the dataset's full span and first taxonomy.
    #[must_use]
    pub fn default_filter_state(&self) -> FilterState {
        let segment_type = self
            .dataset
            .segment_types(DataType::Value)
            .into_iter()
            .next()
            .unwrap_or_default();
        FilterState::new(segment_type, self.metadata().year_range())
    }

    #[must_use]
    pub fn labels(&self, state: &FilterState) -> ChartLabels {
        chart_labels(self.metadata(), state.data_type, state.year_range)
    }

    #[must_use]
    pub fn cache_stats(&self) -> ProjectionCacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

use serde::{Deserialize, Serialize};

use crate::core::{
    DEFAULT_SEGMENT_SEPARATOR, DEFAULT_SERIES_KEY_SEPARATOR, OpportunityConfig, Year,
};
use crate::error::{MarketError, MarketResult};

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can keep engine setup next to their
/// dataset files without inventing their own format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_segment_separator")]
    pub segment_separator: String,
    #[serde(default = "default_series_key_separator")]
    pub series_key_separator: String,
    /// Geographies summed from their children when selected. Empty means
    /// the dimension's global entry.
    #[serde(default)]
    pub rollup_geographies: Vec<String>,
    /// Overrides the metadata base year.
    #[serde(default)]
    pub base_year: Option<Year>,
    /// Overrides the metadata forecast year.
    #[serde(default)]
    pub forecast_year: Option<Year>,
    #[serde(default)]
    pub opportunity: OpportunityConfig,
    /// Maximum cached projections per session; 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            segment_separator: default_segment_separator(),
            series_key_separator: default_series_key_separator(),
            rollup_geographies: Vec::new(),
            base_year: None,
            forecast_year: None,
            opportunity: OpportunityConfig::default(),
            cache_capacity: default_cache_capacity(),
        }
    }

    /// Sets the separator between segment path levels.
    #[must_use]
    pub fn with_segment_separator(mut self, separator: impl Into<String>) -> Self {
        self.segment_separator = separator.into();
        self
    }

    /// Sets the separator inside composite stacked/matrix series keys.
    #[must_use]
    pub fn with_series_key_separator(mut self, separator: impl Into<String>) -> Self {
        self.series_key_separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_rollup_geographies<I, S>(mut self, geographies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rollup_geographies = geographies.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the base/forecast years used for CAGR and table columns.
    #[must_use]
    pub fn with_reference_years(mut self, base_year: Year, forecast_year: Year) -> Self {
        self.base_year = Some(base_year);
        self.forecast_year = Some(forecast_year);
        self
    }

    #[must_use]
    pub fn with_opportunity(mut self, opportunity: OpportunityConfig) -> Self {
        self.opportunity = opportunity;
        self
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> MarketResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MarketError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> MarketResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| MarketError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_segment_separator() -> String {
    DEFAULT_SEGMENT_SEPARATOR.to_owned()
}

fn default_series_key_separator() -> String {
    DEFAULT_SERIES_KEY_SEPARATOR.to_owned()
}

fn default_cache_capacity() -> usize {
    256
}

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};

use super::types::{BusinessType, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Value,
    Volume,
}

/// Which dimension drives the chart's primary series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "segment-mode")]
    SegmentMode,
    #[serde(rename = "geography-mode")]
    GeographyMode,
    #[serde(rename = "matrix")]
    Matrix,
}

/// Closed interval of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: Year,
    pub end: Year,
}

impl YearRange {
    #[must_use]
    pub fn new(start: Year, end: Year) -> Self {
        Self { start, end }
    }

    /// Builds a range, rejecting `start > end`.
    pub fn checked(start: Year, end: Year) -> MarketResult<Self> {
        if start > end {
            return Err(MarketError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(self, year: Year) -> bool {
        year >= self.start && year <= self.end
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start > self.end
    }

    /// Years in ascending order; empty when inverted.
    #[must_use]
    pub fn years(self) -> Vec<Year> {
        if self.is_empty() {
            return Vec::new();
        }
        (self.start..=self.end).collect()
    }
}

/// Interactive selection driving every projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub geographies: Vec<String>,
    #[serde(default)]
    pub segments: Vec<String>,
    pub segment_type: String,
    pub year_range: YearRange,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub business_type: Option<BusinessType>,
}

impl FilterState {
    #[must_use]
    pub fn new(segment_type: impl Into<String>, year_range: YearRange) -> Self {
        Self {
            geographies: Vec::new(),
            segments: Vec::new(),
            segment_type: segment_type.into(),
            year_range,
            data_type: DataType::Value,
            view_mode: ViewMode::SegmentMode,
            business_type: None,
        }
    }

    #[must_use]
    pub fn with_geographies<I, S>(mut self, geographies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geographies = geographies.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = segments.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    #[must_use]
    pub fn with_business_type(mut self, business_type: BusinessType) -> Self {
        self.business_type = Some(business_type);
        self
    }

    pub fn to_json_pretty(&self) -> MarketResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MarketError::InvalidData(format!("failed to serialize filter state: {e}")))
    }

    pub fn from_json_str(input: &str) -> MarketResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| MarketError::InvalidData(format!("failed to parse filter state: {e}")))
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar year used as the time axis of every series.
pub type Year = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeographyLevel {
    Global,
    Region,
    Country,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentLevel {
    #[default]
    Leaf,
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    B2B,
    B2C,
}

impl BusinessType {
    /// Parses a hierarchy label or path component, ignoring ASCII case.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("B2B") {
            Some(Self::B2B)
        } else if label.eq_ignore_ascii_case("B2C") {
            Some(Self::B2C)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::B2B => "B2B",
            Self::B2C => "B2C",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named levels of a segment path, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentHierarchy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_4: Option<String>,
}

impl SegmentHierarchy {
    /// Non-empty levels in order.
    pub fn levels(&self) -> impl Iterator<Item = &str> {
        [&self.level_1, &self.level_2, &self.level_3, &self.level_4]
            .into_iter()
            .filter_map(|level| level.as_deref())
            .filter(|level| !level.trim().is_empty())
    }
}

/// One (geography × segment) time series as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub geography: String,
    pub geography_level: GeographyLevel,
    #[serde(default)]
    pub parent_geography: Option<String>,
    pub segment_type: String,
    pub segment: String,
    #[serde(default)]
    pub segment_level: SegmentLevel,
    #[serde(default)]
    pub segment_hierarchy: SegmentHierarchy,
    pub time_series: BTreeMap<Year, f64>,
    #[serde(default)]
    pub cagr: f64,
    #[serde(default)]
    pub market_share: f64,
}

impl DataRecord {
    #[must_use]
    pub fn new(
        geography: impl Into<String>,
        segment_type: impl Into<String>,
        segment: impl Into<String>,
    ) -> Self {
        Self {
            geography: geography.into(),
            geography_level: GeographyLevel::Country,
            parent_geography: None,
            segment_type: segment_type.into(),
            segment: segment.into(),
            segment_level: SegmentLevel::Leaf,
            segment_hierarchy: SegmentHierarchy::default(),
            time_series: BTreeMap::new(),
            cagr: 0.0,
            market_share: 0.0,
        }
    }

    #[must_use]
    pub fn with_geography_level(mut self, level: GeographyLevel) -> Self {
        self.geography_level = level;
        self
    }

    #[must_use]
    pub fn with_parent_geography(mut self, parent: impl Into<String>) -> Self {
        self.parent_geography = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_segment_level(mut self, level: SegmentLevel) -> Self {
        self.segment_level = level;
        self
    }

    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: SegmentHierarchy) -> Self {
        self.segment_hierarchy = hierarchy;
        self
    }

    #[must_use]
    pub fn with_value(mut self, year: Year, value: f64) -> Self {
        self.time_series.insert(year, value);
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: impl IntoIterator<Item = (Year, f64)>) -> Self {
        self.time_series.extend(series);
        self
    }

    #[must_use]
    pub fn with_cagr(mut self, cagr: f64) -> Self {
        self.cagr = cagr;
        self
    }

    /// Value at `year`; missing or non-finite samples read as zero.
    #[must_use]
    pub fn value_at(&self, year: Year) -> f64 {
        match self.time_series.get(&year) {
            Some(value) if value.is_finite() => *value,
            _ => 0.0,
        }
    }

    /// Business type from `segment_hierarchy.level_1`, else from the first
    /// component of the segment path.
    #[must_use]
    pub fn business_type(&self, separator: &str) -> Option<BusinessType> {
        if let Some(level_1) = self
            .segment_hierarchy
            .level_1
            .as_deref()
            .filter(|level| !level.trim().is_empty())
        {
            return BusinessType::from_label(level_1);
        }

        let token = separator.trim();
        let first = if token.is_empty() {
            self.segment.as_str()
        } else {
            self.segment.split(token).next().unwrap_or_default()
        };
        BusinessType::from_label(first)
    }
}

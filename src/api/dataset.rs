use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{DataRecord, DataType, Dimensions, GeographyDimension, Year, YearRange};
use crate::error::{MarketError, MarketResult};

use super::validation::validate_metadata;

/// Units and reference years of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub value_unit: String,
    #[serde(default)]
    pub volume_unit: String,
    pub start_year: Year,
    pub base_year: Year,
    pub forecast_year: Year,
    #[serde(default)]
    pub years: Vec<Year>,
}

impl DatasetMetadata {
    #[must_use]
    pub fn new(start_year: Year, base_year: Year, forecast_year: Year) -> Self {
        Self {
            currency: String::new(),
            value_unit: String::new(),
            volume_unit: String::new(),
            start_year,
            base_year,
            forecast_year,
            years: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_units(
        mut self,
        currency: impl Into<String>,
        value_unit: impl Into<String>,
        volume_unit: impl Into<String>,
    ) -> Self {
        self.currency = currency.into();
        self.value_unit = value_unit.into();
        self.volume_unit = volume_unit.into();
        self
    }

    /// Full configured span; `years` when listed, else start..=forecast.
    #[must_use]
    pub fn year_range(&self) -> YearRange {
        match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) => YearRange::new(*first, *last),
            _ => YearRange::new(self.start_year, self.forecast_year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub records: Vec<DataRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default)]
    pub value: RecordSet,
    #[serde(default)]
    pub volume: RecordSet,
}

/// Wire shape delivered by the data-source collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEnvelope {
    pub metadata: DatasetMetadata,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub data: DataSection,
}

/// Validated, immutable session dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    metadata: DatasetMetadata,
    dimensions: Dimensions,
    value_records: Vec<DataRecord>,
    volume_records: Vec<DataRecord>,
}

impl Dataset {
    /// Validates metadata, canonicalizes records and fills in a derived
    /// geography dimension when the envelope has none.
    pub fn from_envelope(envelope: DatasetEnvelope) -> MarketResult<Self> {
        let DatasetEnvelope {
            metadata,
            mut dimensions,
            data,
        } = envelope;
        validate_metadata(&metadata)?;

        let value_records = canonicalize_records(data.value.records, "value");
        let volume_records = canonicalize_records(data.volume.records, "volume");

        if dimensions.geographies.is_none() {
            dimensions.geographies = Some(GeographyDimension::from_records(
                value_records.iter().chain(&volume_records),
            ));
        }

        debug!(
            value_records = value_records.len(),
            volume_records = volume_records.len(),
            segment_types = dimensions.segments.len(),
            "loaded dataset"
        );

        Ok(Self {
            metadata,
            dimensions,
            value_records,
            volume_records,
        })
    }

    pub fn from_json_str(input: &str) -> MarketResult<Self> {
        let envelope: DatasetEnvelope = serde_json::from_str(input)
            .map_err(|e| MarketError::InvalidData(format!("failed to parse dataset: {e}")))?;
        Self::from_envelope(envelope)
    }

    /// Builds a dataset from in-memory value records only.
    pub fn from_records(metadata: DatasetMetadata, records: Vec<DataRecord>) -> MarketResult<Self> {
        Self::from_envelope(DatasetEnvelope {
            metadata,
            dimensions: Dimensions::default(),
            data: DataSection {
                value: RecordSet { records },
                volume: RecordSet::default(),
            },
        })
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        let derived = self.dimensions.geographies.take();
        self.dimensions = dimensions;
        if self.dimensions.geographies.is_none() {
            self.dimensions.geographies = derived;
        }
        self
    }

    #[must_use]
    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    #[must_use]
    pub fn records(&self, data_type: DataType) -> &[DataRecord] {
        match data_type {
            DataType::Value => &self.value_records,
            DataType::Volume => &self.volume_records,
        }
    }

    pub fn all_records(&self) -> impl Iterator<Item = &DataRecord> {
        self.value_records.iter().chain(&self.volume_records)
    }

    /// Distinct segment types in first-seen order.
    #[must_use]
    pub fn segment_types(&self, data_type: DataType) -> Vec<String> {
        self.records(data_type)
            .iter()
            .map(|record| record.segment_type.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct geographies in first-seen order.
    #[must_use]
    pub fn geographies(&self, data_type: DataType) -> Vec<String> {
        self.records(data_type)
            .iter()
            .map(|record| record.geography.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct segment paths of one taxonomy in first-seen order.
    #[must_use]
    pub fn segments(&self, data_type: DataType, segment_type: &str) -> Vec<String> {
        self.records(data_type)
            .iter()
            .filter(|record| record.segment_type == segment_type)
            .map(|record| record.segment.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

fn canonicalize_records(records: Vec<DataRecord>, label: &'static str) -> Vec<DataRecord> {
    let original_count = records.len();
    let mut dropped_values = 0_usize;
    let mut out = Vec::with_capacity(records.len());

    for mut record in records {
        record.geography = record.geography.trim().to_owned();
        record.segment_type = record.segment_type.trim().to_owned();
        record.segment = record.segment.trim().to_owned();
        if let Some(parent) = record.parent_geography.as_mut() {
            *parent = parent.trim().to_owned();
        }
        if record.geography.is_empty() || record.segment.is_empty() {
            continue;
        }

        let before = record.time_series.len();
        record.time_series.retain(|_, value| value.is_finite());
        dropped_values += before - record.time_series.len();
        out.push(record);
    }

    if out.len() != original_count {
        warn!(
            set = label,
            dropped = original_count - out.len(),
            "dropped records without geography or segment"
        );
    }
    if dropped_values > 0 {
        warn!(
            set = label,
            dropped_values, "dropped non-finite time-series values"
        );
    }
    out
}

use serde::{Deserialize, Serialize};

use crate::core::{DataType, YearRange};

use super::DatasetMetadata;

/// Axis and legend strings derived from dataset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLabels {
    pub value_axis_title: String,
    pub unit_label: String,
    pub currency: Option<String>,
    pub year_span: String,
}

#[must_use]
pub fn chart_labels(
    metadata: &DatasetMetadata,
    data_type: DataType,
    year_range: YearRange,
) -> ChartLabels {
    let unit_label = unit_label(metadata, data_type);
    let title = match data_type {
        DataType::Value => "Market Value",
        DataType::Volume => "Market Volume",
    };
    let value_axis_title = if unit_label.is_empty() {
        title.to_owned()
    } else {
        format!("{title} ({unit_label})")
    };
    let currency = match data_type {
        DataType::Value => Some(metadata.currency.trim())
            .filter(|currency| !currency.is_empty())
            .map(str::to_owned),
        DataType::Volume => None,
    };

    ChartLabels {
        value_axis_title,
        unit_label,
        currency,
        year_span: year_span(year_range),
    }
}

/// "USD Million" for values, the volume unit for volumes.
#[must_use]
pub fn unit_label(metadata: &DatasetMetadata, data_type: DataType) -> String {
    match data_type {
        DataType::Value => [metadata.currency.trim(), metadata.value_unit.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        DataType::Volume => metadata.volume_unit.trim().to_owned(),
    }
}

fn year_span(range: YearRange) -> String {
    if range.is_empty() {
        String::new()
    } else if range.start == range.end {
        range.start.to_string()
    } else {
        format!("{}-{}", range.start, range.end)
    }
}

use serde::{Deserialize, Serialize};

use super::filter_state::YearRange;
use super::types::{DataRecord, Year};

/// One table line per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub geography: String,
    pub segment: String,
    pub base_year_value: f64,
    pub forecast_year_value: f64,
    pub cagr: f64,
    pub growth_pct: f64,
    pub sparkline: Vec<f64>,
}

/// Summarizes each record between `base_year` and `forecast_year`.
///
/// `cagr` is the record's precomputed rate. `growth_pct` is zero when the
/// base value is not positive. The sparkline covers `year_range`.
#[must_use]
pub fn project_summary_table(
    records: &[&DataRecord],
    year_range: YearRange,
    base_year: Year,
    forecast_year: Year,
) -> Vec<SummaryRow> {
    let years = year_range.years();
    records
        .iter()
        .map(|record| {
            let base_year_value = record.value_at(base_year);
            let forecast_year_value = record.value_at(forecast_year);
            SummaryRow {
                geography: record.geography.clone(),
                segment: record.segment.clone(),
                base_year_value,
                forecast_year_value,
                cagr: if record.cagr.is_finite() { record.cagr } else { 0.0 },
                growth_pct: growth_pct(base_year_value, forecast_year_value),
                sparkline: years.iter().map(|year| record.value_at(*year)).collect(),
            }
        })
        .collect()
}

#[must_use]
pub fn growth_pct(base: f64, forecast: f64) -> f64 {
    if base > 0.0 {
        (forecast - base) / base * 100.0
    } else {
        0.0
    }
}

use serde::{Deserialize, Serialize};

use super::series_table::{SeriesTable, YearRow};
use super::types::Year;

/// Multi-series line input: one object per year keyed by series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartData {
    pub series_keys: Vec<String>,
    pub rows: Vec<YearRow>,
}

impl LineChartData {
    /// `(year, value)` pairs of one series, in year order.
    #[must_use]
    pub fn series_points(&self, key: &str) -> Vec<(Year, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.values.get(key).map(|value| (row.year, *value)))
            .collect()
    }
}

#[must_use]
pub fn project_line_chart(table: &SeriesTable) -> LineChartData {
    LineChartData {
        series_keys: table.labels().map(str::to_owned).collect(),
        rows: table.rows(),
    }
}

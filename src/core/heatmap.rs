use serde::{Deserialize, Serialize};

use super::series_table::SeriesTable;
use super::types::Year;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub geography: String,
    pub segment: String,
    pub value: f64,
}

/// Flattens `geography::segment` columns into cells valued at `year`.
///
/// Columns without a secondary component are skipped; a year outside the
/// table reads as zero.
#[must_use]
pub fn project_heatmap(table: &SeriesTable, year: Year) -> Vec<HeatmapCell> {
    let index = table.year_index(year);
    table
        .columns
        .iter()
        .filter_map(|column| {
            let segment = column.key.secondary.as_ref()?;
            let value = index
                .and_then(|index| column.values.get(index).copied())
                .unwrap_or(0.0);
            Some(HeatmapCell {
                geography: column.key.primary.clone(),
                segment: segment.clone(),
                value,
            })
        })
        .collect()
}

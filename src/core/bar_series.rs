use serde::{Deserialize, Serialize};

use super::aggregation::SeriesPlan;
use super::series_table::{SeriesTable, YearRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarLayout {
    Simple,
    Stacked,
}

impl BarLayout {
    #[must_use]
    pub fn for_plan(plan: SeriesPlan) -> Self {
        match plan {
            SeriesPlan::Stacked { .. } => Self::Stacked,
            SeriesPlan::Single { .. } | SeriesPlan::Matrix => Self::Simple,
        }
    }
}

/// Grouped/stacked bar input.
///
/// For stacked layouts `primary_keys` are the bar groups and
/// `secondary_keys` the slices inside each bar; every group carries every
/// slice so legends stay aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartData {
    pub layout: BarLayout,
    pub series_keys: Vec<String>,
    pub primary_keys: Vec<String>,
    pub secondary_keys: Vec<String>,
    pub rows: Vec<YearRow>,
}

impl BarChartData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.series_keys.is_empty()
    }
}

/// Shapes an aggregated table into bar rows, one object per year.
#[must_use]
pub fn project_bar_chart(table: &SeriesTable, layout: BarLayout) -> BarChartData {
    let secondary_keys = match layout {
        BarLayout::Stacked => table.secondary_keys(),
        BarLayout::Simple => Vec::new(),
    };
    BarChartData {
        layout,
        series_keys: table.labels().map(str::to_owned).collect(),
        primary_keys: table.primary_keys(),
        secondary_keys,
        rows: table.rows(),
    }
}

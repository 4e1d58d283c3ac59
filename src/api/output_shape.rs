use serde::{Deserialize, Serialize};

use crate::core::{
    BarChartData, BarLayout, BubblePoint, FilterState, HeatmapCell, LineChartData, SeriesPlan,
    SummaryRow, WaterfallStep,
};

/// Chart family a projection is shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "layout", rename_all = "snake_case")]
pub enum OutputShape {
    Bar(BarLayout),
    Line,
    Heatmap,
    Table,
    Waterfall,
    Bubble,
}

impl OutputShape {
    /// Bar shape whose layout follows the state's selection cardinality.
    #[must_use]
    pub fn bar_for(state: &FilterState) -> Self {
        Self::Bar(BarLayout::for_plan(SeriesPlan::for_state(state)))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bar(BarLayout::Simple) => "bar",
            Self::Bar(BarLayout::Stacked) => "stacked_bar",
            Self::Line => "line",
            Self::Heatmap => "heatmap",
            Self::Table => "table",
            Self::Waterfall => "waterfall",
            Self::Bubble => "bubble",
        }
    }
}

/// Literal structure handed to the visualization layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum ChartProjection {
    Bar(BarChartData),
    Line(LineChartData),
    Heatmap(Vec<HeatmapCell>),
    Table(Vec<SummaryRow>),
    Waterfall(Vec<WaterfallStep>),
    Bubble(Vec<BubblePoint>),
}

impl ChartProjection {
    /// True when the view should render its empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bar(data) => data.is_empty(),
            Self::Line(data) => data.rows.is_empty() || data.series_keys.is_empty(),
            Self::Heatmap(cells) => cells.is_empty(),
            Self::Table(rows) => rows.is_empty(),
            Self::Waterfall(steps) => steps.is_empty(),
            Self::Bubble(points) => points.is_empty(),
        }
    }

    /// Number of top-level items (rows, cells, steps or bubbles).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bar(data) => data.rows.len(),
            Self::Line(data) => data.rows.len(),
            Self::Heatmap(cells) => cells.len(),
            Self::Table(rows) => rows.len(),
            Self::Waterfall(steps) => steps.len(),
            Self::Bubble(points) => points.len(),
        }
    }
}

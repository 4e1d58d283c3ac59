#[cfg(feature = "parallel-aggregation")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::{
    BarLayout, FilterState, SeriesPlan, aggregate_matrix, project_bar_chart, project_bubbles,
    project_heatmap, project_line_chart, project_summary_table, project_table_waterfall,
};

use super::{ChartProjection, MarketEngine, OutputShape, ProjectionRequest};

impl MarketEngine {
    /// Computes one projection from scratch.
    #[must_use]
    pub fn project(&self, state: &FilterState, shape: OutputShape) -> ChartProjection {
        let plan = SeriesPlan::for_state(state);
        let projection = match shape {
            OutputShape::Bar(BarLayout::Stacked) => {
                let table = self.aggregate_with_plan(state, plan);
                ChartProjection::Bar(project_bar_chart(&table, BarLayout::Stacked))
            }
            OutputShape::Bar(BarLayout::Simple) => {
                let table = self.aggregate_with_plan(state, plan.unstacked());
                ChartProjection::Bar(project_bar_chart(&table, BarLayout::Simple))
            }
            OutputShape::Line => {
                let table = self.aggregate_with_plan(state, plan.unstacked());
                ChartProjection::Line(project_line_chart(&table))
            }
            OutputShape::Heatmap => {
                let filtered = self.filter(state);
                let table = aggregate_matrix(&filtered, state, &self.context);
                ChartProjection::Heatmap(project_heatmap(&table, state.year_range.end))
            }
            OutputShape::Table => {
                let filtered = self.filter(state);
                ChartProjection::Table(project_summary_table(
                    &filtered,
                    state.year_range,
                    self.base_year(),
                    self.forecast_year(),
                ))
            }
            OutputShape::Waterfall => {
                let table = self.aggregate_with_plan(state, plan.unstacked());
                ChartProjection::Waterfall(project_table_waterfall(&table))
            }
            OutputShape::Bubble => {
                ChartProjection::Bubble(project_bubbles(&self.opportunity_matrix(state)))
            }
        };
        debug!(
            shape = shape.name(),
            items = projection.len(),
            "computed projection"
        );
        projection
    }

    /// Like [`MarketEngine::project`], reusing a cached result for an
    /// identical request.
    pub fn project_cached(&mut self, state: &FilterState, shape: OutputShape) -> ChartProjection {
        let request = ProjectionRequest::new(state.clone(), shape);
        if let Some(hit) = self.cache.get(&request) {
            trace!(shape = shape.name(), "projection cache hit");
            return hit;
        }
        let projection = self.project(state, shape);
        self.cache.insert(request, projection.clone());
        projection
    }

    /// Evaluates independent requests; results keep request order.
    #[must_use]
    pub fn project_batch(&self, requests: &[ProjectionRequest]) -> Vec<ChartProjection> {
        #[cfg(feature = "parallel-aggregation")]
        {
            requests
                .par_iter()
                .map(|request| self.project(&request.state, request.shape))
                .collect()
        }

        #[cfg(not(feature = "parallel-aggregation"))]
        {
            requests
                .iter()
                .map(|request| self.project(&request.state, request.shape))
                .collect()
        }
    }
}

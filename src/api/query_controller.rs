use tracing::trace;

use crate::core::{
    DataRecord, FilterState, OpportunityRequest, OpportunityRow, SeriesPlan, SeriesTable,
    aggregate_with_plan, filter_records, opportunity_rows_in_market,
};

use super::MarketEngine;

impl MarketEngine {
    /// Records of the state's data type that pass every filter axis.
    #[must_use]
    pub fn filter(&self, state: &FilterState) -> Vec<&DataRecord> {
        filter_records(
            self.dataset.records(state.data_type),
            state,
            &self.context,
        )
    }

    /// Year × series table for the plan the state implies.
    #[must_use]
    pub fn aggregate(&self, state: &FilterState) -> SeriesTable {
        self.aggregate_with_plan(state, SeriesPlan::for_state(state))
    }

    #[must_use]
    pub fn aggregate_with_plan(&self, state: &FilterState, plan: SeriesPlan) -> SeriesTable {
        let filtered = self.filter(state);
        aggregate_with_plan(&filtered, state, &self.context, plan)
    }

    /// Geography the opportunity matrix is computed for: the first selected
    /// one, else the dimension's global entry.
    #[must_use]
    pub fn opportunity_geography(&self, state: &FilterState) -> Option<String> {
        state.geographies.first().cloned().or_else(|| {
            self.context
                .geography()
                .dimension()
                .global
                .clone()
        })
    }

    #[must_use]
    pub fn opportunity_matrix(&self, state: &FilterState) -> Vec<OpportunityRow> {
        let Some(geography) = self.opportunity_geography(state) else {
            trace!("no geography available for opportunity matrix");
            return Vec::new();
        };
        let filtered = self.filter(state);
        let mut market_state = state.clone();
        market_state.segments.clear();
        let market = self.filter(&market_state);
        opportunity_rows_in_market(
            &filtered,
            &market,
            OpportunityRequest {
                geography: &geography,
                segment_type: &state.segment_type,
                business_type: state.business_type,
                base_year: self.base_year(),
                forecast_year: self.forecast_year(),
            },
            &self.context,
            &self.config.opportunity,
        )
    }
}

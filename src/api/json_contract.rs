use serde::{Deserialize, Serialize};

use crate::core::FilterState;
use crate::error::{MarketError, MarketResult};

use super::{ChartLabels, ChartProjection, MarketEngine, OutputShape};

pub const PROJECTION_JSON_SCHEMA_V1: u32 = 1;

/// Versioned payload handed to the visualization layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionContractV1 {
    pub schema_version: u32,
    pub labels: ChartLabels,
    pub projection: ChartProjection,
}

impl ProjectionContractV1 {
    #[must_use]
    pub fn new(labels: ChartLabels, projection: ChartProjection) -> Self {
        Self {
            schema_version: PROJECTION_JSON_SCHEMA_V1,
            labels,
            projection,
        }
    }

    pub fn to_json_pretty(&self) -> MarketResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            MarketError::InvalidData(format!("failed to serialize projection contract v1: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> MarketResult<Self> {
        let payload: Self = serde_json::from_str(input).map_err(|e| {
            MarketError::InvalidData(format!("failed to parse projection json payload: {e}"))
        })?;
        if payload.schema_version != PROJECTION_JSON_SCHEMA_V1 {
            return Err(MarketError::InvalidData(format!(
                "unsupported projection schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload)
    }
}

impl ChartProjection {
    pub fn to_json_pretty(&self) -> MarketResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MarketError::InvalidData(format!("failed to serialize projection: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self, labels: ChartLabels) -> MarketResult<String> {
        ProjectionContractV1::new(labels, self.clone()).to_json_pretty()
    }
}

impl MarketEngine {
    pub fn projection_json_contract_v1_pretty(
        &self,
        state: &FilterState,
        shape: OutputShape,
    ) -> MarketResult<String> {
        self.project(state, shape)
            .to_json_contract_v1_pretty(self.labels(state))
    }
}

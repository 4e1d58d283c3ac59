use serde::{Deserialize, Serialize};

use super::opportunity::OpportunityRow;

/// One bubble of the opportunity matrix.
///
/// `x` is the market-share index, `y` the CAGR index and `size` the
/// opportunity index, all on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubblePoint {
    pub segment: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub market_share: f64,
    pub cagr: f64,
    pub absolute_growth: f64,
}

#[must_use]
pub fn project_bubbles(rows: &[OpportunityRow]) -> Vec<BubblePoint> {
    rows.iter()
        .map(|row| BubblePoint {
            segment: row.segment.clone(),
            x: row.market_share_index,
            y: row.cagr_index,
            size: row.opportunity_index,
            color: row.color.clone(),
            market_share: row.market_share,
            cagr: row.cagr,
            absolute_growth: row.absolute_growth,
        })
        .collect()
}

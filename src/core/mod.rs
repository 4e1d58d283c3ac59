pub mod aggregation;
pub mod bar_series;
pub mod bubble_series;
pub mod context;
pub mod dimensions;
pub mod filter;
pub mod filter_state;
pub mod geography;
pub mod heatmap;
pub mod line_series;
pub mod opportunity;
pub mod segment_matcher;
pub mod segment_tree;
pub mod series_table;
pub mod summary_table;
pub mod types;
pub mod waterfall;

pub use aggregation::{
    SeriesDimension, SeriesPlan, aggregate, aggregate_matrix, aggregate_single,
    aggregate_stacked, aggregate_with_plan, filter_and_aggregate,
};
pub use bar_series::{BarChartData, BarLayout, project_bar_chart};
pub use bubble_series::{BubblePoint, project_bubbles};
pub use context::{DEFAULT_SERIES_KEY_SEPARATOR, QueryContext};
pub use dimensions::{Dimensions, GeographyDimension, SegmentAdjacency, SegmentDimension};
pub use filter::{filter_records, record_passes};
pub use filter_state::{DataType, FilterState, ViewMode, YearRange};
pub use geography::{GeographyMatch, GeographyResolver};
pub use heatmap::{HeatmapCell, project_heatmap};
pub use line_series::{LineChartData, project_line_chart};
pub use opportunity::{
    OpportunityConfig, OpportunityRequest, OpportunityRow, capped_cagr, immediate_children,
    normalize_index, opportunity_rows, opportunity_rows_in_market, subtree_members,
};
pub use segment_matcher::{SegmentMatch, SegmentMatcher};
pub use segment_tree::{DEFAULT_SEGMENT_SEPARATOR, SegmentNodeId, SegmentPath, SegmentTree};
pub use series_table::{
    RESERVED_LABEL_SUFFIX, SeriesColumn, SeriesKey, SeriesTable, YEAR_FIELD, YearRow,
};
pub use summary_table::{SummaryRow, project_summary_table};
pub use types::{
    BusinessType, DataRecord, GeographyLevel, SegmentHierarchy, SegmentLevel, Year,
};
pub use waterfall::{
    WaterfallEntity, WaterfallKind, WaterfallStep, project_table_waterfall, project_waterfall,
    waterfall_entities,
};

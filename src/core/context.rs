use indexmap::IndexMap;

use super::dimensions::{GeographyDimension, SegmentDimension};
use super::geography::GeographyResolver;
use super::segment_matcher::SegmentMatcher;
use super::segment_tree::{DEFAULT_SEGMENT_SEPARATOR, SegmentTree};
use super::types::DataRecord;

/// Default separator inside composite `primary::secondary` series keys.
pub const DEFAULT_SERIES_KEY_SEPARATOR: &str = "::";

/// Resolvers and taxonomy shared by every pure query over one dataset.
///
/// Built once per dataset and passed by reference; nothing in here changes
/// while a session runs.
#[derive(Debug, Clone)]
pub struct QueryContext {
    geography: GeographyResolver,
    segments: SegmentMatcher,
    segment_dimensions: IndexMap<String, SegmentDimension>,
    series_key_separator: String,
}

impl QueryContext {
    #[must_use]
    pub fn new(geography: GeographyResolver, segments: SegmentMatcher) -> Self {
        Self {
            geography,
            segments,
            segment_dimensions: IndexMap::new(),
            series_key_separator: DEFAULT_SERIES_KEY_SEPARATOR.to_owned(),
        }
    }

    /// Builds the segment tree from every record path and derives the
    /// geography layout when none is given.
    #[must_use]
    pub fn from_records(
        records: &[DataRecord],
        geography: Option<GeographyDimension>,
        segment_separator: &str,
    ) -> Self {
        let dimension = geography.unwrap_or_else(|| GeographyDimension::from_records(records));
        let tree = SegmentTree::from_paths(
            segment_separator,
            records.iter().map(|record| record.segment.as_str()),
        );
        Self::new(GeographyResolver::new(dimension), SegmentMatcher::new(tree))
    }

    /// Convenience for tests and single-shot callers.
    #[must_use]
    pub fn for_records(records: &[DataRecord]) -> Self {
        Self::from_records(records, None, DEFAULT_SEGMENT_SEPARATOR)
    }

    #[must_use]
    pub fn with_geography(mut self, geography: GeographyResolver) -> Self {
        self.geography = geography;
        self
    }

    #[must_use]
    pub fn with_segment_dimensions(
        mut self,
        segment_dimensions: IndexMap<String, SegmentDimension>,
    ) -> Self {
        self.segment_dimensions = segment_dimensions;
        self
    }

    #[must_use]
    pub fn with_series_key_separator(mut self, separator: impl Into<String>) -> Self {
        self.series_key_separator = separator.into();
        self
    }

    #[must_use]
    pub fn geography(&self) -> &GeographyResolver {
        &self.geography
    }

    #[must_use]
    pub fn segments(&self) -> &SegmentMatcher {
        &self.segments
    }

    #[must_use]
    pub fn segment_separator(&self) -> &str {
        self.segments.separator()
    }

    #[must_use]
    pub fn series_key_separator(&self) -> &str {
        &self.series_key_separator
    }

    #[must_use]
    pub fn segment_dimension(&self, segment_type: &str) -> Option<&SegmentDimension> {
        self.segment_dimensions.get(segment_type)
    }
}

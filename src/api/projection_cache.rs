use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::FilterState;

use super::{ChartProjection, OutputShape};

/// One projection query: a filter state and the chart family it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub state: FilterState,
    pub shape: OutputShape,
}

impl ProjectionRequest {
    #[must_use]
    pub fn new(state: FilterState, shape: OutputShape) -> Self {
        Self { state, shape }
    }
}

/// Runtime metrics exposed by the per-session projection cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Finished projections keyed by full request.
///
/// Sound only because the session dataset never changes; when full the
/// cache is cleared wholesale.
#[derive(Debug)]
pub(super) struct ProjectionCache {
    entries: HashMap<ProjectionRequest, ChartProjection>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ProjectionCache {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub(super) fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub(super) fn get(&mut self, key: &ProjectionRequest) -> Option<ChartProjection> {
        let value = self.entries.get(key).cloned();
        if value.is_some() {
            self.hits = self.hits.saturating_add(1);
        }
        value
    }

    pub(super) fn insert(&mut self, key: ProjectionRequest, value: ChartProjection) {
        self.misses = self.misses.saturating_add(1);
        if !self.is_enabled() {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(key, value);
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(super) fn stats(&self) -> ProjectionCacheStats {
        ProjectionCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

use indexmap::IndexSet;

use super::dimensions::GeographyDimension;
use super::types::DataRecord;

/// Which rule accepted a record geography against a selected name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeographyMatch {
    Exact,
    /// The selected name is a prefix of the record geography.
    Prefix,
    /// The record geography is a suffix of the selected name.
    Suffix,
    /// One name contains the other, e.g. "West India (5 states)" vs "West India".
    Contains,
}

/// Geography name matching and rollup decisions.
#[derive(Debug, Clone, Default)]
pub struct GeographyResolver {
    dimension: GeographyDimension,
    rollup_parents: IndexSet<String>,
}

impl GeographyResolver {
    /// Uses the dimension's global entry as the only rollup parent.
    #[must_use]
    pub fn new(dimension: GeographyDimension) -> Self {
        let rollup_parents = dimension
            .global
            .iter()
            .map(|global| normalize(global))
            .collect();
        Self {
            dimension,
            rollup_parents,
        }
    }

    /// Replaces the rollup parents; an empty list keeps the global default.
    #[must_use]
    pub fn with_rollup_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parents: IndexSet<String> = parents
            .into_iter()
            .map(|parent| normalize(parent.as_ref()))
            .filter(|parent| !parent.is_empty())
            .collect();
        if !parents.is_empty() {
            self.rollup_parents = parents;
        }
        self
    }

    #[must_use]
    pub fn dimension(&self) -> &GeographyDimension {
        &self.dimension
    }

    #[must_use]
    pub fn match_kind(&self, record_geo: &str, selected: &str) -> Option<GeographyMatch> {
        match_kind(record_geo, selected)
    }

    /// True when any selected entry matches `record_geo`.
    #[must_use]
    pub fn is_match(&self, record_geo: &str, selected: &[String]) -> bool {
        selected
            .iter()
            .any(|candidate| match_kind(record_geo, candidate).is_some())
    }

    /// Exact match first, else the first matching entry in declared order.
    #[must_use]
    pub fn resolve_key<'s>(&self, record_geo: &str, selected: &'s [String]) -> Option<&'s str> {
        selected
            .iter()
            .find(|candidate| match_kind(record_geo, candidate) == Some(GeographyMatch::Exact))
            .or_else(|| {
                selected
                    .iter()
                    .find(|candidate| match_kind(record_geo, candidate).is_some())
            })
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_rollup_parent(&self, geography: &str) -> bool {
        self.rollup_parents.contains(&normalize(geography))
    }

    /// True when `record` is a direct child of `parent`, either by its own
    /// `parent_geography` or by the dimension layout.
    #[must_use]
    pub fn is_child_of(&self, parent: &str, record: &DataRecord) -> bool {
        let parent_key = normalize(parent);
        if record
            .parent_geography
            .as_deref()
            .is_some_and(|own_parent| normalize(own_parent) == parent_key)
        {
            return true;
        }
        let record_key = normalize(&record.geography);
        self.dimension
            .children_of(parent)
            .iter()
            .any(|child| normalize(child) == record_key)
    }

    /// Selected rollup parent that `record` rolls into, if any.
    #[must_use]
    pub fn rollup_parent_for<'s>(
        &self,
        record: &DataRecord,
        selected: &'s [String],
    ) -> Option<&'s str> {
        selected
            .iter()
            .find(|candidate| {
                self.is_rollup_parent(candidate)
                    && !is_same_geography(&record.geography, candidate)
                    && self.is_child_of(candidate, record)
            })
            .map(String::as_str)
    }
}

#[must_use]
pub fn is_same_geography(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn match_kind(record_geo: &str, selected: &str) -> Option<GeographyMatch> {
    let record = normalize(record_geo);
    let candidate = normalize(selected);
    if record.is_empty() || candidate.is_empty() {
        return None;
    }

    if record == candidate {
        Some(GeographyMatch::Exact)
    } else if record.starts_with(&candidate) {
        Some(GeographyMatch::Prefix)
    } else if candidate.ends_with(&record) {
        Some(GeographyMatch::Suffix)
    } else if record.contains(&candidate) || candidate.contains(&record) {
        Some(GeographyMatch::Contains)
    } else {
        None
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

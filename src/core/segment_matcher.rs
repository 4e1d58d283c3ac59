use super::segment_tree::{SegmentPath, SegmentTree};

/// Which rule accepted a record path against a selected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentMatch {
    Exact,
    /// The record sits below the selection.
    Descendant,
    /// The selection sits below the record.
    Ancestor,
}

/// Hierarchical segment matching over an explicit [`SegmentTree`].
///
/// Matching is symmetric on purpose: selecting a parent pulls in its
/// descendants and selecting a child pulls in its ancestors.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    tree: SegmentTree,
}

impl SegmentMatcher {
    #[must_use]
    pub fn new(tree: SegmentTree) -> Self {
        Self { tree }
    }

    #[must_use]
    pub fn from_paths<I, S>(separator: &str, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(SegmentTree::from_paths(separator, paths))
    }

    #[must_use]
    pub fn tree(&self) -> &SegmentTree {
        &self.tree
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        self.tree.separator()
    }

    /// Classifies `record_path` against `selected_path`, checking exact,
    /// then descendant, then ancestor.
    #[must_use]
    pub fn match_kind(&self, record_path: &str, selected_path: &str) -> Option<SegmentMatch> {
        let record = self.tree.parse(record_path);
        let selected = self.tree.parse(selected_path);
        if record.is_empty() || selected.is_empty() {
            return None;
        }
        if record == selected {
            return Some(SegmentMatch::Exact);
        }

        let separator = self.tree.separator();
        match (
            self.tree.lookup(&record.join(separator)),
            self.tree.lookup(&selected.join(separator)),
        ) {
            (Some(record_id), Some(selected_id)) => {
                if self.tree.is_ancestor(selected_id, record_id) {
                    Some(SegmentMatch::Descendant)
                } else if self.tree.is_ancestor(record_id, selected_id) {
                    Some(SegmentMatch::Ancestor)
                } else {
                    None
                }
            }
            _ => path_match_kind(&record, &selected),
        }
    }

    #[must_use]
    pub fn matches(&self, record_path: &str, selected_path: &str) -> bool {
        self.match_kind(record_path, selected_path).is_some()
    }

    /// True when any selected path matches; an empty selection matches all.
    #[must_use]
    pub fn matches_any(&self, record_path: &str, selected: &[String]) -> bool {
        selected.is_empty() || self.resolve_key(record_path, selected).is_some()
    }

    /// First selected path (in declared order) matching `record_path`.
    #[must_use]
    pub fn resolve_key<'s>(&self, record_path: &str, selected: &'s [String]) -> Option<&'s str> {
        selected
            .iter()
            .find(|candidate| self.matches(record_path, candidate))
            .map(String::as_str)
    }
}

fn path_match_kind(record: &SegmentPath, selected: &SegmentPath) -> Option<SegmentMatch> {
    if selected.is_ancestor_of(record) {
        Some(SegmentMatch::Descendant)
    } else if record.is_ancestor_of(selected) {
        Some(SegmentMatch::Ancestor)
    } else {
        None
    }
}

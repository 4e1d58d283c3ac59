use std::collections::HashMap;

use smallvec::SmallVec;

/// Default separator between segment path levels.
pub const DEFAULT_SEGMENT_SEPARATOR: &str = " > ";

/// Parsed segment path. Most taxonomies stay within four levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentPath {
    components: SmallVec<[String; 4]>,
}

impl SegmentPath {
    /// Splits `raw` on the trimmed separator and trims each component,
    /// dropping empty ones.
    #[must_use]
    pub fn parse(raw: &str, separator: &str) -> Self {
        let token = separator.trim();
        let components = if token.is_empty() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                SmallVec::new()
            } else {
                SmallVec::from_iter([trimmed.to_owned()])
            }
        } else {
            raw.split(token)
                .map(str::trim)
                .filter(|component| !component.is_empty())
                .map(str::to_owned)
                .collect()
        };
        Self { components }
    }

    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// True when `self` is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.depth() < other.depth() && other.components.starts_with(&self.components)
    }

    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.components.join(separator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentNodeId(usize);

#[derive(Debug, Clone)]
struct SegmentNode {
    label: String,
    path: String,
    parent: Option<SegmentNodeId>,
    children: Vec<SegmentNodeId>,
}

/// Arena tree of segment paths.
///
/// Inserting a path interns every prefix, so each node knows its parent and
/// ancestry checks walk at most `depth` parent links.
#[derive(Debug, Clone)]
pub struct SegmentTree {
    separator: String,
    nodes: Vec<SegmentNode>,
    by_path: HashMap<String, SegmentNodeId>,
}

impl SegmentTree {
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            nodes: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_paths<I, S>(separator: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new(separator);
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parse(&self, raw: &str) -> SegmentPath {
        SegmentPath::parse(raw, &self.separator)
    }

    /// Canonical spelling of `raw` under this tree's separator.
    #[must_use]
    pub fn canonical(&self, raw: &str) -> String {
        self.parse(raw).join(&self.separator)
    }

    /// Interns `raw` and all of its prefixes. Returns `None` for empty paths.
    pub fn insert(&mut self, raw: &str) -> Option<SegmentNodeId> {
        let path = self.parse(raw);
        let mut parent: Option<SegmentNodeId> = None;
        let mut current = String::new();

        for (depth, component) in path.components().iter().enumerate() {
            if depth > 0 {
                current.push_str(&self.separator);
            }
            current.push_str(component);

            let id = match self.by_path.get(&current) {
                Some(id) => *id,
                None => {
                    let id = SegmentNodeId(self.nodes.len());
                    self.nodes.push(SegmentNode {
                        label: component.clone(),
                        path: current.clone(),
                        parent,
                        children: Vec::new(),
                    });
                    if let Some(parent_id) = parent {
                        self.nodes[parent_id.0].children.push(id);
                    }
                    self.by_path.insert(current.clone(), id);
                    id
                }
            };
            parent = Some(id);
        }

        parent
    }

    #[must_use]
    pub fn lookup(&self, raw: &str) -> Option<SegmentNodeId> {
        self.by_path.get(&self.canonical(raw)).copied()
    }

    #[must_use]
    pub fn path(&self, id: SegmentNodeId) -> &str {
        &self.nodes[id.0].path
    }

    #[must_use]
    pub fn label(&self, id: SegmentNodeId) -> &str {
        &self.nodes[id.0].label
    }

    #[must_use]
    pub fn parent(&self, id: SegmentNodeId) -> Option<SegmentNodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn children(&self, id: SegmentNodeId) -> &[SegmentNodeId] {
        &self.nodes[id.0].children
    }

    pub fn roots(&self) -> impl Iterator<Item = SegmentNodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| SegmentNodeId(index))
    }

    /// Walks parents of `node`; true when `ancestor` is met before the root.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: SegmentNodeId, node: SegmentNodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Closest strict ancestor of `node` accepted by `keep`.
    #[must_use]
    pub fn nearest_ancestor_where(
        &self,
        node: SegmentNodeId,
        mut keep: impl FnMut(SegmentNodeId) -> bool,
    ) -> Option<SegmentNodeId> {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if keep(current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }
}

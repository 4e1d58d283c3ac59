use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MarketError, MarketResult};

use super::context::QueryContext;
use super::dimensions::SegmentAdjacency;
use super::geography::is_same_geography;
use super::segment_tree::SegmentTree;
use super::types::{BusinessType, DataRecord, Year};

/// Tuning for the opportunity-matrix analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityConfig {
    /// Upper bound on forecast/base before the CAGR root is taken.
    #[serde(default = "default_growth_ratio_cap")]
    pub growth_ratio_cap: f64,
    /// CAGR ceiling, in percent.
    #[serde(default = "default_cagr_cap")]
    pub cagr_cap: f64,
    /// CAGR floor, in percent.
    #[serde(default)]
    pub cagr_floor: f64,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    /// Rows below this opportunity index are dropped after sorting.
    #[serde(default)]
    pub min_index: Option<f64>,
    /// Rows beyond this count are dropped after sorting and filtering.
    #[serde(default)]
    pub max_count: Option<usize>,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            growth_ratio_cap: default_growth_ratio_cap(),
            cagr_cap: default_cagr_cap(),
            cagr_floor: 0.0,
            palette: default_palette(),
            min_index: None,
            max_count: None,
        }
    }
}

impl OpportunityConfig {
    #[must_use]
    pub fn with_min_index(mut self, min_index: f64) -> Self {
        self.min_index = Some(min_index);
        self
    }

    #[must_use]
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    #[must_use]
    pub fn with_caps(mut self, growth_ratio_cap: f64, cagr_cap: f64) -> Self {
        self.growth_ratio_cap = growth_ratio_cap;
        self.cagr_cap = cagr_cap;
        self
    }

    #[must_use]
    pub fn with_palette<I, S>(mut self, palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = palette.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> MarketResult<()> {
        for (name, value) in [
            ("growth_ratio_cap", self.growth_ratio_cap),
            ("cagr_cap", self.cagr_cap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MarketError::InvalidConfig(format!(
                    "opportunity `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.cagr_floor.is_finite() || self.cagr_floor > self.cagr_cap {
            return Err(MarketError::InvalidConfig(
                "opportunity `cagr_floor` must be finite and <= cagr_cap".to_owned(),
            ));
        }
        if self.palette.is_empty() {
            return Err(MarketError::InvalidConfig(
                "opportunity palette must not be empty".to_owned(),
            ));
        }
        if let Some(min_index) = self.min_index {
            if !(0.0..=100.0).contains(&min_index) {
                return Err(MarketError::InvalidConfig(
                    "opportunity `min_index` must be within 0..=100".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

fn default_growth_ratio_cap() -> f64 {
    100.0
}

fn default_cagr_cap() -> f64 {
    100.0
}

fn default_palette() -> Vec<String> {
    [
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        "#bcbd22", "#17becf",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// What the opportunity matrix is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpportunityRequest<'a> {
    pub geography: &'a str,
    pub segment_type: &'a str,
    pub business_type: Option<BusinessType>,
    pub base_year: Year,
    pub forecast_year: Year,
}

/// Raw and normalized metrics for one immediate child segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRow {
    pub segment: String,
    pub base_value: f64,
    pub forecast_value: f64,
    pub market_share: f64,
    pub cagr: f64,
    pub absolute_growth: f64,
    pub market_share_index: f64,
    pub cagr_index: f64,
    pub opportunity_index: f64,
    pub color: String,
}

/// CAGR in percent between two positive values, with the configured ratio
/// cap applied before the root and the rate clamped to floor/cap after.
/// Non-positive inputs or span yield zero.
#[must_use]
pub fn capped_cagr(base: f64, forecast: f64, years: i32, config: &OpportunityConfig) -> f64 {
    let positive = |value: f64| value.is_finite() && value > 0.0;
    if years <= 0 || !positive(base) || !positive(forecast) {
        return 0.0;
    }
    let ratio = (forecast / base).min(config.growth_ratio_cap);
    let rate = (ratio.powf(1.0 / f64::from(years)) - 1.0) * 100.0;
    if !rate.is_finite() {
        return 0.0;
    }
    rate.max(config.cagr_floor).min(config.cagr_cap)
}

/// `value / max * 100`, clamped to `0..=100`; a non-positive max gives 0.
#[must_use]
pub fn normalize_index(value: f64, max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

/// Nodes of the observed hierarchy that no other node lists as a child.
///
/// The hierarchy spans `observed` plus every adjacency ancestor of it.
#[must_use]
pub fn immediate_children(observed: &[String], adjacency: &SegmentAdjacency) -> Vec<String> {
    let nodes = hierarchy_nodes(observed, adjacency);
    let listed_children: HashSet<&str> = nodes
        .iter()
        .filter_map(|node| adjacency.get(node))
        .flatten()
        .map(String::as_str)
        .collect();
    nodes
        .iter()
        .filter(|node| !listed_children.contains(node.as_str()))
        .cloned()
        .collect()
}

/// `segment` plus every transitive descendant, each once.
#[must_use]
pub fn subtree_members(segment: &str, adjacency: &SegmentAdjacency) -> IndexSet<String> {
    let mut visited: IndexSet<String> = IndexSet::new();
    let mut stack = vec![segment.to_owned()];
    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(children) = adjacency.get(&current) {
            for child in children.iter().rev() {
                if !visited.contains(child) {
                    stack.push(child.clone());
                }
            }
        }
    }
    visited
}

/// Parent links between observed segments via the nearest observed
/// ancestor path.
#[must_use]
pub fn derived_adjacency(observed: &[String], tree: &SegmentTree) -> SegmentAdjacency {
    let by_canonical: HashMap<String, &String> = observed
        .iter()
        .map(|segment| (tree.canonical(segment), segment))
        .collect();

    let mut adjacency = SegmentAdjacency::new();
    for segment in observed {
        let Some(node) = tree.lookup(segment) else {
            continue;
        };
        let parent = tree.nearest_ancestor_where(node, |candidate| {
            by_canonical.contains_key(tree.path(candidate))
        });
        if let Some(parent) = parent.and_then(|id| by_canonical.get(tree.path(id))) {
            let children = adjacency.entry((*parent).clone()).or_default();
            if !children.contains(segment) {
                children.push(segment.clone());
            }
        }
    }
    adjacency
}

/// Computes opportunity rows for one geography and taxonomy, taking the
/// market-share denominator from the same `records`.
#[must_use]
pub fn opportunity_rows(
    records: &[&DataRecord],
    request: OpportunityRequest<'_>,
    ctx: &QueryContext,
    config: &OpportunityConfig,
) -> Vec<OpportunityRow> {
    opportunity_rows_in_market(records, records, request, ctx, config)
}

/// Computes opportunity rows for one geography and taxonomy.
///
/// `records` (normally the filtered set) decides which segments become rows
/// and what they sum to. `market` holds every record of the taxonomy that
/// the segment selection would otherwise hide; its base-year total in the
/// requested geography is the market-share denominator.
///
/// Geography scoping tries an exact name first, then the children of a
/// rollup parent, then the resolver's display-variant matches.
#[must_use]
pub fn opportunity_rows_in_market(
    records: &[&DataRecord],
    market: &[&DataRecord],
    request: OpportunityRequest<'_>,
    ctx: &QueryContext,
    config: &OpportunityConfig,
) -> Vec<OpportunityRow> {
    let scoped = scope_records(records, request, ctx);
    if scoped.is_empty() {
        debug!(geography = request.geography, "no records for opportunity matrix");
        return Vec::new();
    }

    let observed: Vec<String> = scoped
        .iter()
        .map(|record| record.segment.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();

    let adjacency = ctx
        .segment_dimension(request.segment_type)
        .and_then(|dimension| dimension.adjacency(request.business_type))
        .filter(|adjacency| covers_any(adjacency, &observed))
        .cloned()
        .unwrap_or_else(|| derived_adjacency(&observed, ctx.segments().tree()));

    let mut base_by_segment: HashMap<&str, f64> = HashMap::new();
    let mut forecast_by_segment: HashMap<&str, f64> = HashMap::new();
    for record in &scoped {
        *base_by_segment.entry(record.segment.as_str()).or_default() +=
            record.value_at(request.base_year);
        *forecast_by_segment
            .entry(record.segment.as_str())
            .or_default() += record.value_at(request.forecast_year);
    }
    let total_base: f64 = scope_records(market, request, ctx)
        .iter()
        .map(|record| record.value_at(request.base_year))
        .sum();

    let years = request.forecast_year - request.base_year;
    if years <= 0 {
        warn!(
            base_year = request.base_year,
            forecast_year = request.forecast_year,
            "non-positive CAGR span; growth rates read as zero"
        );
    }

    let mut rows: Vec<OpportunityRow> = immediate_children(&observed, &adjacency)
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            let members = subtree_members(&segment, &adjacency);
            let base_value: f64 = members
                .iter()
                .filter_map(|member| base_by_segment.get(member.as_str()))
                .sum();
            let forecast_value: f64 = members
                .iter()
                .filter_map(|member| forecast_by_segment.get(member.as_str()))
                .sum();
            let market_share = if total_base > 0.0 {
                base_value / total_base * 100.0
            } else {
                0.0
            };
            OpportunityRow {
                segment,
                base_value,
                forecast_value,
                market_share,
                cagr: capped_cagr(base_value, forecast_value, years, config),
                absolute_growth: forecast_value - base_value,
                market_share_index: 0.0,
                cagr_index: 0.0,
                opportunity_index: 0.0,
                color: palette_color(&config.palette, index),
            }
        })
        .collect();

    let max_of = |rows: &[OpportunityRow], metric: fn(&OpportunityRow) -> f64| {
        rows.iter().map(metric).fold(0.0_f64, f64::max)
    };
    let max_share = max_of(&rows, |row| row.market_share);
    let max_cagr = max_of(&rows, |row| row.cagr);
    let max_growth = max_of(&rows, |row| row.absolute_growth);
    for row in &mut rows {
        row.market_share_index = normalize_index(row.market_share, max_share);
        row.cagr_index = normalize_index(row.cagr, max_cagr);
        row.opportunity_index = normalize_index(row.absolute_growth, max_growth);
    }

    rows.sort_by(|a, b| OrderedFloat(b.opportunity_index).cmp(&OrderedFloat(a.opportunity_index)));
    if let Some(min_index) = config.min_index {
        rows.retain(|row| row.opportunity_index >= min_index);
    }
    if let Some(max_count) = config.max_count {
        rows.truncate(max_count);
    }

    debug!(
        geography = request.geography,
        segment_type = request.segment_type,
        rows = rows.len(),
        "computed opportunity matrix"
    );
    rows
}

fn scope_records<'a>(
    records: &[&'a DataRecord],
    request: OpportunityRequest<'_>,
    ctx: &QueryContext,
) -> Vec<&'a DataRecord> {
    let resolver = ctx.geography();
    let of_type: Vec<&'a DataRecord> = records
        .iter()
        .filter(|record| record.segment_type == request.segment_type)
        .copied()
        .collect();
    let select = |keep: &dyn Fn(&DataRecord) -> bool| -> Vec<&'a DataRecord> {
        of_type.iter().copied().filter(|record| keep(record)).collect()
    };

    let direct = select(&|record: &DataRecord| {
        is_same_geography(&record.geography, request.geography)
    });
    if !direct.is_empty() {
        return direct;
    }
    if resolver.is_rollup_parent(request.geography) {
        let children =
            select(&|record: &DataRecord| resolver.is_child_of(request.geography, record));
        if !children.is_empty() {
            return children;
        }
    }
    let selected = [request.geography.to_owned()];
    select(&|record: &DataRecord| resolver.is_match(&record.geography, &selected))
}

/// True when the published hierarchy names at least one observed segment.
fn covers_any(adjacency: &SegmentAdjacency, observed: &[String]) -> bool {
    let named: HashSet<&str> = adjacency
        .iter()
        .flat_map(|(parent, children)| {
            std::iter::once(parent.as_str()).chain(children.iter().map(String::as_str))
        })
        .collect();
    observed
        .iter()
        .any(|segment| named.contains(segment.as_str()))
}

fn hierarchy_nodes(observed: &[String], adjacency: &SegmentAdjacency) -> IndexSet<String> {
    let mut parents_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for (parent, children) in adjacency {
        for child in children {
            parents_of
                .entry(child.as_str())
                .or_default()
                .push(parent.as_str());
        }
    }

    let mut nodes: IndexSet<String> = observed.iter().cloned().collect();
    let mut cursor = 0;
    while cursor < nodes.len() {
        let node = nodes[cursor].clone();
        if let Some(parents) = parents_of.get(node.as_str()) {
            for parent in parents {
                nodes.insert((*parent).to_owned());
            }
        }
        cursor += 1;
    }
    nodes
}

fn palette_color(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        return String::new();
    }
    palette[index % palette.len()].clone()
}

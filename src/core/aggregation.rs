use indexmap::IndexMap;
use tracing::trace;

use super::context::QueryContext;
use super::filter::filter_records;
use super::filter_state::{FilterState, ViewMode};
use super::geography::is_same_geography;
use super::series_table::{SeriesColumn, SeriesKey, SeriesTable};
use super::types::{DataRecord, Year};

/// Dimension feeding a series key component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesDimension {
    Segment,
    Geography,
}

impl SeriesDimension {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Segment => Self::Geography,
            Self::Geography => Self::Segment,
        }
    }

    fn selection(self, state: &FilterState) -> &[String] {
        match self {
            Self::Segment => &state.segments,
            Self::Geography => &state.geographies,
        }
    }
}

/// Key layout the aggregator produces for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesPlan {
    /// One column per resolved primary entry.
    Single { primary: SeriesDimension },
    /// `primary::secondary` columns over the full selection cross product.
    Stacked { primary: SeriesDimension },
    /// `geography::segment` columns for every observed pair.
    Matrix,
}

impl SeriesPlan {
    /// Stacks only when both the primary and the secondary selection hold
    /// more than one entry.
    #[must_use]
    pub fn for_state(state: &FilterState) -> Self {
        let primary = match state.view_mode {
            ViewMode::SegmentMode => SeriesDimension::Segment,
            ViewMode::GeographyMode => SeriesDimension::Geography,
            ViewMode::Matrix => return Self::Matrix,
        };
        if primary.selection(state).len() > 1 && primary.other().selection(state).len() > 1 {
            Self::Stacked { primary }
        } else {
            Self::Single { primary }
        }
    }

    /// Same plan with stacking collapsed into single columns.
    #[must_use]
    pub fn unstacked(self) -> Self {
        match self {
            Self::Stacked { primary } => Self::Single { primary },
            other => other,
        }
    }
}

/// Filters `records` with `state` and aggregates the survivors.
#[must_use]
pub fn filter_and_aggregate(
    records: &[DataRecord],
    state: &FilterState,
    ctx: &QueryContext,
) -> SeriesTable {
    let filtered = filter_records(records, state, ctx);
    aggregate(&filtered, state, ctx)
}

/// Aggregates already-filtered records with the plan `state` implies.
#[must_use]
pub fn aggregate(records: &[&DataRecord], state: &FilterState, ctx: &QueryContext) -> SeriesTable {
    aggregate_with_plan(records, state, ctx, SeriesPlan::for_state(state))
}

#[must_use]
pub fn aggregate_with_plan(
    records: &[&DataRecord],
    state: &FilterState,
    ctx: &QueryContext,
    plan: SeriesPlan,
) -> SeriesTable {
    match plan {
        SeriesPlan::Single { primary } => aggregate_single(records, state, ctx, primary),
        SeriesPlan::Stacked { primary } => aggregate_stacked(records, state, ctx, primary),
        SeriesPlan::Matrix => aggregate_matrix(records, state, ctx),
    }
}

/// One column per resolved `primary` entry; the other dimension is summed.
#[must_use]
pub fn aggregate_single(
    records: &[&DataRecord],
    state: &FilterState,
    ctx: &QueryContext,
    primary: SeriesDimension,
) -> SeriesTable {
    let mut acc = SeriesAccumulator::new(state.year_range.years());
    let keys = KeyResolver { state, ctx };

    for record in records {
        let key = match primary {
            SeriesDimension::Segment => keys.segment(record).map(SeriesKey::single),
            SeriesDimension::Geography => Some(SeriesKey::single(keys.primary_geography(record))),
        };
        if let Some(key) = key {
            acc.add(key, record, false);
        }
    }

    if primary == SeriesDimension::Geography {
        inject_rollups(&mut acc, records, &keys, |_| Some(None));
    }

    acc.order_by_selection(primary.selection(state), &[]);
    let table = acc.finish(ctx.series_key_separator());
    trace!(
        records = records.len(),
        columns = table.columns.len(),
        "aggregate single"
    );
    table
}

/// `primary::secondary` columns; every selected combination is present,
/// zero-filled when no record contributes.
#[must_use]
pub fn aggregate_stacked(
    records: &[&DataRecord],
    state: &FilterState,
    ctx: &QueryContext,
    primary: SeriesDimension,
) -> SeriesTable {
    let mut acc = SeriesAccumulator::new(state.year_range.years());
    let keys = KeyResolver { state, ctx };
    let primary_selection = primary.selection(state);
    let secondary_selection = primary.other().selection(state);

    for primary_entry in primary_selection {
        for secondary_entry in secondary_selection {
            acc.ensure(SeriesKey::composite(
                primary_entry.clone(),
                secondary_entry.clone(),
            ));
        }
    }

    for record in records {
        let key = match primary {
            SeriesDimension::Segment => keys.segment(record).map(|segment| {
                SeriesKey::composite(segment, keys.secondary_geography(record))
            }),
            SeriesDimension::Geography => keys.segment(record).map(|segment| {
                SeriesKey::composite(keys.primary_geography(record), segment)
            }),
        };
        if let Some(key) = key {
            acc.add(key, record, false);
        }
    }

    if primary == SeriesDimension::Geography {
        inject_rollups(&mut acc, records, &keys, |record| {
            keys.segment(record).map(Some)
        });
    }

    let primaries: Vec<String> = acc.primaries();
    for primary_entry in primaries {
        for secondary_entry in secondary_selection {
            acc.ensure(SeriesKey::composite(
                primary_entry.clone(),
                secondary_entry.clone(),
            ));
        }
    }

    acc.order_by_selection(primary_selection, secondary_selection);
    let table = acc.finish(ctx.series_key_separator());
    trace!(
        records = records.len(),
        columns = table.columns.len(),
        "aggregate stacked"
    );
    table
}

/// `geography::segment` columns for every observed pair plus rollup pairs.
#[must_use]
pub fn aggregate_matrix(
    records: &[&DataRecord],
    state: &FilterState,
    ctx: &QueryContext,
) -> SeriesTable {
    let mut acc = SeriesAccumulator::new(state.year_range.years());
    let keys = KeyResolver { state, ctx };

    for record in records {
        if let Some(segment) = keys.segment(record) {
            acc.add(
                SeriesKey::composite(keys.primary_geography(record), segment),
                record,
                false,
            );
        }
    }

    inject_rollups(&mut acc, records, &keys, |record| {
        keys.segment(record).map(Some)
    });

    acc.order_by_selection(&state.geographies, &state.segments);
    let table = acc.finish(ctx.series_key_separator());
    trace!(
        records = records.len(),
        columns = table.columns.len(),
        "aggregate matrix"
    );
    table
}

struct KeyResolver<'a> {
    state: &'a FilterState,
    ctx: &'a QueryContext,
}

impl KeyResolver<'_> {
    /// Resolved selected segment, or the raw path without a selection.
    fn segment(&self, record: &DataRecord) -> Option<String> {
        if self.state.segments.is_empty() {
            return Some(record.segment.clone());
        }
        self.ctx
            .segments()
            .resolve_key(&record.segment, &self.state.segments)
            .map(str::to_owned)
    }

    /// Geography key when geography is the secondary dimension; always a
    /// selected entry when one matches.
    fn secondary_geography(&self, record: &DataRecord) -> String {
        self.ctx
            .geography()
            .resolve_key(&record.geography, &self.state.geographies)
            .unwrap_or(&record.geography)
            .to_owned()
    }

    /// Geography key when geography is the primary dimension. Children of a
    /// selected rollup parent keep their own name so they are never merged
    /// into the parent's series.
    fn primary_geography(&self, record: &DataRecord) -> String {
        let selected = &self.state.geographies;
        if selected.is_empty() {
            return record.geography.clone();
        }
        if let Some(exact) = selected
            .iter()
            .find(|candidate| is_same_geography(&record.geography, candidate))
        {
            return exact.clone();
        }
        if self
            .ctx
            .geography()
            .rollup_parent_for(record, selected)
            .is_some()
        {
            return record.geography.clone();
        }
        self.secondary_geography(record)
    }
}

/// Adds one synthetic series per selected rollup parent, summing its child
/// geographies. Skipped without a segment selection and for parents that
/// have direct records of their own.
fn inject_rollups(
    acc: &mut SeriesAccumulator,
    records: &[&DataRecord],
    keys: &KeyResolver<'_>,
    secondary: impl Fn(&DataRecord) -> Option<Option<String>>,
) {
    let state = keys.state;
    let resolver = keys.ctx.geography();
    if state.segments.is_empty() {
        return;
    }

    for parent in &state.geographies {
        if !resolver.is_rollup_parent(parent) {
            continue;
        }
        if records
            .iter()
            .any(|record| is_same_geography(&record.geography, parent))
        {
            continue;
        }

        for record in records
            .iter()
            .copied()
            .filter(|record| resolver.is_child_of(parent, record))
        {
            let Some(secondary) = secondary(record) else {
                continue;
            };
            let key = SeriesKey {
                primary: parent.clone(),
                secondary,
            };
            acc.add(key, record, true);
        }
    }
}

#[derive(Debug)]
struct ColumnAccumulator {
    values: Vec<f64>,
    rollup: bool,
}

#[derive(Debug)]
struct SeriesAccumulator {
    years: Vec<Year>,
    columns: IndexMap<SeriesKey, ColumnAccumulator>,
}

impl SeriesAccumulator {
    fn new(years: Vec<Year>) -> Self {
        Self {
            years,
            columns: IndexMap::new(),
        }
    }

    fn ensure(&mut self, key: SeriesKey) {
        let width = self.years.len();
        self.columns.entry(key).or_insert_with(|| ColumnAccumulator {
            values: vec![0.0; width],
            rollup: false,
        });
    }

    fn add(&mut self, key: SeriesKey, record: &DataRecord, rollup: bool) {
        let width = self.years.len();
        let column = self
            .columns
            .entry(key)
            .or_insert_with(|| ColumnAccumulator {
                values: vec![0.0; width],
                rollup: false,
            });
        column.rollup |= rollup;
        for (slot, year) in column.values.iter_mut().zip(&self.years) {
            *slot += record.value_at(*year);
        }
    }

    fn primaries(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for key in self.columns.keys() {
            if !out.contains(&key.primary) {
                out.push(key.primary.clone());
            }
        }
        out
    }

    /// Selected entries first, in declared order; anything else keeps its
    /// first-seen position after them.
    fn order_by_selection(&mut self, primary: &[String], secondary: &[String]) {
        let rank = |selection: &[String], value: Option<&String>| {
            value
                .and_then(|value| selection.iter().position(|entry| entry == value))
                .unwrap_or(usize::MAX)
        };
        let first_seen: IndexMap<String, usize> = self
            .primaries()
            .into_iter()
            .enumerate()
            .map(|(index, primary)| (primary, index))
            .collect();

        self.columns.sort_by(|a, _, b, _| {
            rank(primary, Some(&a.primary))
                .cmp(&rank(primary, Some(&b.primary)))
                .then_with(|| first_seen.get(&a.primary).cmp(&first_seen.get(&b.primary)))
                .then_with(|| {
                    rank(secondary, a.secondary.as_ref())
                        .cmp(&rank(secondary, b.secondary.as_ref()))
                })
        });
    }

    fn finish(self, separator: &str) -> SeriesTable {
        let columns = self
            .columns
            .into_iter()
            .map(|(key, column)| SeriesColumn {
                label: key.label(separator),
                key,
                values: column.values,
                rollup: column.rollup,
            })
            .collect();
        SeriesTable {
            years: self.years,
            columns,
        }
    }
}

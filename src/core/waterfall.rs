use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::series_table::SeriesTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterfallKind {
    Start,
    Positive,
    Negative,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub name: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: WaterfallKind,
}

/// Start/end values of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallEntity {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

impl WaterfallEntity {
    #[must_use]
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn delta(&self) -> f64 {
        self.end - self.start
    }
}

/// Builds the step sequence: start total, positive deltas, negative deltas,
/// end total.
///
/// Deltas are ordered by magnitude descending inside each sign group; ties
/// keep entity order. Zero deltas count as positive.
#[must_use]
pub fn project_waterfall(
    entities: &[WaterfallEntity],
    start_label: &str,
    end_label: &str,
) -> Vec<WaterfallStep> {
    if entities.is_empty() {
        return Vec::new();
    }

    let start_total: f64 = entities.iter().map(|entity| entity.start).sum();
    let end_total: f64 = entities.iter().map(|entity| entity.end).sum();

    let mut deltas: Vec<(&str, f64)> = entities
        .iter()
        .map(|entity| (entity.name.as_str(), entity.delta()))
        .collect();
    deltas.sort_by(|a, b| by_sign_then_magnitude(a.1, b.1));

    let mut steps = Vec::with_capacity(deltas.len() + 2);
    steps.push(WaterfallStep {
        name: start_label.to_owned(),
        value: start_total,
        kind: WaterfallKind::Start,
    });
    steps.extend(deltas.into_iter().map(|(name, delta)| WaterfallStep {
        name: name.to_owned(),
        value: delta,
        kind: if delta >= 0.0 {
            WaterfallKind::Positive
        } else {
            WaterfallKind::Negative
        },
    }));
    steps.push(WaterfallStep {
        name: end_label.to_owned(),
        value: end_total,
        kind: WaterfallKind::End,
    });
    steps
}

/// Entities from the first and last table year. Rollup columns are left
/// out so totals do not count child geographies twice.
#[must_use]
pub fn waterfall_entities(table: &SeriesTable) -> Vec<WaterfallEntity> {
    if table.years.is_empty() {
        return Vec::new();
    }
    let last = table.years.len() - 1;
    table
        .columns
        .iter()
        .filter(|column| !column.rollup)
        .map(|column| {
            let start = column.values.first().copied().unwrap_or(0.0);
            let end = column.values.get(last).copied().unwrap_or(0.0);
            WaterfallEntity::new(column.label.clone(), start, end)
        })
        .collect()
}

/// Waterfall over a table, labelled with its first and last year.
#[must_use]
pub fn project_table_waterfall(table: &SeriesTable) -> Vec<WaterfallStep> {
    let (Some(first), Some(last)) = (table.years.first(), table.years.last()) else {
        return Vec::new();
    };
    project_waterfall(
        &waterfall_entities(table),
        &format!("{first} Total"),
        &format!("{last} Total"),
    )
}

fn by_sign_then_magnitude(a: f64, b: f64) -> Ordering {
    let a_negative = a < 0.0;
    let b_negative = b < 0.0;
    a_negative
        .cmp(&b_negative)
        .then_with(|| OrderedFloat(b.abs()).cmp(&OrderedFloat(a.abs())))
}

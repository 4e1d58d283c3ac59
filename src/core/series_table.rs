use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::types::Year;

/// Identity of one aggregated series.
///
/// Stacked and matrix layouts carry a secondary component; it is joined
/// to the primary with the context's series-key separator when labelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl SeriesKey {
    #[must_use]
    pub fn single(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }

    #[must_use]
    pub fn composite(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }

    /// Display label; a label equal to [`YEAR_FIELD`] gets
    /// [`RESERVED_LABEL_SUFFIX`] appended so it cannot shadow the row's year.
    #[must_use]
    pub fn label(&self, separator: &str) -> String {
        let label = match &self.secondary {
            Some(secondary) => format!("{}{separator}{secondary}", self.primary),
            None => self.primary.clone(),
        };
        if label == YEAR_FIELD {
            format!("{label}{RESERVED_LABEL_SUFFIX}")
        } else {
            label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColumn {
    pub key: SeriesKey,
    pub label: String,
    /// One value per table year.
    pub values: Vec<f64>,
    /// Synthesized by a geography rollup rather than observed directly.
    #[serde(default)]
    pub rollup: bool,
}

/// Field name [`YearRow`] reserves for the year.
pub const YEAR_FIELD: &str = "year";

/// Appended to a series label that would collide with [`YEAR_FIELD`].
pub const RESERVED_LABEL_SUFFIX: &str = " (series)";

/// One chart row: the year plus one numeric field per series label.
///
/// Labels share the object with `year`; see [`SeriesKey::label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: Year,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

/// Year × series matrix produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesTable {
    pub years: Vec<Year>,
    pub columns: Vec<SeriesColumn>,
}

impl SeriesTable {
    #[must_use]
    pub fn new(years: Vec<Year>) -> Self {
        Self {
            years,
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.columns.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.label.as_str())
    }

    #[must_use]
    pub fn column(&self, label: &str) -> Option<&SeriesColumn> {
        self.columns.iter().find(|column| column.label == label)
    }

    #[must_use]
    pub fn year_index(&self, year: Year) -> Option<usize> {
        self.years.iter().position(|candidate| *candidate == year)
    }

    /// Value of `label` at `year`; `None` when either is absent.
    #[must_use]
    pub fn value(&self, label: &str, year: Year) -> Option<f64> {
        let index = self.year_index(year)?;
        self.column(label)
            .and_then(|column| column.values.get(index).copied())
    }

    /// Distinct primary components in column order.
    #[must_use]
    pub fn primary_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.key.primary.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct secondary components in column order.
    #[must_use]
    pub fn secondary_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter_map(|column| column.key.secondary.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of every column carrying `primary` at `year`.
    #[must_use]
    pub fn primary_total(&self, primary: &str, year: Year) -> f64 {
        let Some(index) = self.year_index(year) else {
            return 0.0;
        };
        self.columns
            .iter()
            .filter(|column| column.key.primary == primary)
            .filter_map(|column| column.values.get(index))
            .sum()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<YearRow> {
        self.years
            .iter()
            .enumerate()
            .map(|(index, year)| YearRow {
                year: *year,
                values: self
                    .columns
                    .iter()
                    .map(|column| {
                        (
                            column.label.clone(),
                            column.values.get(index).copied().unwrap_or(0.0),
                        )
                    })
                    .collect(),
            })
            .collect()
    }

    /// Column-wise sum of two tables over the union of their years.
    ///
    /// Columns are matched by key; columns only one side has are kept and
    /// read as zero on the other side.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut years: Vec<Year> = self.years.iter().chain(&other.years).copied().collect();
        years.sort_unstable();
        years.dedup();

        let mut merged: IndexMap<SeriesKey, SeriesColumn> = IndexMap::new();
        for (table, column) in self
            .columns
            .iter()
            .map(|column| (self, column))
            .chain(other.columns.iter().map(|column| (other, column)))
        {
            let entry = merged
                .entry(column.key.clone())
                .or_insert_with(|| SeriesColumn {
                    key: column.key.clone(),
                    label: column.label.clone(),
                    values: vec![0.0; years.len()],
                    rollup: false,
                });
            entry.rollup |= column.rollup;
            for (index, year) in table.years.iter().enumerate() {
                if let (Ok(target), Some(value)) =
                    (years.binary_search(year), column.values.get(index))
                {
                    entry.values[target] += value;
                }
            }
        }

        Self {
            years,
            columns: merged.into_values().collect(),
        }
    }
}

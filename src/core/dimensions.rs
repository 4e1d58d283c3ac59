use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::types::{BusinessType, DataRecord, GeographyLevel};

/// Parent segment → direct children.
pub type SegmentAdjacency = IndexMap<String, Vec<String>>;

/// Geography layout: one global entry, its regions, and region members.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeographyDimension {
    #[serde(default)]
    pub global: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub countries: IndexMap<String, Vec<String>>,
}

impl GeographyDimension {
    /// Derives the layout from `geography_level` and `parent_geography`.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a DataRecord>) -> Self {
        let mut global = None;
        let mut regions = IndexSet::new();
        let mut countries: IndexMap<String, Vec<String>> = IndexMap::new();

        for record in records {
            match record.geography_level {
                GeographyLevel::Global => {
                    global.get_or_insert_with(|| record.geography.clone());
                }
                GeographyLevel::Region => {
                    regions.insert(record.geography.clone());
                }
                GeographyLevel::Country => {
                    if let Some(parent) = record.parent_geography.as_deref() {
                        let members = countries.entry(parent.to_owned()).or_default();
                        if !members.contains(&record.geography) {
                            members.push(record.geography.clone());
                        }
                    }
                }
            }
        }

        for region in countries.keys() {
            regions.insert(region.clone());
        }

        Self {
            global,
            regions: regions.into_iter().collect(),
            countries,
        }
    }

    /// Direct children of `geography`: regions for the global entry,
    /// members for a region.
    #[must_use]
    pub fn children_of(&self, geography: &str) -> &[String] {
        if self
            .global
            .as_deref()
            .is_some_and(|global| global.eq_ignore_ascii_case(geography.trim()))
        {
            return &self.regions;
        }
        self.countries
            .iter()
            .find(|(region, _)| region.eq_ignore_ascii_case(geography.trim()))
            .map(|(_, members)| members.as_slice())
            .unwrap_or_default()
    }

    /// Region owning `country`, if any.
    #[must_use]
    pub fn region_of(&self, country: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|(_, members)| {
                members
                    .iter()
                    .any(|member| member.eq_ignore_ascii_case(country.trim()))
            })
            .map(|(region, _)| region.as_str())
    }
}

/// Segment taxonomy as published by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentDimension {
    Flat {
        items: Vec<String>,
    },
    Hierarchical {
        #[serde(default)]
        items: Vec<String>,
        hierarchy: SegmentAdjacency,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        b2b_hierarchy: Option<SegmentAdjacency>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        b2c_hierarchy: Option<SegmentAdjacency>,
    },
}

impl SegmentDimension {
    /// Adjacency for the given business type; flat taxonomies have none.
    ///
    /// Variant hierarchies win over the shared one when both exist.
    #[must_use]
    pub fn adjacency(&self, business_type: Option<BusinessType>) -> Option<&SegmentAdjacency> {
        match self {
            Self::Flat { .. } => None,
            Self::Hierarchical {
                hierarchy,
                b2b_hierarchy,
                b2c_hierarchy,
                ..
            } => {
                let variant = match business_type {
                    Some(BusinessType::B2B) => b2b_hierarchy.as_ref(),
                    Some(BusinessType::B2C) => b2c_hierarchy.as_ref(),
                    None => None,
                };
                Some(variant.unwrap_or(hierarchy))
            }
        }
    }

    /// Every segment the taxonomy names, in declaration order.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::Flat { items } => items.clone(),
            Self::Hierarchical {
                items,
                hierarchy,
                b2b_hierarchy,
                b2c_hierarchy,
            } => {
                let mut out: IndexSet<String> = items.iter().cloned().collect();
                for adjacency in [Some(hierarchy), b2b_hierarchy.as_ref(), b2c_hierarchy.as_ref()]
                    .into_iter()
                    .flatten()
                {
                    for (parent, children) in adjacency {
                        out.insert(parent.clone());
                        out.extend(children.iter().cloned());
                    }
                }
                out.into_iter().collect()
            }
        }
    }
}

/// Dimension catalog shipped alongside the records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub geographies: Option<GeographyDimension>,
    #[serde(default)]
    pub segments: IndexMap<String, SegmentDimension>,
}

//! Filter evaluation over the record store
//!
//! Two filter groups are evaluated independently against the same snapshot:
//!
//! - **General** drives the scatter plot and the record list: the total cup
//!   points slider plus the three categorical controls.
//! - **Quality** drives the choropleth: every score slider, and nothing else.
//!
//! Both are plain conjunctions with inclusive bounds. Output keeps store order.

use serde::{Deserialize, Serialize};

use crate::models::{CoffeeRecord, FilterSnapshot, FilterState, RecordStore};
use crate::types::ScoreField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterGroup {
    General,
    Quality,
}

/// Records of the store that passed one filter group, in store order
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSubset<'a> {
    pub group: FilterGroup,
    pub records: Vec<&'a CoffeeRecord>,
}

impl<'a> FilteredSubset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CoffeeRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn ids(&self) -> Vec<usize> {
        self.records.iter().map(|record| record.id).collect()
    }
}

/// Evaluate `group` over the whole store
pub fn evaluate<'a>(
    store: &'a RecordStore,
    snapshot: &FilterSnapshot,
    group: FilterGroup,
) -> FilteredSubset<'a> {
    let state = snapshot.state();
    let records = store
        .iter()
        .filter(|record| matches_group(record, state, group))
        .collect();

    FilteredSubset { group, records }
}

pub fn matches_group(record: &CoffeeRecord, state: &FilterState, group: FilterGroup) -> bool {
    match group {
        FilterGroup::General => matches_general(record, state),
        FilterGroup::Quality => matches_quality(record, state),
    }
}

/// Total score slider and categorical controls
pub fn matches_general(record: &CoffeeRecord, state: &FilterState) -> bool {
    let categorical = &state.categorical;

    state.total_score_range.contains_opt(record.total_cup_points)
        && categorical
            .processing_methods
            .matches(&record.processing_method)
        && categorical.harvest_year.matches(&record.harvest_year)
        && categorical.countries.matches(&record.country_of_origin)
}

/// Every quality slider, total cup points included; no categorical controls
pub fn matches_quality(record: &CoffeeRecord, state: &FilterState) -> bool {
    ScoreField::ALL
        .into_iter()
        .all(|field| state.quality_range(field).contains_opt(record.score(field)))
}

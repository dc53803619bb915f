//! Country aggregation for the choropleth
//!
//! Country names pass through a [`CountryNameNormalizer`] before counting so
//! that dataset spellings and geometry feature names meet in one place.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::evaluator::FilteredSubset;

/// Maps a raw country name onto the name used by the geometry source
pub trait CountryNameNormalizer {
    fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str>;
}

/// Names are used exactly as they appear
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl CountryNameNormalizer for IdentityNormalizer {
    fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }
}

/// Rewrites known dataset spellings to their geometry names
#[derive(Debug, Clone, Default)]
pub struct AliasNormalizer {
    aliases: HashMap<String, String>,
}

impl AliasNormalizer {
    pub fn new<I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            aliases: aliases.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl CountryNameNormalizer for AliasNormalizer {
    fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self.aliases.get(name) {
            Some(alias) => Cow::Owned(alias.clone()),
            None => Cow::Borrowed(name),
        }
    }
}

/// Country → number of records.
///
/// Only countries present in the subset appear; there are no zero entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountryAggregate {
    counts: BTreeMap<String, usize>,
}

impl CountryAggregate {
    pub fn get(&self, country: &str) -> usize {
        self.counts.get(country).copied().unwrap_or(0)
    }

    /// Sum of all counts, equal to the size of the aggregated subset
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(country, count)| (country.as_str(), *count))
    }

    pub fn into_counts(self) -> BTreeMap<String, usize> {
        self.counts
    }
}

/// Count records per (normalized) country of origin
pub fn aggregate_by_country(
    subset: &FilteredSubset<'_>,
    normalizer: &dyn CountryNameNormalizer,
) -> CountryAggregate {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in subset.iter() {
        let country = normalizer.normalize(&record.country_of_origin);
        *counts.entry(country.into_owned()).or_insert(0) += 1;
    }
    CountryAggregate { counts }
}

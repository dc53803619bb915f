//! View-ready projections derived from filtered subsets

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{CoffeeRecord, RecordId, Species};
use crate::aggregator::{CountryAggregate, CountryNameNormalizer};

/// Fixed x-axis of the scatter plot (total cup points)
pub const SCATTER_X_DOMAIN: (f64, f64) = (0.0, 100.0);

/// One marker on the scatter plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub id: RecordId,
    pub total_cup_points: f64,
    /// `None` when the record has no usable altitude
    pub altitude: Option<f64>,
    pub species: Species,
    pub color: Option<String>,
}

/// Legend row for the species colour scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Scatter plot of total cup points against mean altitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterProjection {
    pub points: Vec<ScatterPoint>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub legend: Vec<LegendEntry>,
}

impl ScatterProjection {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CoffeeRecord>,
    {
        let points: Vec<ScatterPoint> = records
            .into_iter()
            .filter_map(|record| {
                let total = record.total_cup_points.and_then(|v| v.to_f64())?;
                Some(ScatterPoint {
                    id: record.id,
                    total_cup_points: total,
                    altitude: record.altitude_mean_meters.and_then(|v| v.to_f64()),
                    species: record.species.clone(),
                    color: record.species.color().map(str::to_string),
                })
            })
            .collect();

        // Missing altitudes stay out of the y scale
        let max_altitude = points
            .iter()
            .filter_map(|point| point.altitude)
            .fold(0.0_f64, f64::max);

        Self {
            points,
            x_domain: SCATTER_X_DOMAIN,
            y_domain: (0.0, max_altitude),
            legend: species_legend(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn species_legend() -> Vec<LegendEntry> {
    Species::LEGEND
        .iter()
        .filter_map(|species| {
            species.color().map(|color| LegendEntry {
                label: species.to_string(),
                color: color.to_string(),
            })
        })
        .collect()
}

/// One card of the record list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: RecordId,
    pub mill: String,
    pub producer: String,
    pub variety: String,
    pub species: Species,
    pub country_of_origin: String,
    pub processing_method: String,
    pub total_cup_points: Option<Decimal>,
}

impl From<&CoffeeRecord> for ListEntry {
    fn from(record: &CoffeeRecord) -> Self {
        Self {
            id: record.id,
            mill: record.mill.clone(),
            producer: record.producer.clone(),
            variety: record.variety.clone(),
            species: record.species.clone(),
            country_of_origin: record.country_of_origin.clone(),
            processing_method: record.processing_method.clone(),
            total_cup_points: record.total_cup_points,
        }
    }
}

/// What the choropleth should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ChoroplethProjection {
    /// The quality group matched nothing; show the "check filters" overlay
    NoData,
    Counts {
        counts: BTreeMap<String, usize>,
        max_count: usize,
    },
}

impl ChoroplethProjection {
    pub fn from_aggregate(aggregate: CountryAggregate) -> Self {
        if aggregate.is_empty() {
            return ChoroplethProjection::NoData;
        }
        let max_count = aggregate.max_count();
        ChoroplethProjection::Counts {
            counts: aggregate.into_counts(),
            max_count,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChoroplethProjection::NoData)
    }

    /// Count for a geometry feature name. Unknown names read as zero.
    pub fn count_for(&self, geometry_name: &str, normalizer: &dyn CountryNameNormalizer) -> usize {
        match self {
            ChoroplethProjection::NoData => 0,
            ChoroplethProjection::Counts { counts, .. } => {
                let key = normalizer.normalize(geometry_name);
                counts.get(&*key).copied().unwrap_or(0)
            }
        }
    }

    /// Position of a country on the sequential colour scale, `[1, max]`
    /// mapped onto `[0, 1]`. `None` means the country is left blank.
    pub fn intensity(&self, geometry_name: &str, normalizer: &dyn CountryNameNormalizer) -> Option<f64> {
        let ChoroplethProjection::Counts { max_count, .. } = self else {
            return None;
        };
        let count = self.count_for(geometry_name, normalizer);
        if count == 0 {
            return None;
        }
        if *max_count <= 1 {
            return Some(0.5);
        }
        Some((count - 1) as f64 / (*max_count - 1) as f64)
    }

    /// Aggregate keys with no matching geometry feature. Those countries
    /// silently render as zero on the map.
    pub fn unmatched<'a, I>(&self, geometry_names: I, normalizer: &dyn CountryNameNormalizer) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ChoroplethProjection::Counts { counts, .. } = self else {
            return Vec::new();
        };

        let known: std::collections::BTreeSet<String> = geometry_names
            .into_iter()
            .map(|name| normalizer.normalize(name).into_owned())
            .collect();

        let unmatched: Vec<String> = counts
            .keys()
            .filter(|country| !known.contains(country.as_str()))
            .cloned()
            .collect();

        if !unmatched.is_empty() {
            tracing::debug!(
                countries = ?unmatched,
                "Aggregated countries missing from geometry; rendered as zero"
            );
        }
        unmatched
    }
}

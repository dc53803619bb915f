//! Coffee records and the immutable record store

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ScoreField;

/// Position of a record in load order
pub type RecordId = usize;

/// Coffee species
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Species {
    #[default]
    Arabica,
    Robusta,
    Other(String),
}

impl Species {
    /// Species shown in the scatter legend, in legend order
    pub const LEGEND: [Species; 2] = [Species::Arabica, Species::Robusta];

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("arabica") {
            Species::Arabica
        } else if trimmed.eq_ignore_ascii_case("robusta") {
            Species::Robusta
        } else {
            Species::Other(trimmed.to_string())
        }
    }

    /// Marker colour on the scatter plot
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Species::Arabica => Some("orange"),
            Species::Robusta => Some("green"),
            Species::Other(_) => None,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Species::Arabica => write!(f, "Arabica"),
            Species::Robusta => write!(f, "Robusta"),
            Species::Other(name) => write!(f, "{}", name),
        }
    }
}

impl From<String> for Species {
    fn from(value: String) -> Self {
        Species::parse(&value)
    }
}

impl From<Species> for String {
    fn from(value: Species) -> Self {
        value.to_string()
    }
}

/// One row of the coffee quality dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoffeeRecord {
    pub id: RecordId,
    /// `None` when the cell was blank or unparsable
    pub total_cup_points: Option<Decimal>,
    /// Parsed sub-scores; a missing key means the cell was unusable
    pub quality_scores: BTreeMap<ScoreField, Decimal>,
    pub altitude_mean_meters: Option<Decimal>,
    pub species: Species,
    pub processing_method: String,
    pub harvest_year: String,
    pub country_of_origin: String,
    pub mill: String,
    pub producer: String,
    pub variety: String,
}

impl CoffeeRecord {
    /// Value of a score field, total cup points included
    pub fn score(&self, field: ScoreField) -> Option<Decimal> {
        match field {
            ScoreField::TotalCupPoints => self.total_cup_points,
            _ => self.quality_scores.get(&field).copied(),
        }
    }
}

/// Loaded-once, read-only sequence of records.
///
/// Ids always equal the record's position.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordStore {
    records: Vec<CoffeeRecord>,
}

impl RecordStore {
    /// Take ownership of `records` and number them 0..N-1 in the given order
    pub fn from_records(mut records: Vec<CoffeeRecord>) -> Self {
        for (index, record) in records.iter_mut().enumerate() {
            record.id = index;
        }
        Self { records }
    }

    pub fn records(&self) -> &[CoffeeRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&CoffeeRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoffeeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a CoffeeRecord;
    type IntoIter = std::slice::Iter<'a, CoffeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_load_order() {
        let records = vec![
            CoffeeRecord {
                id: 42,
                country_of_origin: "Ethiopia".into(),
                ..Default::default()
            },
            CoffeeRecord {
                id: 7,
                country_of_origin: "Kenya".into(),
                ..Default::default()
            },
        ];

        let store = RecordStore::from_records(records);
        let ids: Vec<_> = store.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(store.get(1).unwrap().country_of_origin, "Kenya");
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_species_parse_and_color() {
        assert_eq!(Species::parse(" arabica"), Species::Arabica);
        assert_eq!(Species::parse("Robusta"), Species::Robusta);
        assert_eq!(Species::parse("Liberica"), Species::Other("Liberica".into()));
        assert_eq!(Species::Arabica.color(), Some("orange"));
        assert_eq!(Species::Robusta.color(), Some("green"));
        assert_eq!(Species::Other("Liberica".into()).color(), None);
    }

    #[test]
    fn test_score_reads_total_separately() {
        let mut record = CoffeeRecord {
            total_cup_points: Some(Decimal::from(82)),
            ..Default::default()
        };
        record.quality_scores.insert(ScoreField::Flavor, Decimal::from(8));

        assert_eq!(record.score(ScoreField::TotalCupPoints), Some(Decimal::from(82)));
        assert_eq!(record.score(ScoreField::Flavor), Some(Decimal::from(8)));
        assert_eq!(record.score(ScoreField::Balance), None);
    }
}

//! Dataset loading and export
//!
//! Reads the cleaned coffee quality CSV into a [`RecordStore`]. Column
//! headers follow the R-style names of the source (`Total.Cup.Points`,
//! `Country.of.Origin`, ...). Unknown columns are ignored and absent ones read
//! as blank cells.

use std::collections::BTreeSet;
use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{DatasetError, DatasetResult};
use crate::models::{CoffeeRecord, RecordStore};
use crate::types::ScoreField;
use crate::validation::{compare_harvest_years, normalize_category, parse_altitude, parse_score};

/// One CSV row exactly as it appears in the file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    #[serde(rename = "Total.Cup.Points")]
    total_cup_points: String,
    #[serde(rename = "Fragrance...Aroma")]
    fragrance_aroma: String,
    #[serde(rename = "Flavor")]
    flavor: String,
    #[serde(rename = "Aftertaste")]
    aftertaste: String,
    #[serde(rename = "Salt...Acid")]
    salt_acid: String,
    #[serde(rename = "Bitter...Sweet")]
    bitter_sweet: String,
    #[serde(rename = "Mouthfeel")]
    mouthfeel: String,
    #[serde(rename = "Uniform.Cup")]
    uniform_cup: String,
    #[serde(rename = "Clean.Cup")]
    clean_cup: String,
    #[serde(rename = "Balance")]
    balance: String,
    #[serde(rename = "Cupper.Points")]
    cupper_points: String,
    #[serde(rename = "altitude_mean_meters")]
    altitude_mean_meters: String,
    #[serde(rename = "Species")]
    species: String,
    #[serde(rename = "Processing.Method")]
    processing_method: String,
    #[serde(rename = "Harvest.Year")]
    harvest_year: String,
    #[serde(rename = "Country.of.Origin")]
    country_of_origin: String,
    #[serde(rename = "Mill")]
    mill: String,
    #[serde(rename = "Producer")]
    producer: String,
    #[serde(rename = "Variety")]
    variety: String,
}

impl RawRecord {
    fn cell(&self, field: ScoreField) -> &str {
        match field {
            ScoreField::FragranceAroma => &self.fragrance_aroma,
            ScoreField::Flavor => &self.flavor,
            ScoreField::Aftertaste => &self.aftertaste,
            ScoreField::SaltAcid => &self.salt_acid,
            ScoreField::BitterSweet => &self.bitter_sweet,
            ScoreField::Mouthfeel => &self.mouthfeel,
            ScoreField::UniformCup => &self.uniform_cup,
            ScoreField::CleanCup => &self.clean_cup,
            ScoreField::Balance => &self.balance,
            ScoreField::CupperPoints => &self.cupper_points,
            ScoreField::TotalCupPoints => &self.total_cup_points,
        }
    }

    fn into_record(self, row: usize) -> CoffeeRecord {
        let mut quality_scores = std::collections::BTreeMap::new();
        for field in ScoreField::SUB_SCORES {
            match parse_score(self.cell(field), field.domain()) {
                Some(value) => {
                    quality_scores.insert(field, value);
                }
                None => {
                    tracing::trace!(row, column = field.column(), "Unusable score cell");
                }
            }
        }

        let total_cup_points = parse_score(&self.total_cup_points, ScoreField::TotalCupPoints.domain());
        if total_cup_points.is_none() {
            tracing::trace!(row, column = "Total.Cup.Points", "Unusable score cell");
        }

        CoffeeRecord {
            id: row,
            total_cup_points,
            quality_scores,
            altitude_mean_meters: parse_altitude(&self.altitude_mean_meters),
            species: crate::models::Species::parse(&self.species),
            processing_method: normalize_category(&self.processing_method),
            harvest_year: self.harvest_year.trim().to_string(),
            country_of_origin: self.country_of_origin.trim().to_string(),
            mill: self.mill,
            producer: self.producer,
            variety: self.variety,
        }
    }
}

/// Load a record store from CSV, assigning ids in row order
pub fn load_csv<R: Read>(reader: R) -> DatasetResult<RecordStore> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    if csv_reader.headers()?.is_empty() {
        return Err(DatasetError::MissingHeader);
    }

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        records.push(result?.into_record(row));
    }

    let store = RecordStore::from_records(records);
    let incomplete = store
        .iter()
        .filter(|record| {
            record.total_cup_points.is_none() || record.quality_scores.len() < ScoreField::SUB_SCORES.len()
        })
        .count();
    tracing::info!(
        records = store.len(),
        incomplete,
        "Loaded coffee quality dataset"
    );

    Ok(store)
}

pub fn load_csv_str(text: &str) -> DatasetResult<RecordStore> {
    load_csv(text.as_bytes())
}

/// CSV row written by [`export_to_csv`], using the source column names
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "id")]
    id: usize,
    #[serde(rename = "Total.Cup.Points")]
    total_cup_points: Option<Decimal>,
    #[serde(rename = "Fragrance...Aroma")]
    fragrance_aroma: Option<Decimal>,
    #[serde(rename = "Flavor")]
    flavor: Option<Decimal>,
    #[serde(rename = "Aftertaste")]
    aftertaste: Option<Decimal>,
    #[serde(rename = "Salt...Acid")]
    salt_acid: Option<Decimal>,
    #[serde(rename = "Bitter...Sweet")]
    bitter_sweet: Option<Decimal>,
    #[serde(rename = "Mouthfeel")]
    mouthfeel: Option<Decimal>,
    #[serde(rename = "Uniform.Cup")]
    uniform_cup: Option<Decimal>,
    #[serde(rename = "Clean.Cup")]
    clean_cup: Option<Decimal>,
    #[serde(rename = "Balance")]
    balance: Option<Decimal>,
    #[serde(rename = "Cupper.Points")]
    cupper_points: Option<Decimal>,
    #[serde(rename = "altitude_mean_meters")]
    altitude_mean_meters: Option<Decimal>,
    #[serde(rename = "Species")]
    species: String,
    #[serde(rename = "Processing.Method")]
    processing_method: &'a str,
    #[serde(rename = "Harvest.Year")]
    harvest_year: &'a str,
    #[serde(rename = "Country.of.Origin")]
    country_of_origin: &'a str,
    #[serde(rename = "Mill")]
    mill: &'a str,
    #[serde(rename = "Producer")]
    producer: &'a str,
    #[serde(rename = "Variety")]
    variety: &'a str,
}

impl<'a> From<&'a CoffeeRecord> for ExportRow<'a> {
    fn from(record: &'a CoffeeRecord) -> Self {
        Self {
            id: record.id,
            total_cup_points: record.total_cup_points,
            fragrance_aroma: record.score(ScoreField::FragranceAroma),
            flavor: record.score(ScoreField::Flavor),
            aftertaste: record.score(ScoreField::Aftertaste),
            salt_acid: record.score(ScoreField::SaltAcid),
            bitter_sweet: record.score(ScoreField::BitterSweet),
            mouthfeel: record.score(ScoreField::Mouthfeel),
            uniform_cup: record.score(ScoreField::UniformCup),
            clean_cup: record.score(ScoreField::CleanCup),
            balance: record.score(ScoreField::Balance),
            cupper_points: record.score(ScoreField::CupperPoints),
            altitude_mean_meters: record.altitude_mean_meters,
            species: record.species.to_string(),
            processing_method: &record.processing_method,
            harvest_year: &record.harvest_year,
            country_of_origin: &record.country_of_origin,
            mill: &record.mill,
            producer: &record.producer,
            variety: &record.variety,
        }
    }
}

/// Export the store as CSV with the source column names plus `id`
pub fn export_to_csv(store: &RecordStore) -> DatasetResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in store {
        wtr.serialize(ExportRow::from(record))?;
    }
    let bytes = wtr.into_inner().map_err(|e| DatasetError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Contents of the dropdown controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct processing methods in first-seen order
    pub processing_methods: Vec<String>,
    /// Distinct harvest years, ascending
    pub harvest_years: Vec<String>,
    /// Distinct countries in first-seen order
    pub countries: Vec<String>,
}

impl FilterOptions {
    pub fn from_store(store: &RecordStore) -> Self {
        let processing_methods = distinct(store.iter().map(|r| r.processing_method.as_str()));
        let mut harvest_years = distinct(store.iter().map(|r| r.harvest_year.as_str()));
        harvest_years.sort_by(|a, b| compare_harvest_years(a, b));
        let countries = distinct(store.iter().map(|r| r.country_of_origin.as_str()));

        Self {
            processing_methods,
            harvest_years,
            countries,
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

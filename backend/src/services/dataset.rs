//! Dataset service
//!
//! The dataset is read once at startup and never changes afterwards. The
//! server only hands it out; every filter runs in the browser.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{export_to_csv, load_csv, load_csv_str, CoffeeRecord, FilterOptions, RecordStore};

use crate::error::{AppError, AppResult};

/// Record store plus everything derived from it at load time
#[derive(Debug)]
pub struct LoadedDataset {
    pub store: Arc<RecordStore>,
    pub options: FilterOptions,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDataset {
    /// Load the CSV at `path`
    pub fn load(path: &str) -> AppResult<Self> {
        if path.trim().is_empty() {
            return Err(AppError::Configuration("dataset.path is empty".to_string()));
        }

        let file = std::fs::File::open(Path::new(path)).map_err(shared::DatasetError::from)?;
        let store = load_csv(std::io::BufReader::new(file))?;
        Ok(Self::from_store(store, path))
    }

    /// Load from CSV text already in memory
    pub fn from_csv_str(text: &str, source: &str) -> AppResult<Self> {
        let store = load_csv_str(text)?;
        Ok(Self::from_store(store, source))
    }

    fn from_store(store: RecordStore, source: &str) -> Self {
        let options = FilterOptions::from_store(&store);
        Self {
            store: Arc::new(store),
            options,
            source: source.to_string(),
            loaded_at: Utc::now(),
        }
    }
}

/// Dataset overview
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub record_count: usize,
    pub country_count: usize,
    pub processing_method_count: usize,
    pub harvest_year_count: usize,
    /// Records whose total cup points could not be parsed
    pub unscored_count: usize,
    pub lowest_total_cup_points: Option<Decimal>,
    pub highest_total_cup_points: Option<Decimal>,
}

/// Dataset service
#[derive(Clone)]
pub struct DatasetService {
    dataset: Arc<LoadedDataset>,
}

impl DatasetService {
    pub fn new(dataset: Arc<LoadedDataset>) -> Self {
        Self { dataset }
    }

    pub fn summary(&self) -> DatasetSummary {
        let store = &self.dataset.store;
        let scores = || store.iter().filter_map(|record| record.total_cup_points);

        DatasetSummary {
            source: self.dataset.source.clone(),
            loaded_at: self.dataset.loaded_at,
            record_count: store.len(),
            country_count: self.dataset.options.countries.len(),
            processing_method_count: self.dataset.options.processing_methods.len(),
            harvest_year_count: self.dataset.options.harvest_years.len(),
            unscored_count: store.len() - scores().count(),
            lowest_total_cup_points: scores().min(),
            highest_total_cup_points: scores().max(),
        }
    }

    pub fn records(&self) -> &[CoffeeRecord] {
        self.dataset.store.records()
    }

    pub fn record(&self, id: usize) -> AppResult<&CoffeeRecord> {
        self.dataset
            .store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Record {}", id)))
    }

    pub fn options(&self) -> &FilterOptions {
        &self.dataset.options
    }

    /// Export the store as CSV
    pub fn export_csv(&self) -> AppResult<String> {
        Ok(export_to_csv(&self.dataset.store)?)
    }
}

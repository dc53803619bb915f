//! Business logic services for the Coffee Quality Dashboard server

pub mod dataset;

pub use dataset::{DatasetService, DatasetSummary, LoadedDataset};

//! Filtering, aggregation and view synchronization for the coffee quality
//! dashboard
//!
//! This crate holds everything the browser binding and the dataset server
//! share: the record store, the filter state, the two filter groups, country
//! aggregation, view projections and the synchronizer that keeps the scatter
//! plot, the record list and the choropleth consistent.

pub mod aggregator;
pub mod driver;
pub mod errors;
pub mod evaluator;
pub mod loader;
pub mod models;
pub mod settings;
pub mod sync;
pub mod types;
pub mod validation;

pub use aggregator::*;
pub use driver::*;
pub use errors::*;
pub use evaluator::*;
pub use loader::*;
pub use models::*;
pub use settings::*;
pub use sync::*;
pub use types::*;
pub use validation::*;

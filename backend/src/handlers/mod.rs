//! HTTP handlers for the Coffee Quality Dashboard server

mod dashboard;
mod dataset;
mod health;

pub use dashboard::*;
pub use dataset::*;
pub use health::*;

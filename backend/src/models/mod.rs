//! Models for the Coffee Quality Dashboard server
//!
//! Re-exports models from the shared crate

pub use shared::models::*;

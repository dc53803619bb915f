//! Domain models for the coffee quality dashboard

mod filter;
mod projection;
mod record;

pub use filter::*;
pub use projection::*;
pub use record::*;

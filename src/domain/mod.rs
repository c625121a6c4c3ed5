//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - tidy observations and run metadata (`Observation`, `RunMetadata`)
//! - the series catalog (`SeriesCatalog`, `SeriesDescriptor`, `Frequency`)
//! - run configuration (`UpdateConfig`, `MalformedPolicy`)

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;

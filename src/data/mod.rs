//! Upstream data access and normalization.
//!
//! - BLS API client + response envelope (`bls`)
//! - period code -> month mapping (`period`)
//! - raw series payload -> tidy observations (`rows`)

pub mod bls;
pub mod period;
pub mod rows;

pub use bls::{BlsClient, FetchRequest, RawBatchResponse, SeriesPayload, TimeSeriesSource};
pub use period::month_for_period;
pub use rows::{Extraction, RowExtractor};

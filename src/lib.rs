//! `bls-timeseries` library crate.
//!
//! The binary (`bls`) is a thin wrapper around this library so that:
//!
//! - the fetch/normalize/merge core is testable without network access
//! - the dataset model is reusable by read-only consumers (dashboards, notebooks)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod merge;
pub mod report;
pub mod schedule;

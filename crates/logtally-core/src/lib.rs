//! logtally-core — record reconstruction and code tallying.
//!
//! This crate holds every pipeline stage that does not touch the input
//! directory, plus the shared types used across them.
//!
//! # Architecture
//!
//! ```text
//! raw lines ──► reconstruct ──► (merge) ──► normalizer ──► aggregate ──► export
//!   per file      per file                   merged stream
//! ```
//!
//! Reconstruction runs once per file inside the feeds layer. Everything from
//! the normalizer onward sees the merged entry stream of all files.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod reconstruct;
pub mod types;

pub use aggregate::{AllowList, INTERESTING_CODES};
pub use error::RunError;
pub use types::{CodeTally, LogicalEntry, Record, ReportFormat, ReportRow};

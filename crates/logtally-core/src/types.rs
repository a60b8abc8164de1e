//! Core types for logtally-core.
//!
//! This module defines the data structures that flow between the pipeline
//! stages: the parsed [`Record`], the per-code [`CodeTally`], the emitted
//! [`ReportRow`], and the [`ReportFormat`] discriminant.

use serde::Serialize;

/// One logical log entry: a start line plus every continuation line that
/// followed it, joined with single spaces.
pub type LogicalEntry = String;

/// A structured record extracted from a [`LogicalEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Timestamp prefix, segment 0.
    pub date: String,
    /// Originating station or user column, segment 1.
    pub source: String,
    /// Category marker, segment 2.
    pub kind: String,
    /// Numeric-looking classification code, segment 3.
    pub code: String,
    /// Free text. Always the last segment, however many precede it.
    pub message: String,
}

/// Occurrence count for one code plus the message of the first record seen
/// with that code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTally {
    pub count: usize,
    pub first_message: String,
}

/// One output line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub code: String,
    pub message: String,
    pub count: usize,
}

/// Serialization format of the report file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    /// File extension used for the report, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format {other:?} (expected csv or json)")),
        }
    }
}

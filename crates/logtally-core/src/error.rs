//! Run-level failures and their process exit statuses.
//!
//! Only conditions that abort a run live here. Per-file problems are
//! recorded and reported by the feeds layer without stopping the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no input directory given (pass a directory or set input_dir)")]
    NoInputDirectory,

    #[error("cannot read input directory {path}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create report file {path}")]
    CreateReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write report file {path}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write record dump {path}")]
    DumpRecords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("run cancelled")]
    Cancelled,
}

impl RunError {
    /// Process exit status for this failure.
    ///
    /// | status | meaning |
    /// |--------|---------|
    /// | 2 | no input directory |
    /// | 3 | input directory unreadable |
    /// | 4 | report or record dump could not be written |
    /// | 5 | invalid configuration |
    /// | 130 | cancelled by the user |
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::NoInputDirectory => 2,
            RunError::ReadDirectory { .. } => 3,
            RunError::CreateReport { .. }
            | RunError::WriteReport { .. }
            | RunError::DumpRecords { .. } => 4,
            RunError::Config(_) => 5,
            RunError::Cancelled => 130,
        }
    }
}

//! logtally-feeds — the input side of logtally.
//!
//! Lists the input directory, reads every accepted file on a bounded pool of
//! tokio tasks and hands the merged [`logtally_core::LogicalEntry`] stream
//! back to the caller.

pub mod directory;
pub mod fanout;
pub mod file;

use std::path::PathBuf;

use thiserror::Error;

pub use directory::{list_inputs, Listing};
pub use fanout::{fan_out, FileFailure, Merged};

/// A failure confined to one input file.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed in {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cancelled")]
    Cancelled,
}

//! Directory enumeration.
//!
//! Only entries directly inside the input directory are considered. Names
//! ending in the log suffix are accepted; everything else is skipped with a
//! warning.

use std::path::{Path, PathBuf};

use logtally_core::RunError;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Accepted input files, sorted by file name.
    pub accepted: Vec<PathBuf>,
    /// Entries that were seen but not accepted.
    pub skipped: Vec<PathBuf>,
}

impl Listing {
    /// Number of directory entries looked at.
    pub fn seen(&self) -> usize {
        self.accepted.len() + self.skipped.len()
    }
}

/// List `dir`, accepting regular files whose name ends in `suffix`.
///
/// An unreadable directory aborts the run.
pub async fn list_inputs(dir: &Path, suffix: &str) -> Result<Listing, RunError> {
    let read_err = |source| RunError::ReadDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut listing = Listing::default();

    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if !name.ends_with(suffix) {
            warn!(file = %name, "skipping file without {suffix} suffix");
            listing.skipped.push(path);
            continue;
        }

        match entry.file_type().await {
            Ok(kind) if kind.is_dir() => {
                warn!(file = %name, "skipping directory");
                listing.skipped.push(path);
            }
            Ok(_) => listing.accepted.push(path),
            Err(e) => {
                warn!(file = %name, error = %e, "skipping entry with unknown type");
                listing.skipped.push(path);
            }
        }
    }

    listing.accepted.sort();
    listing.skipped.sort();
    info!(
        dir = %dir.display(),
        accepted = listing.accepted.len(),
        skipped = listing.skipped.len(),
        "listed input directory"
    );
    Ok(listing)
}

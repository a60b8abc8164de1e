//! Per-file reader — streams one file through a [`Reconstructor`].

use std::path::Path;

use logtally_core::reconstruct::{Reconstruction, Reconstructor};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::FeedError;

/// Read `path` line by line and reconstruct its logical entries.
///
/// Lines are decoded as UTF-8 lossily and stripped of their `\n` or `\r\n`
/// terminator. The file handle is released on every return path.
pub async fn read_entries(
    path: &Path,
    cancel: &CancellationToken,
) -> Result<Reconstruction, FeedError> {
    let file = File::open(path).await.map_err(|source| FeedError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut reconstructor = Reconstructor::new();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FeedError::Cancelled),
            read = reader.read_until(b'\n', &mut buf) => read,
        };
        let n = read.map_err(|source| FeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        reconstructor.push(&String::from_utf8_lossy(strip_terminator(&buf)));
    }

    let out = reconstructor.finish();
    if out.orphans > 0 {
        warn!(
            file = %path.display(),
            orphans = out.orphans,
            "dropped continuation lines before the first record"
        );
    }
    Ok(out)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

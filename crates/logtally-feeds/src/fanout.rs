//! Fan-out coordinator — reads many files concurrently and merges them.
//!
//! One task is spawned per file, but a semaphore caps how many of them read
//! at once. Each task publishes its whole result on a results channel; no
//! partial file is ever visible to the consumer. A coordinator task joins
//! every file task and then drops the last sender, which is what ends the
//! drain loop.
//!
//! Entries are merged in completion order, so the merged sequence differs
//! between runs. Only order-independent aggregates may be derived from it.

use std::path::PathBuf;
use std::sync::Arc;

use logtally_core::reconstruct::Reconstruction;
use logtally_core::LogicalEntry;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{file, FeedError};

/// Result of reading one file.
#[derive(Debug)]
struct FileOutcome {
    path: PathBuf,
    result: Result<Reconstruction, FeedError>,
}

/// A file that could not be read.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: FeedError,
}

/// All entries of all readable files, plus bookkeeping.
#[derive(Debug, Default)]
pub struct Merged {
    pub entries: Vec<LogicalEntry>,
    pub files_read: usize,
    /// Leading continuation lines dropped across all files.
    pub orphans: usize,
    pub failures: Vec<FileFailure>,
}

impl Merged {
    fn absorb(&mut self, outcome: FileOutcome) {
        match outcome.result {
            Ok(recon) => {
                debug!(
                    file = %outcome.path.display(),
                    entries = recon.entries.len(),
                    "file merged"
                );
                self.files_read += 1;
                self.orphans += recon.orphans;
                self.entries.extend(recon.entries);
            }
            Err(error) => {
                error!(file = %outcome.path.display(), error = %error, "skipping unreadable file");
                self.failures.push(FileFailure {
                    path: outcome.path,
                    error,
                });
            }
        }
    }
}

/// Read `files` with at most `concurrency` files in flight.
///
/// Per-file failures are collected in [`Merged::failures`]. The only error
/// returned is [`FeedError::Cancelled`], when `cancel` fires before every
/// file has been read.
pub async fn fan_out(
    files: Vec<PathBuf>,
    concurrency: usize,
    cancel: CancellationToken,
) -> Result<Merged, FeedError> {
    let total = files.len();
    let (tx, mut rx) = mpsc::channel::<FileOutcome>(total.max(1));
    let permits = Arc::new(Semaphore::new(concurrency.clamp(1, Semaphore::MAX_PERMITS)));
    let mut tasks = JoinSet::new();

    for (i, path) in files.into_iter().enumerate() {
        let tx = tx.clone();
        let permits = Arc::clone(&permits);
        let cancel = cancel.clone();

        tasks.spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                permit = permits.acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => return,
                },
            };

            info!(file = %path.display(), "processing file {}/{}", i + 1, total);
            let result = file::read_entries(&path, &cancel).await;
            if matches!(result, Err(FeedError::Cancelled)) {
                return;
            }
            // Fails only once the receiver is gone.
            let _ = tx.send(FileOutcome { path, result }).await;
        });
    }

    let barrier = tokio::spawn(async move {
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "file task panicked");
            }
        }
        drop(tx);
    });

    let mut merged = Merged::default();
    while let Some(outcome) = rx.recv().await {
        merged.absorb(outcome);
    }
    if let Err(e) = barrier.await {
        error!(error = %e, "fan-out coordinator failed");
    }

    if cancel.is_cancelled() {
        return Err(FeedError::Cancelled);
    }

    info!(
        files = merged.files_read,
        failed = merged.failures.len(),
        entries = merged.entries.len(),
        "merged file entries"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn merges_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(
            dir.path(),
            "a.log",
            "01/02/2023 10:00:00.000\tX\tINFO\t20042\tfirst msg\n extra text\n",
        );
        let b = write(dir.path(), "b.log", "01/02/2023 10:00:01.000\tX\tINFO\t20042\tsecond msg\n");

        let merged = fan_out(vec![a, b], 4, CancellationToken::new()).await.unwrap();
        let mut entries = merged.entries.clone();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                "01/02/2023 10:00:00.000\tX\tINFO\t20042\tfirst msg extra text".to_string(),
                "01/02/2023 10:00:01.000\tX\tINFO\t20042\tsecond msg".to_string(),
            ]
        );
        assert_eq!(merged.files_read, 2);
        assert!(merged.failures.is_empty());
    }

    #[tokio::test]
    async fn files_stay_contiguous_in_merge() {
        let dir = tempfile::tempdir().unwrap();
        let body = |tag: &str| {
            (0..50)
                .map(|i| format!("01/02/2023 10:00:{:02}.000\t{tag}\tINFO\t2002\tline {i}\n", i % 60))
                .collect::<String>()
        };
        let files: Vec<PathBuf> = ["a", "b", "c"]
            .into_iter()
            .map(|t| write(dir.path(), &format!("{t}.log"), &body(t)))
            .collect();

        let merged = fan_out(files, 3, CancellationToken::new()).await.unwrap();
        assert_eq!(merged.entries.len(), 150);
        for chunk in merged.entries.chunks(50) {
            let tag = chunk[0].split('\t').nth(1).unwrap();
            assert!(chunk.iter().all(|e| e.split('\t').nth(1) == Some(tag)));
            assert!(chunk[0].ends_with("line 0"));
            assert!(chunk[49].ends_with("line 49"));
        }
    }

    #[tokio::test]
    async fn open_failure_skips_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.log", "01/02/2023 10:00:00.000\ta\tb\t2002\tc\n");
        let missing = dir.path().join("missing.log");

        let merged = fan_out(vec![missing.clone(), good], 1, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(merged.files_read, 1);
        assert_eq!(merged.entries.len(), 1);
        assert_eq!(merged.failures.len(), 1);
        assert_eq!(merged.failures[0].path, missing);
        assert!(matches!(merged.failures[0].error, FeedError::Open { .. }));
        assert!(merged.failures[0].error.to_string().contains("missing.log: "));
    }

    #[tokio::test]
    async fn oversized_concurrency_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.log", "01/02/2023 10:00:00.000	a	b	2002	c
");

        let merged = fan_out(vec![a], usize::MAX, CancellationToken::new()).await.unwrap();
        assert_eq!(merged.files_read, 1);
        assert_eq!(merged.entries.len(), 1);
    }

    #[tokio::test]
    async fn no_files_yields_empty_merge() {
        let merged = fan_out(Vec::new(), 8, CancellationToken::new()).await.unwrap();
        assert!(merged.entries.is_empty());
        assert_eq!(merged.files_read, 0);
    }

    #[tokio::test]
    async fn cancellation_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.log", "01/02/2023 10:00:00.000\ta\n");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fan_out(vec![a], 2, cancel).await.unwrap_err();
        assert!(matches!(err, FeedError::Cancelled));
    }

    #[tokio::test]
    async fn orphans_are_summed() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.log", "x\ny\n01/02/2023 10:00:00.000\ta\n");
        let b = write(dir.path(), "b.log", "z\n");

        let merged = fan_out(vec![a, b], 2, CancellationToken::new()).await.unwrap();
        assert_eq!(merged.orphans, 3);
        assert_eq!(merged.entries.len(), 1);
    }
}

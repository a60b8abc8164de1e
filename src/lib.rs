//! logtally — tally interesting codes across a directory of log files.
//!
//! This crate wires the pipeline layers from `logtally-core` and
//! `logtally-feeds` into a single [`run`] call so that the binary and the
//! integration harnesses drive exactly the same code.
//!
//! # Architecture
//!
//! ```text
//! list_inputs ──► fan_out ──► extract_all ──► tally ──► write_report
//!   directory     per file     merged stream
//! ```

pub mod cli;

use std::path::PathBuf;

use chrono::Local;
use logtally_core::aggregate::{report_rows, tally, AllowList};
use logtally_core::config::Settings;
use logtally_core::{export, normalizer, RunError};
use logtally_feeds::{fan_out, list_inputs, FileFailure};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Everything one run needs beyond the cancellation token.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input directory. Falls back to `settings.input_dir`.
    pub input_dir: Option<PathBuf>,
    pub settings: Settings,
    /// Also write every parsed record to this file.
    pub dump_records: Option<PathBuf>,
}

/// What a completed run did.
#[derive(Debug)]
pub struct RunSummary {
    pub files_seen: usize,
    pub files_read: usize,
    pub files_skipped: usize,
    pub failures: Vec<FileFailure>,
    pub orphans: usize,
    pub entries: usize,
    pub records: usize,
    pub discarded: usize,
    pub rows: usize,
    pub report_path: PathBuf,
}

/// Run the whole pipeline once and write the report.
///
/// Per-file failures do not fail the run; they are listed in
/// [`RunSummary::failures`].
pub async fn run(opts: RunOptions, cancel: CancellationToken) -> Result<RunSummary, RunError> {
    let settings = opts.settings;
    settings.validate()?;

    let dir = opts
        .input_dir
        .or_else(|| settings.input_dir.clone())
        .ok_or(RunError::NoInputDirectory)?;

    let listing = list_inputs(&dir, &settings.log_suffix).await?;
    info!(
        dir = %dir.display(),
        files = listing.accepted.len(),
        "found {} input files",
        listing.accepted.len()
    );

    let files_seen = listing.seen();
    let files_skipped = listing.skipped.len();
    let merged = match fan_out(listing.accepted, settings.concurrency, cancel).await {
        Ok(merged) => merged,
        // fan_out reports nothing but cancellation at run level.
        Err(_) => return Err(RunError::Cancelled),
    };
    if merged.orphans > 0 {
        warn!(orphans = merged.orphans, "dropped continuation lines with no preceding record");
    }

    let extraction = normalizer::extract_all(&merged.entries);
    info!(
        entries = merged.entries.len(),
        records = extraction.records.len(),
        discarded = extraction.discarded,
        "parsed records"
    );

    if let Some(path) = &opts.dump_records {
        export::write_record_dump(path, &extraction.records)?;
    }

    let tallies = tally(
        &extraction.records,
        &extraction.first_messages,
        &AllowList::builtin(),
    );
    let rows = report_rows(tallies);
    let report_path =
        export::write_report(&settings.output_dir, &Local::now(), settings.format, &rows)?;
    info!("Exported {} rows", rows.len());

    Ok(RunSummary {
        files_seen,
        files_read: merged.files_read,
        files_skipped,
        failures: merged.failures,
        orphans: merged.orphans,
        entries: merged.entries.len(),
        records: extraction.records.len(),
        discarded: extraction.discarded,
        rows: rows.len(),
        report_path,
    })
}

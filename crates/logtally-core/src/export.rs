//! Export — writes report rows and record dumps to disk.
//!
//! The CSV layout is a `Code,Message,Count` header followed by one
//! `code,"message",count` line per row. Messages are always quoted and any
//! embedded double quote is doubled so the file stays valid CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::error::RunError;
use crate::types::{Record, ReportFormat, ReportRow};

pub const CSV_HEADER: &str = "Code,Message,Count";

/// `export_<YYYY-MM-DD_HH-MM-SS>.<ext>`
pub fn report_file_name<Tz>(at: &DateTime<Tz>, format: ReportFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("export_{}.{}", at.format("%Y-%m-%d_%H-%M-%S"), format.extension())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn write_csv<W: Write>(mut w: W, rows: &[ReportRow]) -> io::Result<()> {
    writeln!(w, "{CSV_HEADER}")?;
    for row in rows {
        writeln!(w, "{},{},{}", row.code, quote(&row.message), row.count)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(mut w: W, rows: &[ReportRow]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut w, rows)?;
    writeln!(w)
}

/// Render `rows` in `format` to any writer.
pub fn render<W: Write>(w: W, format: ReportFormat, rows: &[ReportRow]) -> io::Result<()> {
    match format {
        ReportFormat::Csv => write_csv(w, rows),
        ReportFormat::Json => write_json(w, rows),
    }
}

/// Create `dir/<report_file_name>` fresh and write the report into it.
///
/// A failed write removes the partial file.
pub fn write_report<Tz>(
    dir: &Path,
    at: &DateTime<Tz>,
    format: ReportFormat,
    rows: &[ReportRow],
) -> Result<PathBuf, RunError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let path = dir.join(report_file_name(at, format));
    write_fresh(&path, |w| render(w, format, rows)).map_err(|e| match e {
        WriteFailure::Create(source) => RunError::CreateReport { path: path.clone(), source },
        WriteFailure::Write(source) => RunError::WriteReport { path: path.clone(), source },
    })?;
    tracing::info!(path = %path.display(), rows = rows.len(), %format, "report written");
    Ok(path)
}

/// Dump every record as a tab-joined line: date, source, kind, code, message.
///
/// Any failure is a [`RunError::DumpRecords`]; a partially written dump is
/// removed.
pub fn write_record_dump(path: &Path, records: &[Record]) -> Result<(), RunError> {
    write_fresh(path, |w| {
        for r in records {
            writeln!(w, "{}\t{}\t{}\t{}\t{}", r.date, r.source, r.kind, r.code, r.message)?;
        }
        Ok(())
    })
    .map_err(|e| RunError::DumpRecords {
        path: path.to_path_buf(),
        source: match e {
            WriteFailure::Create(source) | WriteFailure::Write(source) => source,
        },
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "record dump written");
    Ok(())
}

enum WriteFailure {
    Create(io::Error),
    Write(io::Error),
}

fn write_fresh<F>(path: &Path, body: F) -> Result<(), WriteFailure>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(WriteFailure::Create)?;
    let mut w = BufWriter::new(file);
    let result = body(&mut w).and_then(|()| w.flush());
    if let Err(e) = result {
        drop(w);
        if let Err(rm) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %rm, "could not remove partial file");
        }
        return Err(WriteFailure::Write(e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

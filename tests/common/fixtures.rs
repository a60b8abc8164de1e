//! Static log corpora and directory builders used across harnesses.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use logtally_core::config::Settings;
use logtally::RunOptions;

/// File A of the two-file scenario: one record with a continuation line.
pub const FILE_A: &str = "01/02/2023 10:00:00.000\tX\tINFO\t20042\tfirst msg\n extra text\n";

/// File B of the two-file scenario: a second record with the same code.
pub const FILE_B: &str = "01/02/2023 10:00:01.000\tX\tINFO\t20042\tsecond msg\n";

/// A realistic interlocking-style log with doubled tabs, track markers,
/// wrapped messages, codes both inside and outside the allow-list, and an
/// unstructured banner line.
pub const CORPUS_MIXED: &[&str] = &[
    "Logfile opened",
    "14/03/2024 06:12:44.120\tSTW1\tSTOERUNG\t20039\tWeiche 12 [Spur2] Endlage verloren",
    "    Ueberwachung ausgeloest",
    "",
    "14/03/2024 06:12:45.002\tSTW1\t\tINFO\t1001\tHeartbeat",
    "14/03/2024 06:13:01.777\tSTW2\tSTOERUNG\t2506\tSignal A3 dunkel",
    "14/03/2024 06:13:02.000\tSTW1\tSTOERUNG\t20039\tWeiche 12 erneut gestoert",
    "14/03/2024 06:14:00.000 banner without tabs",
    "\t",
    "14/03/2024 06:15:10.500\tSTW2\tWARN\t9007\tZugnummer \"4711\" unbekannt",
];

/// Create a temporary directory containing `files` as `(name, body)` pairs.
pub fn log_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    for (name, body) in files {
        std::fs::write(dir.path().join(name), body).expect("write fixture");
    }
    dir
}

/// Run options that read `input` and write the report into `output`.
pub fn options(input: &Path, output: &Path) -> RunOptions {
    RunOptions {
        input_dir: Some(input.to_path_buf()),
        settings: Settings {
            output_dir: output.to_path_buf(),
            ..Settings::defaults()
        },
        dump_records: None,
    }
}

/// The single report file written into `dir`.
pub fn only_report(dir: &Path) -> PathBuf {
    let reports: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read output dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("export_"))
        })
        .collect();
    assert_eq!(reports.len(), 1, "expected exactly one report, found {reports:?}");
    reports.into_iter().next().unwrap()
}

//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use logtally_core::config::Settings;
use logtally_core::ReportFormat;

use crate::RunOptions;

#[derive(Debug, Parser)]
#[command(
    name = "logtally",
    version,
    about = "Tally interesting codes across a directory of log files"
)]
pub struct Cli {
    /// Directory holding the *.log files. Defaults to `input_dir` from the config.
    pub dir: Option<PathBuf>,

    /// Read settings from this TOML file instead of ~/.config/logtally/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the report is written to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report format: csv or json.
    #[arg(short, long)]
    pub format: Option<ReportFormat>,

    /// Maximum number of files read at once.
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Also write every parsed record, tab separated, to this file.
    #[arg(long, value_name = "PATH")]
    pub dump_records: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins).
    #[arg(short, long)]
    pub verbose: bool,

    /// Append diagnostics to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn into_options(self, mut settings: Settings) -> RunOptions {
        if let Some(dir) = self.output_dir {
            settings.output_dir = dir;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(n) = self.concurrency {
            settings.concurrency = n;
        }
        RunOptions {
            input_dir: self.dir,
            settings,
            dump_records: self.dump_records,
        }
    }
}

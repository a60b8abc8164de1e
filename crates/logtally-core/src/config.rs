//! Configuration types for logtally.
//!
//! [`Settings::load`] layers the built-in defaults, an optional TOML file and
//! `LOGTALLY_*` environment variables. [`Settings::defaults`] returns the
//! built-in defaults without touching the filesystem or the environment.
//!
//! The set of reported codes is deliberately absent: it is fixed in
//! [`crate::aggregate::INTERESTING_CODES`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::RunError;
use crate::types::ReportFormat;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
output_dir  = "."
log_suffix  = ".log"
concurrency = 8
format      = "csv"
"#;

const ENV_PREFIX: &str = "LOGTALLY";

/// Upper bound accepted for [`Settings::concurrency`].
pub const MAX_CONCURRENCY: usize = 1024;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Directory scanned when none is given on the command line.
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    /// Where the report file is created.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File-name suffix that marks an input file.
    #[serde(default = "default_log_suffix")]
    pub log_suffix: String,
    /// Maximum number of files read at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub format: ReportFormat,
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_log_suffix() -> String { ".log".to_string() }
fn default_concurrency() -> usize { 8 }

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Settings {
    /// Load settings. `explicit` must exist when given; otherwise the user
    /// config file is read if present.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let file = match explicit {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.concurrency == 0 {
            return Err(RunError::Config("concurrency must be at least 1".into()));
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(RunError::Config(format!(
                "concurrency must be at most {MAX_CONCURRENCY}, got {}",
                self.concurrency
            )));
        }
        if self.log_suffix.is_empty() {
            return Err(RunError::Config("log_suffix must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logtally")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

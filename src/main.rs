use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use logtally::cli::Cli;
use logtally_core::config::Settings;
use tokio_util::sync::CancellationToken;

const EXIT_CONFIG: u8 = 5;
const EXIT_INTERNAL: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("logtally: cannot set up logging: {e:#}");
        return ExitCode::from(EXIT_INTERNAL);
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "cannot load configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "cannot start runtime");
            return ExitCode::from(EXIT_INTERNAL);
        }
    };

    let opts = cli.into_options(settings);
    let started = Instant::now();
    let cancel = CancellationToken::new();

    let result = runtime.block_on(async move {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling run");
                on_interrupt.cancel();
            }
        });
        logtally::run(opts, cancel).await
    });

    match result {
        Ok(summary) => {
            for failure in &summary.failures {
                tracing::warn!(
                    file = %failure.path.display(),
                    error = %failure.error,
                    "file was not included"
                );
            }
            tracing::info!(
                files = summary.files_read,
                skipped = summary.files_skipped,
                failed = summary.failures.len(),
                records = summary.records,
                rows = summary.rows,
                report = %summary.report_path.display(),
                "done"
            );
            tracing::debug!("Time taken: {:?}", started.elapsed());
            println!("{}", summary.report_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.exit_code();
            tracing::error!(error = %format!("{:#}", anyhow::Error::from(e)), "run failed");
            ExitCode::from(code)
        }
    }
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }
    Ok(())
}

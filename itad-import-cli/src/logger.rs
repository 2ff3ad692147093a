//! Logger setup for `--quiet`, `--verbose` and `--logfile`.
//!
//! User-facing output goes through `log::info!`, so the level filter is what
//! silences normal output in quiet mode.

use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::CliError;

pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("itad_import", level);

    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        });
    }

    match logfile {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| {
                CliError::config(format!("Cannot open log file {}: {}", path.display(), e))
            })?;
            builder.target(Target::Pipe(Box::new(strip_ansi_escapes::Writer::new(file))));
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Logger already initialized: {}", e)))
}

/// Print an empty line through the logger so it honors `--quiet`/`--logfile`.
pub(crate) fn log_blank() {
    log::info!("");
}

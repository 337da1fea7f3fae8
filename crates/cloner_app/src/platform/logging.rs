//! Logger setup for the command-line front end.
//!
//! Terminal output goes to stderr so `--print` keeps stdout clean.

use std::path::PathBuf;

use engine_logging::LogDestination;
use log::LevelFilter;

const LOG_FILENAME: &str = "cloner.log";

/// Warnings only on the terminal; with `to_file`, full info-level logs also go to `./cloner.log`.
pub fn init_logging(to_file: bool) {
    if to_file {
        engine_logging::initialize(
            LogDestination::Both(PathBuf::from(LOG_FILENAME)),
            LevelFilter::Info,
        );
    } else {
        engine_logging::initialize(LogDestination::Terminal, LevelFilter::Warn);
    }
}

//! Logging setup.
//!
//! Library code logs through the `log` facade. The binary installs
//! [`StderrLogger`], which writes every record to stderr with a coloured
//! level tag so it never mixes with emitted IR on stdout.

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// `--quiet` wins over `-v`; each `-v` raises the level by one step.
pub fn effective_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }

    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        StderrLogger { level }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = match record.level() {
            Level::Error => "error".bright_red().bold(),
            Level::Warn => "warning".bright_yellow().bold(),
            Level::Info => "info".bright_green().bold(),
            Level::Debug => "debug".bright_blue(),
            Level::Trace => "trace".dimmed(),
        };

        eprintln!("{}: {}", tag, record.args());
    }

    fn flush(&self) {}
}

/// Installs the stderr logger. Only the first call has any effect.
pub fn init(verbose: u8, quiet: bool) {
    let level = effective_level(verbose, quiet);
    if log::set_boxed_logger(Box::new(StderrLogger::new(level))).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level(0, false), LevelFilter::Warn);
        assert_eq!(effective_level(1, false), LevelFilter::Info);
        assert_eq!(effective_level(2, false), LevelFilter::Debug);
        assert_eq!(effective_level(5, false), LevelFilter::Trace);
        assert_eq!(effective_level(3, true), LevelFilter::Error);
    }

    #[test]
    fn test_logger_filters_by_level() {
        let logger = StderrLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();

        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }
}

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

static LOGGER: SimpleLogger = SimpleLogger;

/// Writes every enabled record to stderr as `[target] [LEVEL] message`.
pub struct SimpleLogger;

impl SimpleLogger {
    pub fn init() -> Result<(), SetLoggerError> {
        SimpleLogger::init_with_level(DEFAULT_LOG_LEVEL)
    }

    pub fn init_with_level(max_log_level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(max_log_level);
        Ok(())
    }

    /// The level selected by `verbosity` repetitions of a `-v` flag.
    pub fn level_for_verbosity(verbosity: usize) -> LevelFilter {
        match verbosity {
            0 => DEFAULT_LOG_LEVEL,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let stderr = ::std::io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "[{}] [{}] {}", record.target(), record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = ::std::io::stderr().flush();
    }
}

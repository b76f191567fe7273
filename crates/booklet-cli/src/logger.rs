use chrono::Local;
use log::{LevelFilter, Metadata, Record};

/// Writes log records to stderr with a local timestamp
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Map `-v` occurrences to a level; `quiet` wins over any `-v`
    pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error;
        }
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{} {:<5} [{}] {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(ConsoleLogger::level_for(0, false), LevelFilter::Warn);
        assert_eq!(ConsoleLogger::level_for(1, false), LevelFilter::Info);
        assert_eq!(ConsoleLogger::level_for(2, false), LevelFilter::Debug);
        assert_eq!(ConsoleLogger::level_for(3, false), LevelFilter::Trace);
        assert_eq!(ConsoleLogger::level_for(u8::MAX, false), LevelFilter::Trace);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(ConsoleLogger::level_for(0, true), LevelFilter::Error);
        assert_eq!(ConsoleLogger::level_for(3, true), LevelFilter::Error);
    }

    #[test]
    fn test_enabled_respects_level() {
        let logger = ConsoleLogger::new(LevelFilter::Info);
        let at = |level| Metadata::builder().level(level).target("booklet").build();

        assert!(logger.enabled(&at(log::Level::Error)));
        assert!(logger.enabled(&at(log::Level::Info)));
        assert!(!logger.enabled(&at(log::Level::Debug)));
    }
}

use chrono::{DateTime, Local};
use log::{Level, Metadata, Record};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// In-memory logger backing the log panel
#[derive(Clone)]
pub struct AppLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    max_entries: usize,
    level: Level,
}

impl AppLogger {
    pub fn new(max_entries: usize) -> Self {
        let level = if cfg!(debug_assertions) {
            Level::Debug
        } else {
            Level::Info
        };
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            max_entries,
            level,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn latest_message(&self) -> Option<String> {
        self.lock().last().map(|entry| entry.message.clone())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panic while logging leaves the entries usable
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let entry = LogEntry {
                timestamp: Local::now(),
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            };

            let mut entries = self.lock();
            entries.push(entry);

            // Keep only the most recent entries
            if entries.len() > self.max_entries {
                let excess = entries.len() - self.max_entries;
                entries.drain(0..excess);
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn record(logger: &AppLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("img2pdf_core")
                .args(format_args!("{}", message))
                .build(),
        );
    }

    #[test]
    fn test_keeps_most_recent_entries() {
        let logger = AppLogger::new(2);
        record(&logger, Level::Info, "one");
        record(&logger, Level::Info, "two");
        record(&logger, Level::Warn, "three");

        let entries = logger.get_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "two");
        assert_eq!(logger.latest_message().as_deref(), Some("three"));

        logger.clear();
        assert!(logger.latest_message().is_none());
    }

    #[test]
    fn test_trace_is_filtered() {
        let logger = AppLogger::new(10);
        record(&logger, Level::Trace, "noise");
        assert!(logger.get_entries().is_empty());
    }
}

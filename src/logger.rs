// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::Local;
use log::{Metadata, Record, SetLoggerError};

pub use log::Level;

/// A minimal logger writing timestamped lines to stderr, leaving stdout to
/// the program's own output.
pub struct Logger {
    label: Option<&'static str>,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: None,
            level: Level::Warn,
        }
    }

    /// name shown in place of the module path for info and above
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))
            .map(|()| log::set_max_level(level.to_level_filter()))
    }

    fn format(&self, record: &Record) -> String {
        let target = match self.label {
            Some(label) if record.level() < Level::Debug => label,
            _ => record.target(),
        };
        format!(
            "{} {:<5} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            target,
            record.args()
        )
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn level_filter() {
        let logger = Logger::new().level(Level::Info);
        assert!(logger.enabled(&Metadata::builder().level(Level::Warn).build()));
        assert!(logger.enabled(&Metadata::builder().level(Level::Info).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }

    #[test]
    fn label_replaces_target() {
        let logger = Logger::new().label("perfgraph");
        let line = logger.format(
            &Record::builder()
                .args(format_args!("Plot saved"))
                .level(Level::Info)
                .target("perfgraph::render")
                .build(),
        );
        assert!(line.ends_with("INFO  [perfgraph] Plot saved"), "{}", line);

        let line = logger.format(
            &Record::builder()
                .args(format_args!("panel 0"))
                .level(Level::Trace)
                .target("perfgraph::render")
                .build(),
        );
        assert!(line.ends_with("TRACE [perfgraph::render] panel 0"), "{}", line);
    }
}

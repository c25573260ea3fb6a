use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// A `log` backend that appends every record to a file and optionally echoes
/// it, coloured by level, to the console.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: PathBuf,
    level: LevelFilter,
    to_console: bool,
    info_color: Color,
}

impl Logger {
    /// Creates a new `Logger` instance.
    ///
    /// # Parameters
    /// - `log_dir`: Path to the directory where the log file should be created.
    /// - `name`: Name of the log file, without extension.
    ///
    /// # Returns
    /// A new `Logger` instance writing to `<log_dir>/<name>.log`. The file is
    /// truncated if it already exists.
    pub fn new(log_dir: &Path, name: &str) -> Result<Self, LoggerError> {
        if !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }

        let sanitized = name.replace([':', '/', '\\'], "_");
        let log_file = log_dir.join(format!("{}.log", sanitized));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file,
            level: LevelFilter::Info,
            to_console: true,
            info_color: Color::Cyan,
        })
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_console(mut self, to_console: bool) -> Self {
        self.to_console = to_console;
        self
    }

    pub fn with_info_color(mut self, color: Color) -> Self {
        self.info_color = color;
        self
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Installs this logger as the global `log` backend.
    pub fn init(self) -> Result<(), LoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "[{}] [{}] {}: {}\n",
            record.level(),
            timestamp,
            record.target(),
            record.args()
        )
    }

    fn colored(&self, level: Level, line: &str) -> String {
        match level {
            Level::Error => format!("\x1b[91m{}\x1b[0m", line), // Bright Red
            Level::Warn => format!("\x1b[93m{}\x1b[0m", line),  // Bright Yellow
            Level::Info => format!("{}{}\x1b[0m", self.info_color.to_ansi_code(), line),
            Level::Debug | Level::Trace => {
                format!("{}{}\x1b[0m", Color::White.to_ansi_code(), line)
            }
        }
    }

    fn write(&self, level: Level, line: &str) -> Result<(), LoggerError> {
        if self.to_console {
            print!("{}", self.colored(level, line));
            io::stdout().flush()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format(record);
        if let Err(e) = self.write(record.level(), &line) {
            eprintln!("Failed to write log record: {}", e);
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid Path: {0}")]
    InvalidPath(String),
    #[error("a global logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record<'a>(level: Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder()
            .level(level)
            .target("flight_map::reconciler")
            .args(args)
            .build()
    }

    #[test]
    fn test_logger_creation_and_logging() {
        let log_dir = tempfile::tempdir().expect("Failed to create test directory");

        let logger = Logger::new(log_dir.path(), "cockpit")
            .expect("Failed to create logger")
            .with_console(false);

        logger.log(&record(Level::Info, format_args!("Created map panel map-1")));
        logger.log(&record(Level::Warn, format_args!("skipping flight entry 1")));

        let log_contents = fs::read_to_string(logger.log_file()).expect("Failed to read log file");

        assert!(log_contents.contains("[INFO]"), "INFO level missing in log");
        assert!(log_contents.contains("[WARN]"), "WARN level missing in log");
        assert!(log_contents.contains("Created map panel map-1"));
        assert!(log_contents.contains("flight_map::reconciler"));
    }

    #[test]
    fn test_level_filter() {
        let log_dir = tempfile::tempdir().expect("Failed to create test directory");

        let logger = Logger::new(log_dir.path(), "cockpit")
            .expect("Failed to create logger")
            .with_console(false)
            .with_level(LevelFilter::Warn);

        logger.log(&record(Level::Info, format_args!("not written")));
        logger.log(&record(Level::Error, format_args!("written")));

        let log_contents = fs::read_to_string(logger.log_file()).expect("Failed to read log file");
        assert!(!log_contents.contains("not written"));
        assert!(log_contents.contains("[ERROR]"));
    }

    #[test]
    fn test_name_is_sanitized() {
        let log_dir = tempfile::tempdir().expect("Failed to create test directory");
        let logger = Logger::new(log_dir.path(), "127.0.0.1:9090").expect("Failed to create logger");

        assert_eq!(
            logger.log_file().file_name().and_then(|n| n.to_str()),
            Some("127.0.0.1_9090.log")
        );
    }

    #[test]
    fn test_invalid_path() {
        let invalid_path = Path::new("/invalid/path");

        let result = Logger::new(invalid_path, "cockpit");
        assert!(matches!(result, Err(LoggerError::InvalidPath(_))));
    }
}

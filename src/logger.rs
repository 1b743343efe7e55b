use anyhow::Context;
use chrono::{DateTime, Local};
use log::Level;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_DIR: &str = "logs";

const ENTRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Append-only log sink for one collection session.
///
/// Each entry is written to the session file as
/// `<timestamp> — <LEVEL> — <message>` and mirrored to the `log` facade.
pub struct SessionLogger {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl SessionLogger {
    /// Opens `<log_dir>/<user_name>_<YYYYMMDD_HHMMSS>.log`, truncating any
    /// existing file of the same name.
    pub fn create(log_dir: impl AsRef<Path>, user_name: &str) -> anyhow::Result<Self> {
        Self::create_at(log_dir, user_name, Local::now())
    }

    /// Same as [`SessionLogger::create`] with the file name timestamp fixed.
    pub fn create_at(
        log_dir: impl AsRef<Path>,
        user_name: &str,
        started: DateTime<Local>,
    ) -> anyhow::Result<Self> {
        let log_dir = log_dir.as_ref();
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;
        let path = log_dir.join(format!(
            "{}_{}.log",
            user_name,
            started.format(FILE_TIMESTAMP_FORMAT)
        ));
        let file =
            File::create(&path).with_context(|| format!("Failed to open log file {:?}", path))?;
        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&mut self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warn(&mut self, message: &str) {
        self.log(Level::Warn, message);
    }

    pub fn error(&mut self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn log(&mut self, level: Level, message: &str) {
        log::log!(level, "{}", message);
        let line = format_entry(&Local::now().format(ENTRY_TIMESTAMP_FORMAT), level, message);
        // file errors only reach the console
        if let Err(err) = writeln!(self.writer, "{}", line) {
            log::warn!("Failed to write to session log {:?}: {}", self.path, err);
        }
    }
}

fn format_entry(timestamp: &impl std::fmt::Display, level: Level, message: &str) -> String {
    format!("{} — {} — {}", timestamp, level_name(level), message)
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn creates_log_dir_and_user_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let logger = SessionLogger::create(&log_dir, "alice").unwrap();

        assert!(log_dir.is_dir());
        let name = logger.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("alice_"));
        assert!(name.ends_with(".log"));
        // alice_YYYYMMDD_HHMMSS.log
        assert_eq!(name.len(), "alice_".len() + 15 + ".log".len());
    }

    #[test]
    fn entries_carry_level_and_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = SessionLogger::create(dir.path(), "bob").unwrap();
        logger.info("Starting");
        logger.warn("Odd");
        logger.error("Failed to read frame.");

        let contents = std::fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" — INFO — Starting"));
        assert!(lines[1].ends_with(" — WARNING — Odd"));
        assert!(lines[2].ends_with(" — ERROR — Failed to read frame."));
    }

    #[test]
    fn reopening_same_name_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let started = Local.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
        let path = dir.path().join("alice_20231001_120000.log");
        std::fs::write(&path, "stale line\nanother stale line\n").unwrap();

        let mut logger = SessionLogger::create_at(dir.path(), "alice", started).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        logger.info("fresh");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(!contents.contains("stale"));
    }

    #[test]
    fn entry_format() {
        let line = format_entry(&"2023-10-01 12:00:00,000", Level::Info, "hello");
        assert_eq!(line, "2023-10-01 12:00:00,000 — INFO — hello");
        let line = format_entry(&"2023-10-01 12:00:00,000", Level::Warn, "odd");
        assert_eq!(line, "2023-10-01 12:00:00,000 — WARNING — odd");
    }
}

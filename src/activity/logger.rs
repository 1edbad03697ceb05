//! Append-only activity log
//!
//! Keeps the session's entries in memory and mirrors each one to a UTF-8
//! text sink, one line per event. Recording never fails the caller: when the
//! sink cannot be written the in-memory entry still lands, and the sink
//! failure is noted once.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::models::Profile;

use super::entry::LogEntry;

/// Session activity log with an optional durable sink
pub struct ActivityLog {
    /// Path to the sink file, if any
    sink: Option<PathBuf>,
    /// Entries in the order they were recorded (oldest first)
    entries: RwLock<Vec<LogEntry>>,
    /// Set after the first sink failure so it is reported only once
    sink_failed: AtomicBool,
}

impl ActivityLog {
    /// A log that only keeps entries in memory
    pub fn in_memory() -> Self {
        Self {
            sink: None,
            entries: RwLock::new(Vec::new()),
            sink_failed: AtomicBool::new(false),
        }
    }

    /// Open a log backed by `path`, loading the history already in it
    ///
    /// Unreadable history is skipped with a warning; the log still opens.
    pub fn open(path: PathBuf) -> Self {
        let history = match read_history(&path) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "could not read activity history");
                Vec::new()
            }
        };

        Self {
            sink: Some(path),
            entries: RwLock::new(history),
            sink_failed: AtomicBool::new(false),
        }
    }

    /// Record an event, optionally tied to a profile
    pub fn record(&self, message: impl Into<String>, profile: Option<&Profile>) -> LogEntry {
        let entry = LogEntry::new(message, profile);

        if let Some(path) = &self.sink {
            if let Err(e) = append_line(path, &entry.to_line()) {
                self.note_sink_failure(path, &e);
            }
        }

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        entry
    }

    /// All entries, newest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.collect(|_| true)
    }

    /// Entries that concern `profile`, newest first
    pub fn query(&self, profile: &Profile) -> Vec<LogEntry> {
        self.collect(|e| e.concerns(profile))
    }

    /// Entries not tied to any profile, newest first
    pub fn general(&self) -> Vec<LogEntry> {
        self.collect(|e| e.profile_name.is_none() && e.profile_id.is_none())
    }

    /// Get the path to the sink file
    pub fn path(&self) -> Option<&Path> {
        self.sink.as_deref()
    }

    fn collect<F>(&self, keep: F) -> Vec<LogEntry>
    where
        F: Fn(&LogEntry) -> bool,
    {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut selected: Vec<LogEntry> = entries.iter().rev().filter(|e| keep(e)).cloned().collect();
        // Stable sort keeps later-recorded entries first within the same instant
        selected.sort_by(|a, b| b.time.cmp(&a.time));
        selected
    }

    fn note_sink_failure(&self, path: &Path, error: &std::io::Error) {
        if self.sink_failed.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::warn!(file = %path.display(), error = %error, "activity log sink unavailable");
        let notice = LogEntry::new(
            format!("Activity log file {} could not be written: {}", path.display(), error),
            None,
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()
}

fn read_history(path: &Path) -> std::io::Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match LogEntry::parse_line(&line) {
            Some(entry) => entries.push(entry),
            None => tracing::debug!(line = %line, "skipping unparseable activity line"),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_log() -> (ActivityLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = ActivityLog::open(temp_dir.path().join("activity.log"));
        (log, temp_dir)
    }

    fn profile(name: &str) -> Profile {
        Profile::new(name, "/src".into(), "/bk".into())
    }

    #[test]
    fn test_record_appends_line() {
        let (log, temp) = create_test_log();
        let docs = profile("Docs");

        log.record("Created profile", Some(&docs));
        log.record("Settings saved", None);

        let contents = fs::read_to_string(temp.path().join("activity.log")).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" [Docs] Created profile"));
        assert!(lines[1].ends_with(" Settings saved"));
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_query_filters_and_orders_newest_first() {
        let (log, _temp) = create_test_log();
        let docs = profile("Docs");
        let photos = profile("Photos");

        log.record("first", Some(&docs));
        log.record("other", Some(&photos));
        log.record("second", Some(&docs));

        let messages: Vec<_> = log.query(&docs).into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn test_history_survives_reopen() {
        let (log, temp) = create_test_log();
        let docs = profile("Docs");
        log.record("Created snapshot", Some(&docs));

        let reopened = ActivityLog::open(temp.path().join("activity.log"));
        let entries = reopened.query(&docs);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Created snapshot");
    }

    #[test]
    fn test_sink_failure_does_not_fail_record() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let log = ActivityLog::open(temp.path().to_path_buf());

        log.record("one", None);
        log.record("two", None);

        let messages: Vec<_> = log.entries().into_iter().map(|e| e.message).collect();
        assert!(messages.contains(&"one".to_string()));
        assert!(messages.contains(&"two".to_string()));
        let notices = messages.iter().filter(|m| m.contains("could not be written")).count();
        assert_eq!(notices, 1);
    }

    #[test]
    fn test_deleted_profile_reference_is_harmless() {
        let log = ActivityLog::in_memory();
        let docs = profile("Docs");
        log.record("Deleted profile", Some(&docs));
        drop(docs);

        assert_eq!(log.general().len(), 0);
        assert_eq!(log.entries().len(), 1);
    }
}

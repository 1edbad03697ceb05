//! Activity log entries
//!
//! One entry per engine or registry event. Entries are never mutated once
//! recorded.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::{Profile, ProfileId};

/// strftime pattern used at the start of every sink line
pub const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single activity log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the event happened
    pub time: DateTime<Local>,

    /// Human-readable description
    pub message: String,

    /// Profile the event concerns. Only set for entries recorded in this
    /// session; entries loaded from the sink carry just the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,

    /// Name of the profile at the time of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(message: impl Into<String>, profile: Option<&Profile>) -> Self {
        Self {
            time: Local::now(),
            message: message.into(),
            profile_id: profile.map(|p| p.id),
            profile_name: profile.map(|p| p.name.clone()),
        }
    }

    /// Whether this entry refers to `profile`
    ///
    /// The id decides when present; otherwise the recorded name is compared
    /// case-insensitively. References are weak, so entries of deleted
    /// profiles simply never match.
    pub fn concerns(&self, profile: &Profile) -> bool {
        match (self.profile_id, &self.profile_name) {
            (Some(id), _) => id == profile.id,
            (None, Some(name)) => Profile::normalize_name(name) == Profile::normalize_name(&profile.name),
            (None, None) => false,
        }
    }

    /// Render as one sink line (without the trailing newline)
    ///
    /// `\` and `]` in the profile name are escaped with a backslash.
    pub fn to_line(&self) -> String {
        let message = self.message.replace(['\r', '\n'], " ");
        match &self.profile_name {
            Some(name) => format!(
                "{} [{}] {}",
                self.time.format(LINE_TIME_FORMAT),
                escape_tag(name),
                message
            ),
            None => format!("{} {}", self.time.format(LINE_TIME_FORMAT), message),
        }
    }

    /// Parse a sink line written by `to_line`
    pub fn parse_line(line: &str) -> Option<Self> {
        let stamp = line.get(..19)?;
        let rest = line.get(19..)?.strip_prefix(' ')?;
        let naive = NaiveDateTime::parse_from_str(stamp, LINE_TIME_FORMAT).ok()?;
        let time = Local.from_local_datetime(&naive).earliest()?;

        let (profile_name, message) = match split_tag(rest) {
            Some((name, message)) => (Some(name), message),
            None => (None, rest),
        };

        Some(Self {
            time,
            message: message.to_string(),
            profile_id: None,
            profile_name,
        })
    }
}

fn escape_tag(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\r' | '\n' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Split `[name] message` at the first unescaped `]`
fn split_tag(rest: &str) -> Option<(String, &str)> {
    let body = rest.strip_prefix('[')?;
    let mut name = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => name.push(chars.next()?.1),
            ']' => return body[i + 1..].strip_prefix(' ').map(|message| (name, message)),
            _ => name.push(c),
        }
    }
    None
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_round_trip_with_profile() {
        let profile = Profile::new("Docs", "/src".into(), "/bk".into());
        let entry = LogEntry::new("Created snapshot 2025-01-01 10:00:00", Some(&profile));

        let parsed = LogEntry::parse_line(&entry.to_line()).unwrap();
        assert_eq!(parsed.message, "Created snapshot 2025-01-01 10:00:00");
        assert_eq!(parsed.profile_name.as_deref(), Some("Docs"));
        assert_eq!(parsed.profile_id, None);
        assert_eq!(parsed.time.timestamp(), entry.time.timestamp());
    }

    #[test]
    fn test_bracket_in_profile_name_round_trips() {
        for name in ["Team] Docs", "a\\b", "x]"] {
            let profile = Profile::new(name, "/src".into(), "/bk".into());
            let entry = LogEntry::new("Deleted snapshot 'x] y'", Some(&profile));

            let parsed = LogEntry::parse_line(&entry.to_line()).unwrap();
            assert_eq!(parsed.profile_name.as_deref(), Some(name));
            assert_eq!(parsed.message, "Deleted snapshot 'x] y'");
        }
    }

    #[test]
    fn test_general_line_has_no_tag() {
        let entry = LogEntry::new("Settings saved", None);
        let line = entry.to_line();
        assert_eq!(&line[19..], " Settings saved");

        let parsed = LogEntry::parse_line(&line).unwrap();
        assert!(parsed.profile_name.is_none());
    }

    #[test]
    fn test_message_newlines_are_flattened() {
        let entry = LogEntry::new("first\nsecond", None);
        assert!(!entry.to_line().contains('\n'));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(LogEntry::parse_line("").is_none());
        assert!(LogEntry::parse_line("not a log line at all").is_none());
    }

    #[test]
    fn test_concerns() {
        let profile = Profile::new("Docs", "/src".into(), "/bk".into());
        let other = Profile::new("Photos", "/p".into(), "/q".into());
        let entry = LogEntry::new("x", Some(&profile));
        assert!(entry.concerns(&profile));
        assert!(!entry.concerns(&other));

        let loaded = LogEntry::parse_line("2025-01-01 10:00:00 [docs] Restored").unwrap();
        assert!(loaded.concerns(&profile));
        assert!(!LogEntry::new("general", None).concerns(&profile));
    }
}

//! Snapshot model
//!
//! A snapshot is one full copy of a profile's source directory, stored as a
//! folder under the profile's backup directory.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProfileId;

/// strftime pattern for snapshot folder names (sortable, filesystem-safe)
pub const FOLDER_NAME_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// strftime pattern for default display names
pub const DISPLAY_NAME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name of the per-snapshot metadata side-file used by the scan backend
pub const METADATA_FILE_NAME: &str = ".backvault-meta.json";

/// A point-in-time backup of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Owning profile
    pub profile_id: ProfileId,

    /// Directory name under the profile's backup path; never reused
    pub folder_name: String,

    /// User-facing label
    pub display_name: String,

    /// When the snapshot was taken
    pub created: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot record for a capture taken at `now`
    pub fn taken_at(profile_id: ProfileId, now: DateTime<Local>) -> Self {
        Self {
            profile_id,
            folder_name: folder_name_for(now),
            display_name: now.format(DISPLAY_NAME_FORMAT).to_string(),
            created: now.with_timezone(&Utc),
        }
    }

    /// Newest-first ordering: `created` descending, then `folder_name` descending
    pub fn cmp_newest_first(a: &Snapshot, b: &Snapshot) -> std::cmp::Ordering {
        b.created
            .cmp(&a.created)
            .then_with(|| b.folder_name.cmp(&a.folder_name))
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name == self.folder_name {
            write!(f, "{}", self.folder_name)
        } else {
            write!(f, "{} [{}]", self.display_name, self.folder_name)
        }
    }
}

/// Folder name for a capture taken at `now`
pub fn folder_name_for(now: DateTime<Local>) -> String {
    now.format(FOLDER_NAME_FORMAT).to_string()
}

/// Parse the timestamp encoded at the start of a folder name
///
/// Accepts `YYYY-MM-DD_HHMMSS` optionally followed by anything (a ` (n)`
/// collision suffix, for instance). The folder name is read as local time.
pub fn parse_folder_timestamp(folder_name: &str) -> Option<DateTime<Utc>> {
    let stamp = folder_name.get(..17)?;
    let naive = NaiveDateTime::parse_from_str(stamp, FOLDER_NAME_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Contents of the scan backend's per-snapshot side-file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotMetadata {
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).earliest().unwrap()
    }

    #[test]
    fn test_taken_at_names() {
        let snapshot = Snapshot::taken_at(ProfileId::new(), local(2025, 3, 9, 14, 5, 7));
        assert_eq!(snapshot.folder_name, "2025-03-09_140507");
        assert_eq!(snapshot.display_name, "2025-03-09 14:05:07");
    }

    #[test]
    fn test_parse_folder_timestamp() {
        let parsed = parse_folder_timestamp("2025-03-09_140507").unwrap();
        let back = parsed.with_timezone(&Local);
        assert_eq!(back.year(), 2025);
        assert_eq!(back.day(), 9);
        assert_eq!(back.hour(), 14);
        assert_eq!(back.second(), 7);

        assert!(parse_folder_timestamp("2025-03-09_140507 (2)").is_some());
        assert!(parse_folder_timestamp("holiday photos").is_none());
        assert!(parse_folder_timestamp("2025-13-09_140507").is_none());
    }

    #[test]
    fn test_newest_first_ordering() {
        let profile_id = ProfileId::new();
        let older = Snapshot::taken_at(profile_id, local(2025, 1, 1, 0, 0, 0));
        let newer = Snapshot::taken_at(profile_id, local(2025, 1, 2, 0, 0, 0));
        let mut tie = newer.clone();
        tie.folder_name = "2025-01-02_000000 (1)".into();

        let mut list = vec![older.clone(), newer.clone(), tie.clone()];
        list.sort_by(Snapshot::cmp_newest_first);
        assert_eq!(list, vec![tie, newer, older]);
    }

    #[test]
    fn test_metadata_field_names() {
        let meta = SnapshotMetadata {
            display_name: "Before upgrade".into(),
            created: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"DisplayName":"Before upgrade"}"#);
    }
}

//! Snapshot display formatting

use chrono::Local;

use crate::models::Snapshot;

use super::profile::column_width;

/// Format a profile's snapshots as a table, newest first as given
pub fn format_snapshot_list(snapshots: &[Snapshot]) -> String {
    if snapshots.is_empty() {
        return "No snapshots found.".to_string();
    }

    let name_width = column_width(snapshots.iter().map(|s| s.display_name.as_str()), 4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<19}  {:<name_width$}  {}\n",
        "Created", "Name", "Folder",
    ));
    output.push_str(&format!("{:-<19}  {:-<name_width$}  {:-<6}\n", "", "", ""));

    for snapshot in snapshots {
        output.push_str(&format!(
            "{:<19}  {:<name_width$}  {}\n",
            snapshot
                .created
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            snapshot.display_name,
            snapshot.folder_name,
        ));
    }

    output.push_str(&format!("\n{} snapshot(s)\n", snapshots.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileId;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_table() {
        let now = Local.with_ymd_and_hms(2025, 5, 1, 8, 30, 0).earliest().unwrap();
        let mut snapshot = Snapshot::taken_at(ProfileId::new(), now);
        snapshot.display_name = "Before upgrade".into();

        let output = format_snapshot_list(&[snapshot]);
        assert!(output.contains("2025-05-01 08:30:00"));
        assert!(output.contains("Before upgrade"));
        assert!(output.contains("2025-05-01_083000"));
        assert!(output.ends_with("1 snapshot(s)\n"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_snapshot_list(&[]), "No snapshots found.");
    }
}

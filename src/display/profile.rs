//! Profile display formatting
//!
//! Formats profiles for terminal output in table and detail views.

use crate::models::Profile;

/// Format a list of profiles as a table
pub fn format_profile_list(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No profiles found.\n\nRun 'backvault profile add' to create one.".to_string();
    }

    let name_width = column_width(profiles.iter().map(|p| p.name.as_str()), 4);
    let source_width = column_width(
        profiles.iter().map(|p| p.source_path.to_string_lossy()),
        6,
    );

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<source_width$}  {}\n",
        "ID",
        "Name",
        "Source",
        "Backup",
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<source_width$}  {:-<6}\n",
        "", "", "", "",
    ));

    for profile in profiles {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<source_width$}  {}\n",
            profile.id.to_string(),
            profile.name,
            profile.source_path.display().to_string(),
            profile.backup_path.display(),
        ));
    }

    output
}

/// Format a single profile's details
pub fn format_profile_details(profile: &Profile, snapshot_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Profile: {}\n", profile.name));
    output.push_str(&format!("  ID:         {}\n", profile.id));
    output.push_str(&format!("  Source:     {}\n", profile.source_path.display()));
    output.push_str(&format!("  Backup:     {}\n", profile.backup_path.display()));
    output.push_str(&format!("  Snapshots:  {}\n", snapshot_count));
    output.push_str(&format!(
        "  Created:    {}\n",
        profile.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

/// Width of a text column: the longest value, at least `min`
pub(crate) fn column_width<I, S>(values: I, min: usize) -> usize
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    values
        .map(|v| v.as_ref().chars().count())
        .max()
        .unwrap_or(min)
        .max(min)
}

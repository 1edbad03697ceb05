//! Snapshot folder naming
//!
//! Validation of user-chosen names and ` (n)` collision suffixes for the
//! scan backend, where the display name is also the folder name.

use crate::error::ValidationError;

/// Characters that are not portable in folder names
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Check a proposed snapshot name and return it trimmed
pub fn validate_snapshot_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyField("snapshot name"));
    }

    // Covers "." and ".." as well as hidden names that would clash with the side-file
    let invalid = name.starts_with('.')
        || name.chars().any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c));
    if invalid {
        return Err(ValidationError::InvalidSnapshotName(name.to_string()));
    }

    Ok(name.to_string())
}

/// `desired`, or `desired (n)` with the smallest `n` not used by a sibling
///
/// Siblings are compared the way the platform's default filesystem compares
/// names.
pub fn resolve_unique_name<S: AsRef<str>>(desired: &str, siblings: &[S]) -> String {
    let taken = |candidate: &str| siblings.iter().any(|s| same_name(s.as_ref(), candidate));

    if !taken(desired) {
        return desired.to_string();
    }

    let mut n = 1u32;
    loop {
        let candidate = format!("{} ({})", desired, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(any(windows, target_os = "macos"))]
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(not(any(windows, target_os = "macos")))]
fn same_name(a: &str, b: &str) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims() {
        assert_eq!(validate_snapshot_name("  Before upgrade ").unwrap(), "Before upgrade");
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        assert_eq!(
            validate_snapshot_name("   "),
            Err(ValidationError::EmptyField("snapshot name"))
        );
        for bad in ["..", ".", ".hidden", "a/b", "a\\b", "what?", "tab\there"] {
            assert!(
                matches!(validate_snapshot_name(bad), Err(ValidationError::InvalidSnapshotName(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_unique_name_unchanged_when_free() {
        let siblings = ["2025-01-01_000000"];
        assert_eq!(resolve_unique_name("Release", &siblings), "Release");
    }

    #[test]
    fn test_unique_name_smallest_suffix() {
        let siblings = ["Release", "Release (1)", "Release (3)"];
        assert_eq!(resolve_unique_name("Release", &siblings), "Release (2)");
    }

    #[test]
    fn test_unique_name_first_suffix() {
        let siblings = vec!["Release".to_string()];
        assert_eq!(resolve_unique_name("Release", &siblings), "Release (1)");
    }
}

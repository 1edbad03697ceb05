//! Activity log display formatting

use crate::activity::LogEntry;

/// Format log entries one per line, newest first as given
///
/// `limit` caps the number of lines shown.
pub fn format_log(entries: &[LogEntry], limit: Option<usize>) -> String {
    if entries.is_empty() {
        return "No activity recorded.".to_string();
    }

    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    let mut output = String::new();
    for entry in &entries[..shown] {
        output.push_str(&entry.to_line());
        output.push('\n');
    }

    if shown < entries.len() {
        output.push_str(&format!("... {} older entries\n", entries.len() - shown));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit() {
        let entries: Vec<_> = (0..5)
            .map(|i| LogEntry::new(format!("event {}", i), None))
            .collect();

        let output = format_log(&entries, Some(2));
        assert_eq!(output.lines().count(), 3);
        assert!(output.ends_with("... 3 older entries\n"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_log(&[], None), "No activity recorded.");
    }
}

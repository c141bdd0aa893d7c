//! Prompt history log records.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};


/// One user-submitted prompt from the history log.
///
/// Each JSONL line parses independently; a line missing its timestamp is
/// dropped by the parser rather than defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub pasted_contents: serde_json::Value,
    /// Submission time in epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub session_id: Option<String>,
}


impl HistoryEntry {
    /// Submission time in the local timezone, None for out-of-range values.
    pub fn local_datetime(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.timestamp).single()
    }

    /// Local calendar date of the submission, for grouping.
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.local_datetime().map(|dt| dt.date_naive())
    }

    /// Final path segment of the project field, used as the display name.
    /// Falls back to the full field when there is no separator.
    pub fn project_name(&self) -> Option<&str> {
        if self.project.is_empty() {
            return None;
        }
        let name = self
            .project
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(self.project.as_str());
        Some(name)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn entry(project: &str) -> HistoryEntry {
        HistoryEntry {
            display: "do the thing".to_string(),
            pasted_contents: serde_json::Value::Null,
            timestamp: 1_760_000_000_000,
            project: project.to_string(),
            session_id: Some("sess-1".to_string()),
        }
    }

    #[test]
    fn test_parse_line() {
        let json = r#"{
            "display": "fix the tests",
            "pastedContents": {},
            "timestamp": 1760000000000,
            "project": "/home/me/dev/widget",
            "sessionId": "abc-123"
        }"#;
        let e: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.display, "fix the tests");
        assert_eq!(e.project_name(), Some("widget"));
        assert_eq!(e.session_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_missing_timestamp_fails() {
        let json = r#"{"display": "hello", "project": "/tmp/x"}"#;
        assert!(serde_json::from_str::<HistoryEntry>(json).is_err());
    }

    #[test]
    fn test_project_name_fallbacks() {
        assert_eq!(entry("/a/b/tool").project_name(), Some("tool"));
        assert_eq!(entry("C:\\dev\\tool").project_name(), Some("tool"));
        assert_eq!(entry("plain-name").project_name(), Some("plain-name"));
        assert_eq!(entry("/trailing/slash/").project_name(), Some("slash"));
        assert_eq!(entry("").project_name(), None);
    }

    #[test]
    fn test_local_date_is_calendar_day() {
        let e = entry("/p");
        let date = e.local_date().unwrap();
        assert!(date.year() >= 2025);
    }
}

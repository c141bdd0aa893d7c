//! Prompt history log parsing.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Datelike;

use crate::models::HistoryEntry;


/// Read a history log from disk.
///
/// A missing or unreadable file yields an empty result; the caller decides
/// what absence means.
pub fn load_history(path: &Path, year: Option<i32>) -> Vec<HistoryEntry> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_history(&text, year),
        Err(_) => Vec::new(),
    }
}


/// Parse line-delimited history records, shared by local reads and remote
/// stdout. Malformed lines are dropped without aborting the read; the year
/// filter compares the entry's local calendar year.
pub fn parse_history(text: &str, year: Option<i32>) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry: HistoryEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        if let Some(year) = year {
            match entry.local_date() {
                Some(date) if date.year() == year => {}
                _ => continue,
            }
        }

        entries.push(entry);
    }

    entries
}


/// Distinct project names across a set of history entries.
pub fn project_names(entries: &[HistoryEntry]) -> BTreeSet<String> {
    entries
        .iter()
        .filter_map(|e| e.project_name())
        .map(String::from)
        .collect()
}

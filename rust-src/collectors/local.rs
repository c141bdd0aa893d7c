//! Local filesystem collector.
//!
//! Produces a best-effort dataset from the on-disk storage roots; partial
//! unavailability never fails the run. The four artifact reads are
//! independent and run concurrently.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::aggregation::combine_caches;
use crate::config;
use crate::data::{self, Fetched};
use crate::models::{HistoryEntry, UsageCache};


/// Everything the local machine knows about usage.
#[derive(Debug, Clone, Default)]
pub struct LocalDataset {
    pub cache: Option<UsageCache>,
    pub history: Vec<HistoryEntry>,
    pub projects: BTreeSet<String>,
    pub oldest_timestamp: Option<DateTime<Utc>>,
}


/// Collect from the default storage roots.
pub fn collect(year: Option<i32>) -> LocalDataset {
    collect_from_roots(&config::storage_roots(), year)
}


/// Collect from explicit storage roots, in preference order.
///
/// Roots that cannot be listed are silently skipped; caches from every
/// readable root are additively folded to cover the layout migration.
pub fn collect_from_roots(roots: &[PathBuf], year: Option<i32>) -> LocalDataset {
    let roots: Vec<&PathBuf> = roots.iter().filter(|root| root.is_dir()).collect();

    let ((cache, history), (projects, oldest_timestamp)) = rayon::join(
        || {
            rayon::join(
                || read_caches(&roots),
                || read_history(&roots, year),
            )
        },
        || {
            rayon::join(
                || read_projects(&roots, year),
                || read_oldest(&roots),
            )
        },
    );

    LocalDataset {
        cache,
        history,
        projects,
        oldest_timestamp,
    }
}


fn read_caches(roots: &[&PathBuf]) -> Option<UsageCache> {
    let mut merged: Option<UsageCache> = None;

    for root in roots {
        match data::load_cache(&config::usage_cache_path(root)) {
            Fetched::Found(cache) => {
                merged = Some(match merged.take() {
                    Some(acc) => combine_caches(acc, &cache),
                    None => cache,
                });
            }
            Fetched::Missing => {}
            Fetched::Invalid(e) => {
                eprintln!("Warning: Skipping unreadable usage cache: {e}");
            }
        }
    }

    merged
}


fn read_history(roots: &[&PathBuf], year: Option<i32>) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    for root in roots {
        entries.extend(data::load_history(&config::history_path(root), year));
    }
    entries
}


/// Project names are derived from the history log, not from directory
/// listings, so local and remote datasets agree on naming.
fn read_projects(roots: &[&PathBuf], year: Option<i32>) -> BTreeSet<String> {
    let mut projects = BTreeSet::new();
    for root in roots {
        let entries = data::load_history(&config::history_path(root), year);
        projects.extend(data::project_names(&entries));
    }
    projects
}


fn read_oldest(roots: &[&PathBuf]) -> Option<DateTime<Utc>> {
    roots
        .iter()
        .filter_map(|root| data::oldest_session_timestamp(&config::projects_dir(root)))
        .min()
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::io::Write;
    use std::path::Path;

    fn write_file(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, "{}", content).unwrap();
    }

    fn history_line(year: i32, project: &str, session: &str) -> String {
        let ts = Local
            .with_ymd_and_hms(year, 6, 1, 9, 0, 0)
            .unwrap()
            .timestamp_millis();
        format!(
            r#"{{"display": "p", "timestamp": {}, "project": "{}", "sessionId": "{}"}}"#,
            ts, project, session
        )
    }

    #[test]
    fn test_missing_roots_yield_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let roots = vec![dir.path().join("nope"), dir.path().join("also-nope")];
        let dataset = collect_from_roots(&roots, None);

        assert!(dataset.cache.is_none());
        assert!(dataset.history.is_empty());
        assert!(dataset.projects.is_empty());
        assert!(dataset.oldest_timestamp.is_none());
    }

    #[test]
    fn test_caches_from_two_roots_are_summed() {
        let dir = tempfile::tempdir().unwrap();
        let new_root = dir.path().join("config").join("claude");
        let old_root = dir.path().join(".claude");

        write_file(
            &new_root.join("usage-cache.json"),
            r#"{"version": 2, "totalSessions": 5, "totalMessages": 50,
                "dailyActivity": [{"date": "2025-04-01", "messageCount": 30, "sessionCount": 3, "toolCallCount": 7}]}"#,
        );
        write_file(
            &old_root.join("usage-cache.json"),
            r#"{"version": 1, "totalSessions": 2, "totalMessages": 20,
                "dailyActivity": [{"date": "2025-04-01", "messageCount": 20, "sessionCount": 2, "toolCallCount": 1}]}"#,
        );

        let dataset = collect_from_roots(&[new_root, old_root], None);
        let cache = dataset.cache.unwrap();

        assert_eq!(cache.total_sessions, 7);
        assert_eq!(cache.total_messages, 70);
        assert_eq!(cache.daily_activity.len(), 1);
        assert_eq!(cache.daily_activity[0].message_count, 50);
        assert_eq!(cache.daily_activity[0].session_count, 5);
    }

    #[test]
    fn test_corrupt_cache_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("claude");
        write_file(&root.join("usage-cache.json"), "{ nope");
        write_file(
            &root.join("history.jsonl"),
            &format!("{}\n", history_line(2025, "/dev/widget", "s1")),
        );

        let dataset = collect_from_roots(&[root], Some(2025));
        assert!(dataset.cache.is_none());
        assert_eq!(dataset.history.len(), 1);
        assert!(dataset.projects.contains("widget"));
    }

    #[test]
    fn test_history_unions_across_roots() {
        let dir = tempfile::tempdir().unwrap();
        let root_a = dir.path().join("a");
        let root_b = dir.path().join("b");
        write_file(
            &root_a.join("history.jsonl"),
            &format!("{}\n", history_line(2025, "/dev/one", "s1")),
        );
        write_file(
            &root_b.join("history.jsonl"),
            &format!("{}\n", history_line(2025, "/dev/two", "s2")),
        );

        let dataset = collect_from_roots(&[root_a, root_b], Some(2025));
        assert_eq!(dataset.history.len(), 2);
        assert_eq!(dataset.projects.len(), 2);
    }

    #[test]
    fn test_oldest_timestamp_from_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("claude");
        write_file(
            &root.join("projects").join("proj").join("s.jsonl"),
            r#"{"type": "user", "sessionId": "s1", "timestamp": "2024-08-15T07:00:00Z"}
"#,
        );

        let dataset = collect_from_roots(&[root], None);
        assert_eq!(
            dataset.oldest_timestamp.unwrap().to_rfc3339(),
            "2024-08-15T07:00:00+00:00"
        );
    }
}

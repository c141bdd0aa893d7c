//! Session transcript scanning.
//!
//! Transcripts are partitioned by project directory, one JSONL file per
//! session. Scanning serves two consumers: per-message extraction, and the
//! oldest-timestamp hunt that corrects a misleadingly recent first-session
//! date in the cache.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::{OLDEST_SCAN_LINES, SUBAGENT_PREFIX};
use crate::models::SessionMessage;


/// All session transcript files under a projects directory.
///
/// Walks one level of project subdirectories, skipping sub-agent files.
/// An unlistable directory yields no files.
pub fn session_files(projects_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let Ok(projects) = std::fs::read_dir(projects_dir) else {
        return files;
    };

    for project in projects.flatten() {
        let project_path = project.path();
        if !project_path.is_dir() {
            continue;
        }

        let Ok(sessions) = std::fs::read_dir(&project_path) else {
            continue;
        };

        for session in sessions.flatten() {
            let path = session.path();
            let name = session.file_name();
            let name = name.to_string_lossy();

            if name.starts_with(SUBAGENT_PREFIX) {
                continue;
            }
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}


/// Parse one transcript line into a session message.
///
/// Returns None for malformed lines and for anything that is not a user or
/// assistant turn.
pub fn parse_session_message(line: &str) -> Option<SessionMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let msg: SessionMessage = serde_json::from_str(line).ok()?;
    if msg.message_type != "user" && msg.message_type != "assistant" {
        return None;
    }

    Some(msg)
}


/// Extract every user/assistant turn from all transcripts under a projects
/// directory. Unreadable files and malformed lines are skipped.
#[allow(dead_code)]
pub fn collect_session_messages(projects_dir: &Path) -> Vec<SessionMessage> {
    let mut messages = Vec::new();

    for path in session_files(projects_dir) {
        let Ok(file) = File::open(&path) else {
            continue;
        };

        for line in BufReader::new(file).lines() {
            let Ok(line) = line else { break };
            if let Some(msg) = parse_session_message(&line) {
                messages.push(msg);
            }
        }
    }

    messages
}


/// Oldest timestamp recorded in any transcript under a projects directory.
///
/// Only the first few lines of each file are inspected; session files are
/// chronological from creation, so the head carries the earliest timestamp.
pub fn oldest_session_timestamp(projects_dir: &Path) -> Option<DateTime<Utc>> {
    let mut oldest: Option<DateTime<Utc>> = None;

    for path in session_files(projects_dir) {
        let Ok(file) = File::open(&path) else {
            continue;
        };

        for line in BufReader::new(file).lines().take(OLDEST_SCAN_LINES) {
            let Ok(line) = line else { break };
            let Some(ts) = parse_session_message(&line).and_then(|m| m.timestamp_utc()) else {
                continue;
            };
            if oldest.map_or(true, |current| ts < current) {
                oldest = Some(ts);
            }
        }
    }

    oldest
}


/// Oldest timestamp in a blob of transcript lines, for remote scans where the
/// per-file head lines arrive concatenated on stdout.
pub fn oldest_timestamp_in_text(text: &str) -> Option<DateTime<Utc>> {
    text.lines()
        .filter_map(|line| parse_session_message(line).and_then(|m| m.timestamp_utc()))
        .min()
}

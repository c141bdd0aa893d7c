//! Storage locations and tuning constants.

use std::path::{Path, PathBuf};


/// Connection-establishment timeout for remote fetches (seconds).
pub const SSH_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Lines inspected per transcript when hunting for the oldest timestamp.
/// Session files are chronological from creation, so a short prefix is enough.
pub const OLDEST_SCAN_LINES: usize = 10;

/// Transcript files with this prefix belong to sub-agents and are skipped.
pub const SUBAGENT_PREFIX: &str = "agent-";

/// Estimated messages per recorded prompt, used when no usage cache exists.
pub const MESSAGES_PER_PROMPT_ESTIMATE: i64 = 20;


/// Candidate storage roots in preference order.
///
/// Claude Code migrated from `~/.claude` to `~/.config/claude`; both may hold
/// data, so every listable root is read. `CLAUDE_CONFIG_DIR` overrides take
/// the highest priority.
pub fn storage_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(dir) = std::env::var("CLAUDE_CONFIG_DIR") {
        if !dir.is_empty() {
            roots.push(PathBuf::from(dir));
        }
    }

    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".config").join("claude"));
        roots.push(home.join(".claude"));
    }

    roots.dedup();
    roots
}


/// The same candidate roots as shell-side paths on a remote host.
pub fn remote_storage_roots() -> Vec<String> {
    vec!["~/.config/claude".to_string(), "~/.claude".to_string()]
}


/// Precomputed usage cache within a storage root.
pub fn usage_cache_path(root: &Path) -> PathBuf {
    root.join("usage-cache.json")
}


/// Prompt history log within a storage root.
pub fn history_path(root: &Path) -> PathBuf {
    root.join("history.jsonl")
}


/// Per-project session transcripts within a storage root.
pub fn projects_dir(root: &Path) -> PathBuf {
    root.join("projects")
}


/// Default directory for exported cards.
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("usage")
}

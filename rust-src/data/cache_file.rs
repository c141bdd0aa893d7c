//! Usage cache reading.

use std::path::Path;

use crate::data::Fetched;
use crate::models::UsageCache;


/// Read a usage cache file from disk.
pub fn load_cache(path: &Path) -> Fetched<UsageCache> {
    if !path.exists() {
        return Fetched::Missing;
    }

    match std::fs::read_to_string(path) {
        Ok(text) => parse_cache(&text),
        Err(e) => Fetched::Invalid(format!("{}: {}", path.display(), e)),
    }
}


/// Parse usage cache JSON, shared by local reads and remote stdout.
///
/// Empty input counts as a missing source, not a malformed one.
pub fn parse_cache(text: &str) -> Fetched<UsageCache> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Fetched::Missing;
    }

    match serde_json::from_str::<UsageCache>(trimmed) {
        Ok(cache) => Fetched::Found(cache),
        Err(e) => Fetched::Invalid(e.to_string()),
    }
}

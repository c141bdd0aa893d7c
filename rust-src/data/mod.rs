//! Data access layer for Claude Code usage artifacts.

mod cache_file;
mod history_log;
mod transcripts;

#[allow(unused_imports)]
pub use cache_file::{load_cache, parse_cache};
#[allow(unused_imports)]
pub use history_log::{load_history, parse_history, project_names};
#[allow(unused_imports)]
pub use transcripts::{
    collect_session_messages,
    oldest_session_timestamp,
    oldest_timestamp_in_text,
    parse_session_message,
    session_files,
};


/// Outcome of reading one source artifact.
///
/// Distinguishes a source that does not exist from one that exists but failed
/// to parse; both are non-fatal and downstream logic treats them as absent,
/// but tests assert on which path triggered.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Found(T),
    Missing,
    Invalid(String),
}


impl<T> Fetched<T> {
    /// Collapse into an Option, discarding the absent/invalid distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Missing | Fetched::Invalid(_) => None,
        }
    }

    #[allow(dead_code)]
    pub fn is_found(&self) -> bool {
        matches!(self, Fetched::Found(_))
    }
}

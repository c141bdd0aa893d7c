//! Configuration and settings for Claude Wrapped.

mod settings;

#[allow(unused_imports)]
pub use settings::{
    storage_roots,
    remote_storage_roots,
    usage_cache_path,
    history_path,
    projects_dir,
    default_output_dir,
    SSH_CONNECT_TIMEOUT_SECS,
    OLDEST_SCAN_LINES,
    SUBAGENT_PREFIX,
    MESSAGES_PER_PROMPT_ESTIMATE,
};

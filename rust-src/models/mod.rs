//! Data models for Claude Code usage artifacts.

mod history;
mod session;
mod usage_cache;

#[allow(unused_imports)]
pub use history::HistoryEntry;
#[allow(unused_imports)]
pub use session::{MessageBody, SessionMessage, TokenUsage};
#[allow(unused_imports)]
pub use usage_cache::{DailyActivity, DailyModelTokens, LongestSession, ModelUsage, UsageCache};

//! Precomputed usage cache written by Claude Code itself.
//!
//! One cache may exist per storage root; caches are additively merged later,
//! so every field tolerates absence in the source document.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};


/// Versioned snapshot of aggregate usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageCache {
    pub version: i64,
    pub last_computed_date: Option<String>,
    pub daily_activity: Vec<DailyActivity>,
    pub daily_model_tokens: Vec<DailyModelTokens>,
    pub model_usage: HashMap<String, ModelUsage>,
    pub total_sessions: i64,
    pub total_messages: i64,
    pub longest_session: Option<LongestSession>,
    pub first_session_date: Option<String>,
    pub hour_counts: HashMap<String, i64>,
}


/// Activity counters for a single calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: String,
    pub message_count: i64,
    pub session_count: i64,
    pub tool_call_count: i64,
}


/// Token volume for one model on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyModelTokens {
    pub date: String,
    pub model: String,
    pub tokens: i64,
}


/// Cumulative token and cost usage for one model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelUsage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cache_read_tokens: i64,
    pub cache_creation_tokens: i64,
    pub web_search_requests: i64,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
    pub context_window: i64,
}


/// The single longest recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LongestSession {
    pub session_id: String,
    pub duration_ms: i64,
    pub message_count: i64,
    pub timestamp: Option<String>,
}


impl DailyActivity {
    /// Parse the record's date field, None when malformed.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}


impl ModelUsage {
    /// Total tokens across all four categories.
    #[allow(dead_code)]
    pub fn total_tokens(&self) -> i64 {
        self.input_tokens
            + self.output_tokens
            + self.cache_read_tokens
            + self.cache_creation_tokens
    }
}

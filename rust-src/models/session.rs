//! Session transcript records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


/// One turn within a per-session transcript file.
///
/// Only `user` and `assistant` lines are collected; anything else in the
/// transcript (summaries, tool results) is ignored at the parse layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// ISO 8601 timestamp string.
    pub timestamp: String,
    #[serde(default)]
    pub message: Option<MessageBody>,
}


/// Model and token detail carried on assistant turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}


/// Token usage for a single API call, wire field names.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
    #[serde(default)]
    pub cache_read_input_tokens: i64,
    #[serde(default)]
    pub cache_creation_input_tokens: i64,
}


impl SessionMessage {
    /// Parse the ISO timestamp, None when malformed.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Model identifier, when this turn carries one.
    #[allow(dead_code)]
    pub fn model_id(&self) -> Option<&str> {
        self.message.as_ref()?.model.as_deref()
    }
}


impl TokenUsage {
    /// Total tokens across all categories.
    #[allow(dead_code)]
    pub fn total_tokens(&self) -> i64 {
        self.input_tokens
            + self.output_tokens
            + self.cache_read_input_tokens
            + self.cache_creation_input_tokens
    }
}

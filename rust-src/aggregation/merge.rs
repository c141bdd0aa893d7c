//! Merge engine combining local and remote datasets.
//!
//! History entries are unioned without dedup: the same session recorded on
//! two machines is historically valid and additive. Caches merge by
//! summation, and "first" tie-breaks always take the earliest value seen.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::collectors::{LocalDataset, RemoteDataset};
use crate::models::{HistoryEntry, UsageCache};


/// The logical union of one local and zero-or-more remote datasets.
#[derive(Debug, Clone, Default)]
pub struct MergedDataset {
    pub cache: Option<UsageCache>,
    pub history: Vec<HistoryEntry>,
    pub projects: BTreeSet<String>,
}


/// Merge datasets, local first, then remotes in the given order.
///
/// With no remotes the local cache passes through untouched; as soon as any
/// remote is present, a synthetic cache is rebuilt from scratch so downstream
/// code sees one consistent representation. The first-session date ends up as
/// the minimum across every cache field and every transcript-scan timestamp.
pub fn merge(local: LocalDataset, remotes: Vec<RemoteDataset>) -> MergedDataset {
    let rebuild = !remotes.is_empty();

    let mut history = local.history;
    let mut projects = local.projects;
    let mut oldest: Vec<DateTime<Utc>> = local.oldest_timestamp.into_iter().collect();

    let mut caches: Vec<UsageCache> = local.cache.into_iter().collect();

    for remote in remotes {
        history.extend(remote.history);
        projects.extend(remote.projects);
        oldest.extend(remote.oldest_timestamp);
        caches.extend(remote.cache);
    }

    let cache = if rebuild {
        if caches.is_empty() {
            None
        } else {
            Some(
                caches
                    .into_iter()
                    .fold(UsageCache::default(), |acc, src| combine_caches(acc, &src)),
            )
        }
    } else {
        caches.into_iter().next()
    };

    let oldest_scanned = oldest.into_iter().min().map(|ts| ts.to_rfc3339());
    let cache = cache.map(|mut merged| {
        merged.first_session_date =
            earliest_date_string(merged.first_session_date.take(), oldest_scanned);
        merged
    });

    MergedDataset {
        cache,
        history,
        projects,
    }
}


/// Pure additive reducer over two caches.
///
/// Per-date and per-model keys merge by summation with zero defaults for any
/// missing field; novel keys are appended in source order.
pub fn combine_caches(acc: UsageCache, src: &UsageCache) -> UsageCache {
    let mut daily_activity = acc.daily_activity;
    for day in &src.daily_activity {
        match daily_activity.iter_mut().find(|d| d.date == day.date) {
            Some(existing) => {
                existing.message_count += day.message_count;
                existing.session_count += day.session_count;
                existing.tool_call_count += day.tool_call_count;
            }
            None => daily_activity.push(day.clone()),
        }
    }

    let mut daily_model_tokens = acc.daily_model_tokens;
    for row in &src.daily_model_tokens {
        match daily_model_tokens
            .iter_mut()
            .find(|r| r.date == row.date && r.model == row.model)
        {
            Some(existing) => existing.tokens += row.tokens,
            None => daily_model_tokens.push(row.clone()),
        }
    }

    let mut model_usage = acc.model_usage;
    for (model, usage) in &src.model_usage {
        let entry = model_usage.entry(model.clone()).or_default();
        entry.input_tokens += usage.input_tokens;
        entry.output_tokens += usage.output_tokens;
        entry.cache_read_tokens += usage.cache_read_tokens;
        entry.cache_creation_tokens += usage.cache_creation_tokens;
        entry.web_search_requests += usage.web_search_requests;
        entry.cost_usd += usage.cost_usd;
        entry.context_window = entry.context_window.max(usage.context_window);
    }

    let mut hour_counts = acc.hour_counts;
    for (hour, count) in &src.hour_counts {
        *hour_counts.entry(hour.clone()).or_insert(0) += count;
    }

    let longest_session = match (acc.longest_session, src.longest_session.clone()) {
        (Some(a), Some(b)) => Some(if b.duration_ms > a.duration_ms { b } else { a }),
        (a, b) => a.or(b),
    };

    UsageCache {
        version: acc.version.max(src.version),
        last_computed_date: latest_date_string(acc.last_computed_date, src.last_computed_date.clone()),
        daily_activity,
        daily_model_tokens,
        model_usage,
        total_sessions: acc.total_sessions + src.total_sessions,
        total_messages: acc.total_messages + src.total_messages,
        longest_session,
        first_session_date: earliest_date_string(acc.first_session_date, src.first_session_date.clone()),
        hour_counts,
    }
}


/// Parse a date string that may be a full timestamp or a bare calendar date.
fn parse_flexible(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}


fn earliest_date_string(a: Option<String>, b: Option<String>) -> Option<String> {
    merge_date_strings(a, b, true)
}


fn latest_date_string(a: Option<String>, b: Option<String>) -> Option<String> {
    merge_date_strings(a, b, false)
}


/// Keep `a` unless `b` wins the requested ordering; unparseable strings fall
/// back to lexicographic order, which matches chronological order for ISO
/// dates.
fn merge_date_strings(a: Option<String>, b: Option<String>, earliest: bool) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => {
            let b_wins = match (parse_flexible(&a), parse_flexible(&b)) {
                (Some(ta), Some(tb)) => {
                    if earliest {
                        tb < ta
                    } else {
                        tb > ta
                    }
                }
                (Some(_), None) => false,
                (None, Some(_)) => true,
                (None, None) => {
                    if earliest {
                        b < a
                    } else {
                        b > a
                    }
                }
            };
            Some(if b_wins { b } else { a })
        }
        (a, b) => a.or(b),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyActivity, LongestSession, ModelUsage};

    fn cache_with_day(date: &str, messages: i64, sessions: i64) -> UsageCache {
        UsageCache {
            version: 1,
            daily_activity: vec![DailyActivity {
                date: date.to_string(),
                message_count: messages,
                session_count: sessions,
                tool_call_count: 0,
            }],
            total_sessions: sessions,
            total_messages: messages,
            ..Default::default()
        }
    }

    fn local_with_cache(cache: UsageCache) -> LocalDataset {
        LocalDataset {
            cache: Some(cache),
            ..Default::default()
        }
    }

    fn remote_with_cache(host: &str, cache: UsageCache) -> RemoteDataset {
        RemoteDataset {
            host: host.to_string(),
            cache: Some(cache),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_remotes_is_a_passthrough() {
        let mut cache = cache_with_day("2025-02-01", 12, 2);
        cache.first_session_date = Some("2024-06-01T00:00:00Z".to_string());
        cache
            .model_usage
            .insert("claude-sonnet-4-5-20250929".to_string(), ModelUsage {
                output_tokens: 99,
                ..Default::default()
            });

        let merged = merge(local_with_cache(cache.clone()), Vec::new());
        let out = merged.cache.unwrap();

        assert_eq!(out.total_sessions, cache.total_sessions);
        assert_eq!(out.total_messages, cache.total_messages);
        assert_eq!(out.daily_activity.len(), 1);
        assert_eq!(out.daily_activity[0].message_count, 12);
        assert_eq!(out.model_usage.len(), 1);
        assert_eq!(out.first_session_date, cache.first_session_date);
    }

    #[test]
    fn test_overlapping_dates_are_summed_not_overwritten() {
        let local = local_with_cache(cache_with_day("2025-02-01", 12, 2));
        let remote_a = remote_with_cache("a", cache_with_day("2025-02-01", 8, 1));
        let remote_b = remote_with_cache("b", cache_with_day("2025-02-02", 5, 1));

        let merged = merge(local, vec![remote_a, remote_b]);
        let cache = merged.cache.unwrap();

        assert_eq!(cache.daily_activity.len(), 2);
        let overlap = cache
            .daily_activity
            .iter()
            .find(|d| d.date == "2025-02-01")
            .unwrap();
        assert_eq!(overlap.message_count, 20);
        assert_eq!(overlap.session_count, 3);
        assert_eq!(cache.total_messages, 25);
        assert_eq!(cache.total_sessions, 4);
    }

    #[test]
    fn test_model_usage_sums_with_zero_defaults() {
        let mut local_cache = UsageCache::default();
        local_cache.model_usage.insert(
            "m".to_string(),
            ModelUsage {
                input_tokens: 10,
                output_tokens: 20,
                cost_usd: 1.5,
                ..Default::default()
            },
        );
        let mut remote_cache = UsageCache::default();
        remote_cache.model_usage.insert(
            "m".to_string(),
            ModelUsage {
                cache_read_tokens: 7,
                ..Default::default()
            },
        );

        let merged = merge(
            local_with_cache(local_cache),
            vec![remote_with_cache("a", remote_cache)],
        );
        let usage = merged.cache.unwrap().model_usage["m"];

        assert_eq!(usage.input_tokens, 10);
        assert_eq!(usage.output_tokens, 20);
        assert_eq!(usage.cache_read_tokens, 7);
        assert!((usage.cost_usd - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_history_unions_without_dedup() {
        let entry = HistoryEntry {
            display: "same prompt".to_string(),
            pasted_contents: serde_json::Value::Null,
            timestamp: 1_760_000_000_000,
            project: "/dev/widget".to_string(),
            session_id: Some("s1".to_string()),
        };
        let local = LocalDataset {
            history: vec![entry.clone()],
            ..Default::default()
        };
        let remote = RemoteDataset {
            host: "a".to_string(),
            history: vec![entry],
            ..Default::default()
        };

        let merged = merge(local, vec![remote]);
        assert_eq!(merged.history.len(), 2);
    }

    #[test]
    fn test_first_session_date_takes_overall_minimum() {
        let mut local_cache = UsageCache::default();
        local_cache.first_session_date = Some("2024-06-01T00:00:00Z".to_string());
        let local = LocalDataset {
            cache: Some(local_cache),
            oldest_timestamp: DateTime::parse_from_rfc3339("2024-03-10T00:00:00Z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            ..Default::default()
        };

        let mut remote_cache = UsageCache::default();
        remote_cache.first_session_date = Some("2024-05-01T00:00:00Z".to_string());
        let remote = RemoteDataset {
            host: "a".to_string(),
            cache: Some(remote_cache),
            oldest_timestamp: None,
            ..Default::default()
        };

        let merged = merge(local, vec![remote]);
        let first = merged.cache.unwrap().first_session_date.unwrap();
        assert!(first.starts_with("2024-03-10"));
    }

    #[test]
    fn test_transcript_scan_can_predate_cache_locally() {
        // The cache's own field may be misleadingly recent
        let mut cache = cache_with_day("2025-02-01", 1, 1);
        cache.first_session_date = Some("2025-01-01".to_string());
        let local = LocalDataset {
            cache: Some(cache),
            oldest_timestamp: DateTime::parse_from_rfc3339("2023-11-05T08:00:00Z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            ..Default::default()
        };

        let merged = merge(local, Vec::new());
        let first = merged.cache.unwrap().first_session_date.unwrap();
        assert!(first.starts_with("2023-11-05"));
    }

    #[test]
    fn test_longest_session_keeps_max_duration() {
        let mut a = UsageCache::default();
        a.longest_session = Some(LongestSession {
            session_id: "short".to_string(),
            duration_ms: 1_000,
            message_count: 3,
            timestamp: None,
        });
        let mut b = UsageCache::default();
        b.longest_session = Some(LongestSession {
            session_id: "long".to_string(),
            duration_ms: 9_000,
            message_count: 40,
            timestamp: None,
        });

        let merged = combine_caches(a, &b);
        assert_eq!(merged.longest_session.unwrap().session_id, "long");
    }

    #[test]
    fn test_remotes_without_caches_yield_no_cache() {
        let local = LocalDataset::default();
        let remote = RemoteDataset {
            host: "a".to_string(),
            ..Default::default()
        };
        let merged = merge(local, vec![remote]);
        assert!(merged.cache.is_none());
    }

    #[test]
    fn test_projects_union() {
        let mut local = LocalDataset::default();
        local.projects.insert("widget".to_string());
        let mut remote = RemoteDataset {
            host: "a".to_string(),
            ..Default::default()
        };
        remote.projects.insert("widget".to_string());
        remote.projects.insert("gadget".to_string());

        let merged = merge(local, vec![remote]);
        assert_eq!(merged.projects.len(), 2);
    }

    #[test]
    fn test_hour_counts_sum() {
        let mut a = UsageCache::default();
        a.hour_counts.insert("9".to_string(), 4);
        let mut b = UsageCache::default();
        b.hour_counts.insert("9".to_string(), 6);
        b.hour_counts.insert("23".to_string(), 1);

        let merged = combine_caches(a, &b);
        assert_eq!(merged.hour_counts["9"], 10);
        assert_eq!(merged.hour_counts["23"], 1);
    }
}

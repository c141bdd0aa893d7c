//! Yearly stats calculation.
//!
//! Consumes one merged dataset and produces the immutable summary the card
//! renderer and the text recap read. Deterministic apart from the wall-clock
//! anchor used by the current-streak walk.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, Local, NaiveDate};
use indexmap::IndexMap;

use crate::aggregation::MergedDataset;
use crate::config::MESSAGES_PER_PROMPT_ESTIMATE;
use crate::pricing;


pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];


/// Headline totals for the year.
#[derive(Debug, Clone, Default)]
pub struct WrappedTotals {
    pub sessions: i64,
    pub messages: i64,
    pub prompts: i64,
    pub projects: i64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cache_read_tokens: i64,
    pub cache_creation_tokens: i64,
    pub total_tokens: i64,
    pub cost_usd: f64,
    pub cost_available: bool,
}


/// One ranked model with its share of output tokens.
#[derive(Debug, Clone)]
pub struct ModelRank {
    pub model: String,
    pub output_tokens: i64,
    pub percent: i64,
}


/// One ranked project with its share of prompts.
#[derive(Debug, Clone)]
pub struct ProjectRank {
    pub name: String,
    pub prompts: i64,
    pub percent: i64,
}


/// Contiguous-day streak metrics.
#[derive(Debug, Clone, Default)]
pub struct StreakStats {
    pub longest: i64,
    /// The literal dates composing the longest streak.
    pub longest_days: Vec<NaiveDate>,
    pub current: i64,
}


/// The busiest single day.
#[derive(Debug, Clone)]
pub struct MostActiveDay {
    pub date: NaiveDate,
    pub count: i64,
    pub display: String,
}


/// Seven weekday buckets, Sunday first.
#[derive(Debug, Clone)]
pub struct WeekdayHistogram {
    pub counts: [i64; 7],
    pub busiest_index: usize,
    pub busiest_name: &'static str,
    pub busiest_count: i64,
}


/// Longest recorded session, when the cache knows it.
#[derive(Debug, Clone, Copy)]
pub struct LongestSessionStats {
    pub duration_ms: i64,
    pub message_count: i64,
}


/// The complete year-in-review summary.
#[derive(Debug, Clone)]
pub struct WrappedStats {
    pub year: i32,
    pub totals: WrappedTotals,
    pub top_models: Vec<ModelRank>,
    pub top_projects: Vec<ProjectRank>,
    pub streaks: StreakStats,
    /// Day-to-count activity for the year, in source insertion order.
    pub activity: IndexMap<NaiveDate, i64>,
    pub most_active_day: Option<MostActiveDay>,
    pub weekdays: WeekdayHistogram,
    pub longest_session: Option<LongestSessionStats>,
}


/// Compute the yearly summary from a merged dataset.
pub fn compute(year: i32, data: &MergedDataset) -> WrappedStats {
    compute_as_of(year, data, Local::now().date_naive())
}


/// Wall-clock-free variant; `today` anchors the current-streak walk.
pub fn compute_as_of(year: i32, data: &MergedDataset, today: NaiveDate) -> WrappedStats {
    let (activity, weekday_counts) = build_activity(year, data);

    let totals = build_totals(year, data);
    let top_models = rank_models(data);
    let top_projects = rank_projects(data);
    let streaks = build_streaks(&activity, today);
    let most_active_day = find_most_active(&activity);
    let weekdays = build_weekday_histogram(weekday_counts);

    let longest_session = data
        .cache
        .as_ref()
        .and_then(|cache| cache.longest_session.as_ref())
        .map(|longest| LongestSessionStats {
            duration_ms: longest.duration_ms,
            message_count: longest.message_count,
        });

    WrappedStats {
        year,
        totals,
        top_models,
        top_projects,
        streaks,
        activity,
        most_active_day,
        weekdays,
        longest_session,
    }
}


/// Build the daily-activity map and, in lock-step, the weekday buckets.
///
/// Cache-derived message counts win; the per-prompt fallback only triggers
/// when the cache yields no in-year entries at all, and counts one unit per
/// history entry rather than true message counts.
fn build_activity(year: i32, data: &MergedDataset) -> (IndexMap<NaiveDate, i64>, [i64; 7]) {
    let mut activity: IndexMap<NaiveDate, i64> = IndexMap::new();
    let mut weekday_counts = [0i64; 7];

    if let Some(cache) = &data.cache {
        for day in &cache.daily_activity {
            let Some(date) = day.naive_date() else { continue };
            if date.year() != year {
                continue;
            }
            *activity.entry(date).or_insert(0) += day.message_count;
            weekday_counts[weekday_index(date)] += day.message_count;
        }
    }

    if activity.is_empty() {
        for entry in &data.history {
            let Some(date) = entry.local_date() else { continue };
            if date.year() != year {
                continue;
            }
            *activity.entry(date).or_insert(0) += 1;
            weekday_counts[weekday_index(date)] += 1;
        }
    }

    (activity, weekday_counts)
}


fn build_totals(year: i32, data: &MergedDataset) -> WrappedTotals {
    let mut totals = WrappedTotals {
        prompts: data.history.len() as i64,
        projects: data.projects.len() as i64,
        ..Default::default()
    };

    if let Some(cache) = &data.cache {
        for day in &cache.daily_activity {
            if day.naive_date().map_or(false, |d| d.year() == year) {
                totals.sessions += day.session_count;
                totals.messages += day.message_count;
            }
        }

        // Token totals are not year-scoped: per-model usage carries no dates.
        for usage in cache.model_usage.values() {
            totals.input_tokens += usage.input_tokens;
            totals.output_tokens += usage.output_tokens;
            totals.cache_read_tokens += usage.cache_read_tokens;
            totals.cache_creation_tokens += usage.cache_creation_tokens;
        }
        totals.cost_usd = pricing::total_cost(&cache.model_usage);
        totals.cost_available = !cache.model_usage.is_empty();
    }

    totals.total_tokens = totals.input_tokens
        + totals.output_tokens
        + totals.cache_read_tokens
        + totals.cache_creation_tokens;

    // No usable cache counters: estimate from the prompt history instead.
    if totals.sessions == 0 && totals.messages == 0 && !data.history.is_empty() {
        totals.messages = MESSAGES_PER_PROMPT_ESTIMATE * data.history.len() as i64;
        totals.sessions = data
            .history
            .iter()
            .filter_map(|entry| entry.session_id.as_deref())
            .collect::<HashSet<_>>()
            .len() as i64;
    }

    totals
}


fn rank_models(data: &MergedDataset) -> Vec<ModelRank> {
    let Some(cache) = &data.cache else {
        return Vec::new();
    };

    let mut models: Vec<(String, i64)> = cache
        .model_usage
        .iter()
        .map(|(model, usage)| (model.clone(), usage.output_tokens))
        .collect();
    models.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let denominator: i64 = models.iter().map(|(_, count)| count).sum();

    models
        .into_iter()
        .take(3)
        .map(|(model, output_tokens)| ModelRank {
            model,
            output_tokens,
            percent: percentage(output_tokens, denominator),
        })
        .collect()
}


fn rank_projects(data: &MergedDataset) -> Vec<ProjectRank> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for entry in &data.history {
        if let Some(name) = entry.project_name() {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    let denominator = data.history.len() as i64;

    let mut ranked: Vec<(String, i64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(4)
        .map(|(name, prompts)| ProjectRank {
            name,
            prompts,
            percent: percentage(prompts, denominator),
        })
        .collect()
}


fn build_streaks(activity: &IndexMap<NaiveDate, i64>, today: NaiveDate) -> StreakStats {
    let mut dates: Vec<NaiveDate> = activity.keys().copied().collect();
    dates.sort();
    dates.dedup();

    if dates.is_empty() {
        return StreakStats::default();
    }

    let mut best_start = 0;
    let mut best_len = 1;
    let mut run_start = 0;
    let mut run_len = 1;

    for i in 1..dates.len() {
        if (dates[i] - dates[i - 1]).num_days() == 1 {
            run_len += 1;
        } else {
            run_start = i;
            run_len = 1;
        }
        if run_len > best_len {
            best_len = run_len;
            best_start = run_start;
        }
    }

    let active: HashSet<NaiveDate> = dates.iter().copied().collect();

    StreakStats {
        longest: best_len as i64,
        longest_days: dates[best_start..best_start + best_len].to_vec(),
        current: current_streak(&active, today),
    }
}


/// Walk backward from today (or yesterday, when today is inactive) counting
/// consecutive active days.
fn current_streak(active: &HashSet<NaiveDate>, today: NaiveDate) -> i64 {
    let yesterday = today - Duration::days(1);
    let anchor = if active.contains(&today) {
        today
    } else if active.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    let mut day = anchor;
    while active.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}


/// First-encountered maximum wins ties, so insertion order is meaningful.
fn find_most_active(activity: &IndexMap<NaiveDate, i64>) -> Option<MostActiveDay> {
    let mut best: Option<(NaiveDate, i64)> = None;
    for (date, count) in activity {
        if best.map_or(true, |(_, best_count)| *count > best_count) {
            best = Some((*date, *count));
        }
    }

    best.map(|(date, count)| MostActiveDay {
        date,
        count,
        display: date.format("%B %-d, %Y").to_string(),
    })
}


fn build_weekday_histogram(counts: [i64; 7]) -> WeekdayHistogram {
    let mut busiest_index = 0;
    for (i, count) in counts.iter().enumerate() {
        if *count > counts[busiest_index] {
            busiest_index = i;
        }
    }

    WeekdayHistogram {
        counts,
        busiest_index,
        busiest_name: WEEKDAY_NAMES[busiest_index],
        busiest_count: counts[busiest_index],
    }
}


/// JavaScript-style weekday index, 0 = Sunday.
fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}


/// Rounded integer percentage; 0 whenever the denominator is 0.
fn percentage(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as i64
}

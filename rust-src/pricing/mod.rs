//! Static USD pricing for Claude models.
//!
//! Rates are per million tokens. Every lookup resolves to a rate: exact model
//! ids first, then family substring rules, then a Sonnet 3.5-equivalent
//! default. Precomputed costs in the usage cache reflect true billing and win
//! over anything computed here.

use std::collections::HashMap;

use crate::models::ModelUsage;


/// Per-million-token rates for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRates {
    pub input: f64,
    pub output: f64,
    pub cache_write: f64,
    pub cache_read: f64,
}


const OPUS_4: ModelRates = ModelRates { input: 15.00, output: 75.00, cache_write: 18.75, cache_read: 1.50 };
const SONNET_4: ModelRates = ModelRates { input: 3.00, output: 15.00, cache_write: 3.75, cache_read: 0.30 };
const OPUS_3: ModelRates = ModelRates { input: 15.00, output: 75.00, cache_write: 18.75, cache_read: 1.50 };
const HAIKU_4_5: ModelRates = ModelRates { input: 1.00, output: 5.00, cache_write: 1.25, cache_read: 0.10 };
const HAIKU_3_5: ModelRates = ModelRates { input: 0.80, output: 4.00, cache_write: 1.00, cache_read: 0.08 };
const HAIKU_3: ModelRates = ModelRates { input: 0.25, output: 1.25, cache_write: 0.30, cache_read: 0.03 };
const SONNET_3_5: ModelRates = ModelRates { input: 3.00, output: 15.00, cache_write: 3.75, cache_read: 0.30 };
const FREE: ModelRates = ModelRates { input: 0.0, output: 0.0, cache_write: 0.0, cache_read: 0.0 };

/// Exact-match table of known model ids.
const KNOWN_MODELS: &[(&str, ModelRates)] = &[
    ("claude-opus-4-1-20250805", OPUS_4),
    ("claude-opus-4-20250514", OPUS_4),
    ("claude-sonnet-4-5-20250929", SONNET_4),
    ("claude-sonnet-4-20250514", SONNET_4),
    ("claude-haiku-4-5-20251001", HAIKU_4_5),
    ("claude-haiku-3-5-20241022", HAIKU_3_5),
    ("claude-3-5-haiku-20241022", HAIKU_3_5),
    ("claude-3-5-sonnet-20241022", SONNET_3_5),
    ("claude-3-opus-20240229", OPUS_3),
    ("claude-3-haiku-20240307", HAIKU_3),
    ("<synthetic>", FREE),
];


/// Resolve rates for a model id.
///
/// Family rules apply in fixed priority order, so "opus-4" wins over the bare
/// "opus" rule for ids matching both.
pub fn rates_for(model_id: &str) -> ModelRates {
    for (known, rates) in KNOWN_MODELS {
        if model_id == *known {
            return *rates;
        }
    }

    let lower = model_id.to_lowercase();
    if lower.contains("opus-4") || lower.contains("opus4") {
        OPUS_4
    } else if lower.contains("sonnet-4") || lower.contains("sonnet4") {
        SONNET_4
    } else if lower.contains("opus") {
        OPUS_3
    } else if lower.contains("haiku") && lower.contains("3-5") {
        HAIKU_3_5
    } else if lower.contains("haiku") {
        HAIKU_3
    } else {
        SONNET_3_5
    }
}


/// Compute the USD cost of a token volume under a model's rates.
pub fn cost_for(
    model_id: &str,
    input_tokens: i64,
    output_tokens: i64,
    cache_creation_tokens: i64,
    cache_read_tokens: i64,
) -> f64 {
    let rates = rates_for(model_id);
    (input_tokens as f64 * rates.input
        + output_tokens as f64 * rates.output
        + cache_creation_tokens as f64 * rates.cache_write
        + cache_read_tokens as f64 * rates.cache_read)
        / 1_000_000.0
}


/// Total cost across a per-model usage map.
///
/// Uses the source-provided cost when positive, else computes a best-effort
/// fallback from the token counts.
pub fn total_cost(model_usage: &HashMap<String, ModelUsage>) -> f64 {
    model_usage
        .iter()
        .map(|(model, usage)| {
            if usage.cost_usd > 0.0 {
                usage.cost_usd
            } else {
                cost_for(
                    model,
                    usage.input_tokens,
                    usage.output_tokens,
                    usage.cache_creation_tokens,
                    usage.cache_read_tokens,
                )
            }
        })
        .sum()
}

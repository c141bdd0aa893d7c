//! Aggregation layer: dataset merging and yearly stats.

mod merge;
mod wrapped;

#[allow(unused_imports)]
pub use merge::{combine_caches, merge, MergedDataset};
#[allow(unused_imports)]
pub use wrapped::{
    compute,
    LongestSessionStats,
    ModelRank,
    MostActiveDay,
    ProjectRank,
    StreakStats,
    WeekdayHistogram,
    WrappedStats,
    WrappedTotals,
};

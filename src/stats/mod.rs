//! Stats module - histogram binning and descriptive statistics

mod calculator;

pub use calculator::{Bucket, StatsCalculator, SummaryStats, HISTOGRAM_BUCKETS};

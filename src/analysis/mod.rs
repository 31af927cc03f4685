//! Listing analysis: field normalization, summary statistics and chart series.
//!
//! All functions are pure and deterministic over an in-memory collection;
//! running them twice on the same input yields identical output.

pub mod aggregate;
pub mod normalize;
pub mod outliers;
pub mod series;

use serde::{Deserialize, Serialize};

use crate::models::{
    ConditionCounts, DatePoint, FeedbackPoint, Listing, PricePoint, Projected, SummaryStatistics,
};

pub use aggregate::summarize;
pub use normalize::{classify_condition, normalize_price};
pub use outliers::remove_price_outliers;

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Statistics and all four chart projections for one result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub statistics: SummaryStatistics,
    pub price_distribution: Projected<PricePoint>,
    pub price_vs_feedback: Projected<FeedbackPoint>,
    pub price_vs_date: Projected<DatePoint>,
    pub condition_counts: ConditionCounts,
}

impl Dashboard {
    pub fn build(listings: &[Listing]) -> Self {
        Self {
            statistics: summarize(listings),
            price_distribution: series::price_distribution(listings),
            price_vs_feedback: series::price_vs_feedback(listings),
            price_vs_date: series::price_vs_date(listings),
            condition_counts: series::condition_counts(listings),
        }
    }
}

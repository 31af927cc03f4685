use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SummaryStatistics
// ---------------------------------------------------------------------------

/// Aggregate figures over a listing collection.
///
/// `count` is the total number of listings; the price figures are computed
/// over the `priced` subset only and are `None` when that subset is empty.
/// Values are unrounded; use [`format_amount`](crate::presentation::format_amount)
/// for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub priced: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStatistics {
    /// Number of listings left out of the price figures.
    pub fn unpriced(&self) -> usize {
        self.count - self.priced
    }

    pub fn has_prices(&self) -> bool {
        self.priced > 0
    }
}

// ---------------------------------------------------------------------------
// Filtered
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filtered<T> {
    pub kept: T,
    pub dropped: usize,
}

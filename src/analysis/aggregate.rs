//! Summary statistics over a listing collection.

use tracing::{debug, warn};

use crate::analysis::normalize::valid_prices;
use crate::models::{Filtered, Listing, SummaryStatistics};

/// Compute count, mean, median, min and max for a collection.
///
/// `count` is the total number of listings. The price figures use only the
/// listings with a valid price and are all `None` when there are none.
pub fn summarize(listings: &[Listing]) -> SummaryStatistics {
    let count = listings.len();
    let Filtered {
        kept: mut prices,
        dropped,
    } = valid_prices(listings);

    if prices.is_empty() {
        warn!(count, "no listing has a usable price; price statistics unavailable");
        return SummaryStatistics {
            count,
            ..Default::default()
        };
    }
    if dropped > 0 {
        debug!(count, dropped, "listings without a usable price left out of statistics");
    }

    prices.sort_by(f64::total_cmp);
    let min = prices[0];
    let max = prices[prices.len() - 1];

    SummaryStatistics {
        count,
        priced: prices.len(),
        // Summation error can push the mean a hair past the extremes.
        mean: mean(&prices).map(|m| m.clamp(min, max)),
        median: median_sorted(&prices),
        min: Some(min),
        max: Some(max),
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        // Prices near f64::MAX overflow the plain sum.
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Median of an unsorted slice, `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        Some(lo + (hi - lo) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

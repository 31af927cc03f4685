//! Interquartile-range filtering of price outliers.

use tracing::debug;

use crate::analysis::normalize::normalize_price;
use crate::models::Listing;

/// Minimum number of prices needed before quartiles are meaningful.
const MIN_SAMPLES: usize = 4;

/// Remove listings whose price lies outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
///
/// Collections with fewer than four listings, or fewer than four valid
/// prices, are returned unchanged. Listings without a valid price are kept.
/// Input order is preserved.
pub fn remove_price_outliers(listings: Vec<Listing>) -> Vec<Listing> {
    if listings.len() < MIN_SAMPLES {
        return listings;
    }

    let mut prices: Vec<f64> = listings.iter().filter_map(normalize_price).collect();
    if prices.len() < MIN_SAMPLES {
        return listings;
    }
    prices.sort_by(f64::total_cmp);

    let Some((lower, upper)) = iqr_bounds(&prices) else {
        return listings;
    };

    let before = listings.len();
    let kept: Vec<Listing> = listings
        .into_iter()
        .filter(|l| normalize_price(l).map_or(true, |p| lower <= p && p <= upper))
        .collect();

    debug!(
        removed = before - kept.len(),
        lower, upper, "price outliers removed"
    );
    kept
}

/// Tukey fences for an ascending slice, using exclusive-method quartiles.
pub fn iqr_bounds(sorted: &[f64]) -> Option<(f64, f64)> {
    let [q1, _, q3] = quartiles(sorted)?;
    let iqr = q3 - q1;
    Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}

/// Quartile cut points of an ascending slice (exclusive method: positions
/// over `n + 1` with linear interpolation). Needs at least two values.
pub fn quartiles(sorted: &[f64]) -> Option<[f64; 3]> {
    let len = sorted.len();
    if len < 2 {
        return None;
    }
    let m = len + 1;
    let mut cuts = [0.0; 3];
    for (k, cut) in cuts.iter_mut().enumerate() {
        let i = k + 1;
        let j = (i * m / 4).clamp(1, len - 1);
        let delta = (i * m) as f64 - (j * 4) as f64;
        *cut = (sorted[j - 1] * (4.0 - delta) + sorted[j] * delta) / 4.0;
    }
    Some(cuts)
}

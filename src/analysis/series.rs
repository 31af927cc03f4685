//! Chart series derivation.
//!
//! Each projection decides membership on its own: a listing with a price but
//! no creation date still appears in the price distribution, just not in the
//! price-vs-date series.

use tracing::{debug, warn};

use crate::analysis::normalize::{
    listing_condition, normalize_feedback, normalize_listed_at, normalize_price,
};
use crate::models::{
    ConditionCounts, ConditionSeries, DatePoint, FeedbackPoint, Listing, PricePoint, Projected,
    Projection,
};

/// One point per listing with a valid price.
pub fn price_distribution(listings: &[Listing]) -> Projected<PricePoint> {
    project(listings, Projection::PriceDistribution, |l| {
        normalize_price(l).map(|price| PricePoint { price })
    })
}

/// One point per listing with both a valid price and a parseable seller
/// feedback percentage.
pub fn price_vs_feedback(listings: &[Listing]) -> Projected<FeedbackPoint> {
    project(listings, Projection::PriceVsFeedback, |l| {
        let price = normalize_price(l)?;
        let feedback = normalize_feedback(l)?;
        Some(FeedbackPoint { feedback, price })
    })
}

/// One point per listing with both a valid price and a parseable creation date.
pub fn price_vs_date(listings: &[Listing]) -> Projected<DatePoint> {
    project(listings, Projection::PriceVsDate, |l| {
        let listed = normalize_listed_at(l)?;
        let price = normalize_price(l)?;
        Some(DatePoint { listed, price })
    })
}

/// Listing count per condition category. Never drops a listing.
pub fn condition_counts(listings: &[Listing]) -> ConditionCounts {
    let mut counts = ConditionCounts::default();
    for listing in listings {
        counts.increment(listing_condition(listing));
    }
    counts
}

fn project<P>(
    listings: &[Listing],
    projection: Projection,
    point: impl Fn(&Listing) -> Option<P>,
) -> Projected<P> {
    let mut series = ConditionSeries::default();
    let mut dropped = 0;

    for listing in listings {
        match point(listing) {
            Some(p) => series.push(listing_condition(listing), p),
            None => dropped += 1,
        }
    }

    if series.is_empty() {
        warn!(
            projection = projection.slug(),
            dropped, "no valid points to plot"
        );
        return Projected::NoData { dropped };
    }

    debug!(
        projection = projection.slug(),
        points = series.len(),
        dropped,
        "projection built"
    );
    Projected::Data { series, dropped }
}

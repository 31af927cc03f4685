//! Field extraction from untrusted listing records.
//!
//! Every function here is total: malformed or missing input yields `None`
//! (or [`ConditionCategory::Other`]) rather than an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{ConditionCategory, CreationDate, Filtered, Listing};

/// Parse the leading decimal number of `text`.
///
/// Leading whitespace is skipped and the longest prefix that forms a decimal
/// number (optional sign, digits with an optional fraction, optional
/// exponent) is used, so `"29.99 USD"` parses as `29.99` while `"$5"` and
/// `"abc"` do not parse. Non-finite results are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric price of a listing, or `None` when it is absent or unparseable.
pub fn normalize_price(listing: &Listing) -> Option<f64> {
    listing.price.text().and_then(parse_number)
}

/// Classify free-text condition into New, Used or Other.
///
/// Case-insensitive substring match, checked in order: `NEW`, then `USED` or
/// `PRE-OWNED`, else Other.
pub fn classify_condition(condition: Option<&str>) -> ConditionCategory {
    let upper = condition.unwrap_or_default().to_uppercase();
    if upper.contains("NEW") {
        ConditionCategory::New
    } else if upper.contains("USED") || upper.contains("PRE-OWNED") {
        ConditionCategory::Used
    } else {
        ConditionCategory::Other
    }
}

/// Condition category of a listing.
pub fn listing_condition(listing: &Listing) -> ConditionCategory {
    classify_condition(listing.condition.as_deref())
}

/// Seller positive feedback percentage of a listing.
pub fn normalize_feedback(listing: &Listing) -> Option<f64> {
    listing.seller_feedback().and_then(parse_number)
}

/// Creation time of a listing.
pub fn normalize_listed_at(listing: &Listing) -> Option<DateTime<Utc>> {
    listing.created.as_ref().and_then(parse_creation_date)
}

/// Parse a creation date.
///
/// Accepts RFC 3339 timestamps, zone-less `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (taken as UTC), bare `YYYY-MM-DD` dates (midnight UTC) and epoch
/// milliseconds.
pub fn parse_creation_date(date: &CreationDate) -> Option<DateTime<Utc>> {
    match date {
        CreationDate::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
        CreationDate::Text(text) => {
            let s = text.trim();
            if s.is_empty() {
                return None;
            }
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .ok()
                        .map(|n| n.and_utc())
                })
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|n| n.and_utc())
                })
        }
    }
}

/// Valid prices of a collection, in input order, with the number of
/// listings that had none.
pub fn valid_prices(listings: &[Listing]) -> Filtered<Vec<f64>> {
    let kept: Vec<f64> = listings.iter().filter_map(normalize_price).collect();
    Filtered {
        dropped: listings.len() - kept.len(),
        kept,
    }
}

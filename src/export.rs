//! CSV export of a result set.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{InsightsError, Result};
use crate::models::Listing;

const HEADERS: [&str; 7] = ["#", "Title", "Price", "Condition", "Link", "Seller", "Category"];
const NOT_AVAILABLE: &str = "N/A";

/// Render listings as CSV with every field quoted and `\n` between rows.
pub fn listings_to_csv(listings: &[Listing]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;
    for (idx, listing) in listings.iter().enumerate() {
        let seller = match listing.seller_name() {
            Some(name) => format!(
                "{name} ({}%)",
                listing.seller_feedback().unwrap_or(NOT_AVAILABLE)
            ),
            None => NOT_AVAILABLE.to_string(),
        };
        wtr.write_record([
            (idx + 1).to_string(),
            or_na(listing.title.as_deref()),
            or_na(listing.price.text()),
            or_na(listing.condition.as_deref()),
            or_na(listing.web_url.as_deref()),
            seller,
            or_na(listing.category.as_deref()),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| InsightsError::Io(e.into_error()))?;
    let mut csv =
        String::from_utf8(bytes).map_err(|e| InsightsError::InvalidArgument(e.to_string()))?;
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}

/// Download filename for a query's results.
///
/// Each run of characters outside `[A-Za-z0-9_-]` becomes a single `-`.
pub fn csv_filename(query: &str) -> String {
    let mut safe = String::new();
    let mut in_run = false;
    for c in query.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            safe.push(c);
            in_run = false;
        } else if !in_run {
            safe.push('-');
            in_run = true;
        }
    }

    if safe.is_empty() {
        "ebay-results.csv".to_string()
    } else {
        format!("{safe}-results.csv")
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

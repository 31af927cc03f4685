//! Presentation adapter: display text for metrics and table rows, chart
//! specifications, and ownership of live charts.

pub mod charts;
pub mod table;

use serde::Serialize;

use crate::models::SummaryStatistics;

pub use charts::{ChartBackend, ChartKind, ChartSlots, ChartSpec, Dataset, JsonFileBackend};
pub use table::{table_rows, TableRow};

/// Placeholder shown for any value that is not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Values this large carry no fractional cents.
const WHOLE_CENTS: f64 = 4_503_599_627_370_496.0; // 2^52

/// Round to two decimals, halves away from zero.
pub fn round_cents(value: f64) -> f64 {
    if value.abs() >= WHOLE_CENTS {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// `"$12.34"` for a value, `"N/A"` for none.
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${:.2}", round_cents(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// MetricCards
// ---------------------------------------------------------------------------

/// Display text for the five dashboard metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCards {
    pub total_listings: String,
    pub average_price: String,
    pub median_price: String,
    pub min_price: String,
    pub max_price: String,
}

impl From<&SummaryStatistics> for MetricCards {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            total_listings: stats.count.to_string(),
            average_price: format_amount(stats.mean),
            median_price: format_amount(stats.median),
            min_price: format_amount(stats.min),
            max_price: format_amount(stats.max),
        }
    }
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

/// Lowercase the text, then uppercase the first character of each
/// space-separated word.
pub fn capitalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn dashboard_title(query: &str) -> String {
    format!("Overview: {}", capitalize_words(query))
}

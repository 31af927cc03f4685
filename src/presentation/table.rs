use serde::Serialize;

use crate::models::Listing;
use crate::presentation::NOT_AVAILABLE;

/// Display text for one row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub number: usize,
    pub title: String,
    pub price: String,
    pub condition: String,
    pub link: String,
    pub seller: String,
    pub category: String,
}

impl TableRow {
    /// Build the row for the listing at zero-based `index`.
    pub fn from_listing(index: usize, listing: &Listing) -> Self {
        let price = match listing.price.text() {
            Some(value) if !value.is_empty() => {
                let symbol = match listing.price.currency() {
                    None | Some("") | Some("USD") => "$",
                    Some(code) => code,
                };
                format!("{symbol}{value}")
            }
            _ => NOT_AVAILABLE.to_string(),
        };

        let seller = match listing.seller_name() {
            Some(name) if !name.is_empty() => format!(
                "{name} ({}%)",
                listing
                    .seller_feedback()
                    .filter(|f| !f.is_empty())
                    .unwrap_or(NOT_AVAILABLE)
            ),
            _ => NOT_AVAILABLE.to_string(),
        };

        Self {
            number: index + 1,
            title: text_or_na(listing.title.as_deref()),
            price,
            condition: text_or_na(listing.condition.as_deref()),
            link: text_or_na(listing.web_url.as_deref()),
            seller,
            category: text_or_na(listing.category.as_deref()),
        }
    }

    pub fn cells(&self) -> [String; 7] {
        [
            self.number.to_string(),
            self.title.clone(),
            self.price.clone(),
            self.condition.clone(),
            self.link.clone(),
            self.seller.clone(),
            self.category.clone(),
        ]
    }
}

pub fn table_rows(listings: &[Listing]) -> Vec<TableRow> {
    listings
        .iter()
        .enumerate()
        .map(|(i, l)| TableRow::from_listing(i, l))
        .collect()
}

fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

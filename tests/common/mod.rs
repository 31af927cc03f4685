//! Shared test fixtures for the listing-insights integration tests.
//!
//! Provides sample search responses covering every record shape the
//! marketplace and the legacy proxy produce, plus a temp-dir backed
//! `ListingInsights` for store tests.

#![allow(dead_code)]

use listing_insights::{Listing, ListingInsights};
use serde_json::{json, Value};

/// Build a listing from a JSON fixture.
pub fn listing(value: Value) -> Listing {
    Listing::from_json(&value)
}

/// Build listings from JSON fixtures.
pub fn listings(values: Vec<Value>) -> Vec<Listing> {
    values.iter().map(Listing::from_json).collect()
}

/// A Browse API style search response with five item summaries:
///
/// | # | price | condition | feedback | created |
/// |---|-------|-----------|----------|---------|
/// | 1 | 29.99 USD (object) | New | 99.5 | 2024-03-01 |
/// | 2 | 15.00 USD (object) | Used | 100.0 | 2024-03-05 |
/// | 3 | 45.50 EUR (object) | Pre-Owned | missing | 2024-02-20 |
/// | 4 | "abc" (bare) | NEW | 97.1 | missing |
/// | 5 | 8 (bare number) | For parts | 88 | unparseable |
pub fn sample_response() -> Value {
    json!({
        "href": "https://api.ebay.com/buy/browse/v1/item_summary/search?q=switch",
        "total": 5,
        "itemSummaries": [
            {
                "itemId": "v1|1001|0",
                "title": "Nintendo Switch OLED - Brand New",
                "price": { "value": "29.99", "currency": "USD" },
                "condition": "New",
                "seller": { "username": "gamestop_outlet", "feedbackPercentage": "99.5", "feedbackScore": 15230 },
                "categories": [{ "categoryId": "139971", "categoryName": "Video Game Consoles" }],
                "itemCreationDate": "2024-03-01T10:15:00.000Z",
                "itemWebUrl": "https://www.ebay.com/itm/1001"
            },
            {
                "itemId": "v1|1002|0",
                "title": "Nintendo Switch Lite",
                "price": { "value": "15.00", "currency": "USD" },
                "condition": "Used",
                "seller": { "username": "retro_resale", "feedbackPercentage": "100.0" },
                "categories": [{ "categoryName": "Video Game Consoles" }],
                "itemCreationDate": "2024-03-05T08:00:00.000Z",
                "itemWebUrl": "https://www.ebay.com/itm/1002"
            },
            {
                "itemId": "v1|1003|0",
                "title": "Switch Pro Controller",
                "price": { "value": "45.50", "currency": "EUR" },
                "condition": "Pre-Owned",
                "seller": { "username": "eu_trader" },
                "categories": [{ "categoryName": "Controllers & Attachments" }],
                "itemCreationDate": "2024-02-20T12:00:00Z"
            },
            {
                "itemId": "v1|1004|0",
                "title": "Switch Game Bundle",
                "price": "abc",
                "condition": "NEW",
                "seller": "bundle_king",
                "sellerFeedback": "97.1",
                "mainCategory": "Video Games"
            },
            {
                "itemId": "v1|1005|0",
                "title": "Broken Joy-Con",
                "price": 8,
                "condition": "For parts or not working",
                "seller": { "username": "fixit", "feedbackPercentage": 88 },
                "itemCreationDate": "sometime last week",
                "item link": "https://www.ebay.com/itm/1005"
            }
        ]
    })
}

/// Listings of [`sample_response`].
pub fn sample_listings() -> Vec<Listing> {
    listing_insights::client::parse_search_response(&sample_response())
}

/// The three-listing example: two priced, one unparseable.
pub fn mixed_listings() -> Vec<Listing> {
    listings(vec![
        json!({ "price": 30, "condition": "NEW" }),
        json!({ "price": 10, "condition": "USED" }),
        json!({ "price": "x", "condition": "NEW" }),
    ])
}

/// A `ListingInsights` backed by a temporary data directory.
///
/// The caller must keep the returned `TempDir` alive for the duration of
/// the test.
pub fn temp_insights() -> (ListingInsights, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let insights = ListingInsights::builder()
        .data_dir(tmp.path())
        .build()
        .unwrap();
    (insights, tmp)
}

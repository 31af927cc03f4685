//! Marketplace listing search and price analysis.
//!
//! Searches the eBay Browse API (or a proxy exposing the same result shape),
//! then turns the heterogeneous result records into summary price statistics
//! and four chart projections split by item condition. A small persistent
//! store keeps the search history and the preferred chart theme.
//!
//! # Quick start
//!
//! ```no_run
//! use listing_insights::ListingInsights;
//!
//! let insights = ListingInsights::builder().build().unwrap();
//!
//! // Search, then analyze the results
//! let results = insights.search("pokemon booster box").unwrap();
//! let dashboard = results.dashboard();
//! println!("median: {:?}", dashboard.statistics.median);
//!
//! // Past searches, most recent first
//! let history = insights.history().list();
//! ```

pub mod analysis;
#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod presentation;
pub mod queries;
pub mod snapshot;
pub mod store;

pub use analysis::Dashboard;
#[cfg(feature = "async")]
pub use async_client::AsyncListingInsights;
pub use client::{Credentials, Endpoint, Environment, SearchClient};
pub use error::{InsightsError, Result};
pub use models::{ConditionCategory, Listing, SummaryStatistics, Theme};
pub use store::KeyValueStore;

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

// ---------------------------------------------------------------------------
// ListingInsightsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ListingInsights`] instance.
///
/// Use [`ListingInsights::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ListingInsightsBuilder::build).
pub struct ListingInsightsBuilder {
    data_dir: Option<PathBuf>,
    endpoint: Endpoint,
    credentials: Option<Credentials>,
    timeout: Duration,
    remove_outliers: bool,
}

impl Default for ListingInsightsBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            endpoint: Endpoint::default(),
            credentials: None,
            timeout: Duration::from_secs(30),
            remove_outliers: true,
        }
    }
}

impl ListingInsightsBuilder {
    /// Set the directory holding the persistent store.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/listing-insights` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Choose where searches are sent. Defaults to the production Browse API.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set Browse API credentials. When not set they are read from
    /// `CLIENT_ID` / `CLIENT_SECRET` on the first search.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Drop IQR price outliers from search results. Defaults to `true`.
    pub fn remove_outliers(mut self, remove: bool) -> Self {
        self.remove_outliers = remove;
        self
    }

    /// Open the store and prepare the search client.
    ///
    /// No network traffic happens until the first search.
    pub fn build(self) -> Result<ListingInsights> {
        let store = KeyValueStore::open(self.data_dir)?;
        let client = SearchClient::new(self.endpoint, self.credentials, self.timeout);
        Ok(ListingInsights {
            store: RefCell::new(store),
            client: RefCell::new(client),
            remove_outliers: self.remove_outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// SearchResults
// ---------------------------------------------------------------------------

/// Listings returned for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub listings: Vec<Listing>,
}

impl SearchResults {
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(&self.listings)
    }

    pub fn title(&self) -> String {
        presentation::dashboard_title(&self.query)
    }

    pub fn table(&self) -> Vec<presentation::TableRow> {
        presentation::table_rows(&self.listings)
    }

    pub fn to_csv(&self) -> Result<String> {
        export::listings_to_csv(&self.listings)
    }

    pub fn csv_filename(&self) -> String {
        export::csv_filename(&self.query)
    }
}

// ---------------------------------------------------------------------------
// ListingInsights
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`KeyValueStore`] and the [`SearchClient`] and exposes history
/// and preference interfaces as lightweight borrowing wrappers.
///
/// Created via [`ListingInsights::builder()`].
pub struct ListingInsights {
    store: RefCell<KeyValueStore>,
    client: RefCell<SearchClient>,
    remove_outliers: bool,
}

impl ListingInsights {
    /// Create a new builder.
    pub fn builder() -> ListingInsightsBuilder {
        ListingInsightsBuilder::default()
    }

    /// Access the search history.
    pub fn history(&self) -> queries::history::HistoryQuery<'_> {
        queries::history::HistoryQuery::new(&self.store)
    }

    /// Access the display preferences.
    pub fn preferences(&self) -> queries::preferences::PreferenceQuery<'_> {
        queries::preferences::PreferenceQuery::new(&self.store)
    }

    /// Search for `query` and record it in the history.
    ///
    /// The query is trimmed and validated first. Price outliers are removed
    /// when enabled. An empty result set is reported as
    /// [`InsightsError::NoResults`] and is not recorded.
    pub fn search(&self, query: &str) -> Result<SearchResults> {
        let query = client::validate_query(query)?;
        let mut listings = self.client.borrow_mut().search(&query)?;

        if self.remove_outliers {
            let before = listings.len();
            listings = analysis::remove_price_outliers(listings);
            if listings.len() != before {
                info!(removed = before - listings.len(), "price outliers removed");
            }
        }

        if listings.is_empty() {
            return Err(InsightsError::NoResults(
                "No results found. Try a different search term.".into(),
            ));
        }

        self.history().record(&query)?;
        Ok(SearchResults { query, listings })
    }

    /// Summary statistics and chart series for a listing collection.
    pub fn analyze(&self, listings: &[Listing]) -> Dashboard {
        Dashboard::build(listings)
    }

    /// Where searches are sent.
    pub fn endpoint(&self) -> Endpoint {
        self.client.borrow().endpoint().clone()
    }

    /// Directory holding the persistent store.
    pub fn data_dir(&self) -> PathBuf {
        self.store.borrow().data_dir.clone()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ListingInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        write!(
            f,
            "ListingInsights(endpoint={}, data_dir={}, remove_outliers={})",
            self.client.borrow().endpoint(),
            store.data_dir.display(),
            self.remove_outliers
        )
    }
}

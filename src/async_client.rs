//! Async wrapper around [`ListingInsights`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client and the file store do their work.
//!
//! # Example
//!
//! ```no_run
//! use listing_insights::AsyncListingInsights;
//!
//! #[tokio::main]
//! async fn main() {
//!     let insights = AsyncListingInsights::builder().build().await.unwrap();
//!
//!     let results = insights.search("mechanical keyboard").await.unwrap();
//!     let dashboard = results.dashboard();
//!
//!     // Any sync method via closure
//!     let history = insights.run(|s| Ok(s.history().list())).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::{Credentials, Endpoint};
use crate::error::{InsightsError, Result};
use crate::models::HistoryEntry;
use crate::{ListingInsights, SearchResults};

// ---------------------------------------------------------------------------
// AsyncListingInsightsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncListingInsights`] instance.
#[derive(Default)]
pub struct AsyncListingInsightsBuilder {
    data_dir: Option<PathBuf>,
    endpoint: Option<Endpoint>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    remove_outliers: Option<bool>,
}

impl AsyncListingInsightsBuilder {
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn remove_outliers(mut self, remove: bool) -> Self {
        self.remove_outliers = Some(remove);
        self
    }

    /// Build the async wrapper. Opening the store runs on the blocking
    /// thread pool.
    pub async fn build(self) -> Result<AsyncListingInsights> {
        tokio::task::spawn_blocking(move || {
            let mut builder = ListingInsights::builder();
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            if let Some(endpoint) = self.endpoint {
                builder = builder.endpoint(endpoint);
            }
            if let Some(credentials) = self.credentials {
                builder = builder.credentials(credentials);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(remove) = self.remove_outliers {
                builder = builder.remove_outliers(remove);
            }
            let insights = builder.build()?;
            Ok(AsyncListingInsights {
                inner: Arc::new(Mutex::new(insights)),
            })
        })
        .await
        .map_err(|e| InsightsError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncListingInsights
// ---------------------------------------------------------------------------

/// Async wrapper around [`ListingInsights`].
///
/// The underlying instance is protected by a [`Mutex`] since it uses
/// `RefCell` internally; every call is dispatched to the blocking pool.
pub struct AsyncListingInsights {
    inner: Arc<Mutex<ListingInsights>>,
}

impl AsyncListingInsights {
    pub fn builder() -> AsyncListingInsightsBuilder {
        AsyncListingInsightsBuilder::default()
    }

    /// Run a sync operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ListingInsights) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let insights = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = insights
                .lock()
                .map_err(|_| InsightsError::InvalidArgument("lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| InsightsError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Search asynchronously. See [`ListingInsights::search`].
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.to_string();
        self.run(move |s| s.search(&query)).await
    }

    /// Past searches, most recent first.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.run(|s| Ok(s.history().list())).await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.run(|s| s.history().clear()).await
    }

    /// Release the instance on the blocking pool, where dropping the
    /// blocking HTTP client is allowed.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let insights = self
                .inner
                .lock()
                .map_err(|_| InsightsError::InvalidArgument("lock poisoned".into()))?;
            drop(insights);
            Ok(())
        })
        .await
        .map_err(|e| InsightsError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

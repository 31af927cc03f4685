//! Query modules over the persistent store.
//!
//! Each module provides a query struct that borrows the
//! [`KeyValueStore`](crate::store::KeyValueStore) owned by
//! [`ListingInsights`](crate::ListingInsights).

pub mod history;
pub mod preferences;

pub use history::HistoryQuery;
pub use preferences::PreferenceQuery;

use std::path::PathBuf;

pub const PRODUCTION_API_BASE: &str = "https://api.ebay.com";
pub const SANDBOX_API_BASE: &str = "https://api.sandbox.ebay.com";
pub const TOKEN_PATH: &str = "/identity/v1/oauth2/token";
pub const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";
pub const OAUTH_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";
pub const MARKETPLACE_ID: &str = "EBAY_US";

/// Maximum number of item summaries requested per search.
pub const SEARCH_LIMIT: usize = 200;
/// Longest accepted search query, in characters.
pub const MAX_QUERY_CHARS: usize = 80;
/// Number of entries kept in the search history.
pub const HISTORY_LIMIT: usize = 20;

pub const HISTORY_KEY: &str = "ebaySearchHistory";
pub const THEME_KEY: &str = "theme";
pub const STORE_FILE: &str = "storage.json";

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("listing-insights")
    } else {
        PathBuf::from(".listing-insights")
    }
}

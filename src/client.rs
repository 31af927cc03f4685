//! Marketplace search client.
//!
//! Talks either to the eBay Browse API directly (client-credentials OAuth,
//! then `item_summary/search`) or to a JSON proxy that accepts
//! `{"query": ...}` and answers with the same `itemSummaries` shape.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config;
use crate::error::{InsightsError, Result};
use crate::models::Listing;

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => config::PRODUCTION_API_BASE,
            Environment::Sandbox => config::SANDBOX_API_BASE,
        }
    }
}

/// Where searches are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// The eBay Browse API; requires [`Credentials`].
    Browse(Environment),
    /// A backend that proxies the Browse API at the given URL.
    Proxy(String),
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::Browse(Environment::default())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Browse(env) => write!(f, "{}{}", env.base_url(), config::SEARCH_PATH),
            Endpoint::Proxy(url) => f.write_str(url),
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// OAuth application credentials for the Browse API.
#[derive(Debug)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Read `CLIENT_ID` and `CLIENT_SECRET` from the environment.
    pub fn from_env() -> Result<Self> {
        match (
            std::env::var(config::CLIENT_ID_VAR),
            std::env::var(config::CLIENT_SECRET_VAR),
        ) {
            (Ok(id), Ok(secret)) if !id.is_empty() && !secret.is_empty() => {
                Ok(Self::new(id, secret))
            }
            _ => Err(InsightsError::Auth(format!(
                "Missing {} / {}",
                config::CLIENT_ID_VAR,
                config::CLIENT_SECRET_VAR
            ))),
        }
    }
}

struct AccessToken {
    value: SecretString,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

// ---------------------------------------------------------------------------
// SearchClient
// ---------------------------------------------------------------------------

/// Blocking search client with a lazily built HTTP client and a cached
/// access token.
pub struct SearchClient {
    endpoint: Endpoint,
    credentials: Option<Credentials>,
    timeout: Duration,
    http: Option<Client>,
    token: Option<AccessToken>,
}

impl SearchClient {
    /// Create a client. For [`Endpoint::Browse`], credentials left as `None`
    /// are read from the environment on the first search.
    pub fn new(endpoint: Endpoint, credentials: Option<Credentials>, timeout: Duration) -> Self {
        Self {
            endpoint,
            credentials,
            timeout,
            http: None,
            token: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Lazy HTTP client, created on first use.
    fn http(&mut self) -> Result<Client> {
        if let Some(client) = &self.http {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        self.http = Some(client.clone());
        Ok(client)
    }

    /// Return a valid access token, requesting a new one if the cached one
    /// has expired.
    fn access_token(&mut self, env: Environment) -> Result<String> {
        if let Some(token) = &self.token {
            if Instant::now() < token.expires_at {
                return Ok(token.value.expose_secret().to_string());
            }
        }

        if self.credentials.is_none() {
            self.credentials = Some(Credentials::from_env()?);
        }
        let client = self.http()?;
        let Some(creds) = &self.credentials else {
            return Err(InsightsError::Auth("no credentials configured".into()));
        };

        let url = format!("{}{}", env.base_url(), config::TOKEN_PATH);
        debug!(%url, "requesting access token");
        let resp = client
            .post(&url)
            .basic_auth(&creds.client_id, Some(creds.client_secret.expose_secret()))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", config::OAUTH_SCOPE),
            ])
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(InsightsError::Auth(format!("{status}: {body}")));
        }

        let token: TokenResponse = resp.json()?;
        // Renew a minute before expiry.
        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(7200).saturating_sub(60));
        let value = token.access_token;
        self.token = Some(AccessToken {
            value: SecretString::from(value.clone()),
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    /// Run a search and decode the returned listings.
    ///
    /// The query is validated with [`validate_query`] first. An empty result
    /// list is returned as-is; deciding what an empty result means is left to
    /// the caller.
    pub fn search(&mut self, query: &str) -> Result<Vec<Listing>> {
        let query = validate_query(query)?;
        let client = self.http()?;

        let resp = match self.endpoint.clone() {
            Endpoint::Browse(env) => {
                let token = self.access_token(env)?;
                let url = format!("{}{}", env.base_url(), config::SEARCH_PATH);
                let limit = config::SEARCH_LIMIT.to_string();
                client
                    .get(&url)
                    .bearer_auth(token)
                    .header("X-EBAY-C-MARKETPLACE-ID", config::MARKETPLACE_ID)
                    .query(&[
                        ("q", query.as_str()),
                        ("auto_correct", "KEYWORD"),
                        ("limit", limit.as_str()),
                    ])
                    .send()?
            }
            Endpoint::Proxy(url) => client.post(&url).json(&json!({ "query": query })).send()?,
        };

        let body: Value = check_status(resp)?.json()?;
        let listings = parse_search_response(&body);
        info!(%query, results = listings.len(), "search completed");
        Ok(listings)
    }
}

/// Turn a non-success response into [`InsightsError::Api`].
///
/// The message is taken from a proxy's `details` field or the first entry of
/// the Browse API's `errors` array, falling back to the status reason.
fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body: Value = resp.json().unwrap_or(Value::Null);
    let message = body
        .get("details")
        .and_then(|v| v.as_str())
        .or_else(|| {
            body.get("errors")
                .and_then(|e| e.get(0))
                .and_then(|e| e.get("message"))
                .and_then(|v| v.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(InsightsError::Api {
        status: status.as_u16(),
        message,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim a raw query and reject blank or overlong ones.
pub fn validate_query(raw: &str) -> Result<String> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(InsightsError::InvalidArgument(
            "Please enter a product name to search.".into(),
        ));
    }
    if query.chars().count() > config::MAX_QUERY_CHARS {
        return Err(InsightsError::InvalidArgument(format!(
            "Please keep searches under {} characters",
            config::MAX_QUERY_CHARS
        )));
    }
    Ok(query.to_string())
}

/// Decode the `itemSummaries` array of a search response.
///
/// A missing or non-array `itemSummaries` is an empty result.
pub fn parse_search_response(body: &Value) -> Vec<Listing> {
    body.get("itemSummaries")
        .and_then(|v| v.as_array())
        .map(|items| items.iter().map(Listing::from_json).collect())
        .unwrap_or_default()
}

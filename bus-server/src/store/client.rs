//! HTTP client for the hosted Postgres REST API.
//!
//! All persistence lives in a managed backend that exposes tables and
//! views over a PostgREST-style interface. The server reads two
//! relations:
//!
//! - `trip_stop_search`: a view flattening stops, trips, cooperatives,
//!   and terminals into one row per stop per trip (see
//!   [`StopRecord`](crate::domain::StopRecord)).
//! - `terminal_directory`: terminals with their city and optional alias,
//!   for the search box.
//!
//! Authentication is a project API key sent on every request. A semaphore
//! bounds concurrent requests so a burst of searches cannot exhaust the
//! upstream connection pool.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{StopRecord, TerminalId, TripId};

use super::error::StoreError;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// A terminal row from the `terminal_directory` relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalDto {
    pub id: TerminalId,

    /// Official terminal name, e.g. "Terminal Terrestre Quitumbe".
    pub terminal_name: String,

    /// City the terminal serves.
    pub city_name: String,

    /// Short alias distinguishing terminals in the same city
    /// (e.g. "Norte"); `None` for a city's main terminal.
    #[serde(default)]
    pub alias: Option<String>,
}

impl TerminalDto {
    /// Human-readable label, e.g. `"Quito (Quitumbe)"` or `"Ambato (Matriz)"`.
    ///
    /// Terminals without an alias are the city's main office ("Matriz"),
    /// matching how the public site has always displayed them.
    pub fn label(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} ({})", self.city_name, alias),
            None => format!("{} (Matriz)", self.city_name),
        }
    }
}

/// Configuration for the store client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the hosted project (no trailing slash).
    pub base_url: String,
    /// Project API key.
    pub api_key: String,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Create a new config with the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the hosted data store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl StoreClient {
    /// Create a new store client with the given configuration.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| StoreError::Client {
            message: "API key contains invalid header characters".to_string(),
        })?;
        headers.insert(HeaderName::from_static("apikey"), api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch the stop rows for every trip touching either terminal.
    ///
    /// This is the aggregator's input: one row per stop per trip, filtered
    /// to stops at `origin` or `destination`. Trips touching only one of
    /// the two come back too; the aggregator excludes them.
    pub async fn fetch_search_stops(
        &self,
        origin: TerminalId,
        destination: TerminalId,
    ) -> Result<Vec<StopRecord>, StoreError> {
        let url = format!("{}/rest/v1/trip_stop_search", self.base_url);
        let filter = format!("in.({},{})", origin, destination);

        debug!(%origin, %destination, "fetching search stops");
        self.get_json(&url, &[("terminal_id", filter.as_str())])
            .await
    }

    /// Fetch the full ordered stop list for one trip.
    ///
    /// Used for the itinerary detail view; the rows are rendered directly
    /// without aggregation.
    pub async fn fetch_trip_stops(&self, trip: TripId) -> Result<Vec<StopRecord>, StoreError> {
        let url = format!("{}/rest/v1/trip_stop_search", self.base_url);
        let filter = format!("eq.{trip}");

        debug!(%trip, "fetching trip itinerary");
        self.get_json(
            &url,
            &[
                ("trip_id", filter.as_str()),
                ("order", "sequence_order.asc"),
            ],
        )
        .await
    }

    /// Fetch all terminals for the directory.
    pub async fn fetch_terminals(&self) -> Result<Vec<TerminalDto>, StoreError> {
        let url = format!("{}/rest/v1/terminal_directory", self.base_url);
        self.get_json(&url, &[("order", "city_name.asc")]).await
    }

    /// Issue a GET request and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StoreError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| StoreError::Client {
            message: "request limiter closed".to_string(),
        })?;

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StoreError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| StoreError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

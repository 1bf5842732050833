//! Caching layer for store responses.
//!
//! Schedules change rarely but every visitor search hits the same handful
//! of terminal pairs, so a short TTL cache absorbs most of the read
//! traffic. Entries are `Arc`-shared: concurrent requests for the same
//! pair clone a pointer, not the rows.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{StopRecord, TerminalId, TripId};
use crate::store::{StoreClient, StoreError};

/// Cache key for a terminal-pair search: (origin, destination).
/// Direction matters; the reverse pair is a different query.
type SearchKey = (TerminalId, TerminalId);

/// Cached stop rows, shared across requests.
type StopsEntry = Arc<Vec<StopRecord>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache for store responses.
pub struct StoreCache {
    /// Search rows keyed by (origin, destination).
    searches: MokaCache<SearchKey, StopsEntry>,

    /// Itinerary rows keyed by trip id.
    itineraries: MokaCache<TripId, StopsEntry>,
}

impl StoreCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let itineraries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            searches,
            itineraries,
        }
    }

    /// Get a cached search entry.
    pub async fn get_search(&self, key: &SearchKey) -> Option<StopsEntry> {
        self.searches.get(key).await
    }

    /// Insert a search entry.
    pub async fn insert_search(&self, key: SearchKey, entry: StopsEntry) {
        self.searches.insert(key, entry).await;
    }

    /// Get a cached itinerary entry.
    pub async fn get_itinerary(&self, trip: &TripId) -> Option<StopsEntry> {
        self.itineraries.get(trip).await
    }

    /// Insert an itinerary entry.
    pub async fn insert_itinerary(&self, trip: TripId, entry: StopsEntry) {
        self.itineraries.insert(trip, entry).await;
    }

    /// Total cached entries across both caches (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.searches.entry_count() + self.itineraries.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
        self.itineraries.invalidate_all();
    }
}

/// Store client with caching.
///
/// Wraps a [`StoreClient`] and caches search and itinerary responses.
pub struct CachedStoreClient {
    client: StoreClient,
    cache: StoreCache,
}

impl CachedStoreClient {
    /// Create a new cached client.
    pub fn new(client: StoreClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: StoreCache::new(cache_config),
        }
    }

    /// Get the stop rows for a terminal-pair search, using cache if fresh.
    pub async fn search_stops(
        &self,
        origin: TerminalId,
        destination: TerminalId,
    ) -> Result<StopsEntry, StoreError> {
        let key = (origin, destination);

        if let Some(cached) = self.cache.get_search(&key).await {
            return Ok(cached);
        }

        let rows = self.client.fetch_search_stops(origin, destination).await?;
        let entry = Arc::new(rows);

        self.cache.insert_search(key, entry.clone()).await;
        Ok(entry)
    }

    /// Get the ordered stop rows for one trip, using cache if fresh.
    pub async fn trip_stops(&self, trip: TripId) -> Result<StopsEntry, StoreError> {
        if let Some(cached) = self.cache.get_itinerary(&trip).await {
            return Ok(cached);
        }

        let rows = self.client.fetch_trip_stops(trip).await?;
        let entry = Arc::new(rows);

        self.cache.insert_itinerary(trip, entry.clone()).await;
        Ok(entry)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fare;

    fn sample_entry() -> StopsEntry {
        Arc::new(vec![StopRecord {
            trip_id: TripId(1),
            sequence_order: 1,
            terminal_id: TerminalId(10),
            terminal_name: "Terminal 10".to_string(),
            estimated_time: "08:00".to_string(),
            day_offset: 0,
            cumulative_fare: Fare::ZERO,
            sellable: true,
            cooperative_name: "Trans Andina".to_string(),
            cooperative_logo_url: None,
            service_class: "Ejecutivo".to_string(),
        }])
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn search_cache_roundtrip() {
        let cache = StoreCache::new(&CacheConfig::default());
        let key = (TerminalId(10), TerminalId(20));

        assert!(cache.get_search(&key).await.is_none());

        let entry = sample_entry();
        cache.insert_search(key, entry.clone()).await;

        let cached = cache.get_search(&key).await.unwrap();
        assert!(Arc::ptr_eq(&cached, &entry));

        // The reverse direction is a different query.
        let reverse = (TerminalId(20), TerminalId(10));
        assert!(cache.get_search(&reverse).await.is_none());
    }

    #[tokio::test]
    async fn itinerary_cache_roundtrip() {
        let cache = StoreCache::new(&CacheConfig::default());

        assert!(cache.get_itinerary(&TripId(1)).await.is_none());

        let entry = sample_entry();
        cache.insert_itinerary(TripId(1), entry.clone()).await;

        assert!(cache.get_itinerary(&TripId(1)).await.is_some());
        assert!(cache.get_itinerary(&TripId(2)).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_clears_both_caches() {
        let cache = StoreCache::new(&CacheConfig::default());

        cache
            .insert_search((TerminalId(1), TerminalId(2)), sample_entry())
            .await;
        cache.insert_itinerary(TripId(1), sample_entry()).await;

        cache.invalidate_all();

        assert!(cache.get_search(&(TerminalId(1), TerminalId(2))).await.is_none());
        assert!(cache.get_itinerary(&TripId(1)).await.is_none());
    }
}

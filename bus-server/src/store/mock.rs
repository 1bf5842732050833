//! Mock store client for development and tests without store access.
//!
//! Loads fixture rows from JSON files and answers the same queries as
//! [`StoreClient`](super::StoreClient), filtering in memory.

use std::path::Path;

use crate::domain::{StopRecord, TerminalId, TripId};

use super::client::TerminalDto;
use super::error::StoreError;

/// Mock store client that serves data from JSON fixture files.
///
/// Expects a directory containing `stops.json` (an array of stop rows,
/// covering whole trips) and `terminals.json` (an array of terminal rows).
#[derive(Debug, Clone)]
pub struct MockStoreClient {
    stops: Vec<StopRecord>,
    terminals: Vec<TerminalDto>,
}

impl MockStoreClient {
    /// Create a new mock client by loading fixtures from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();

        let stops = load_json(&data_dir.join("stops.json"))?;
        let terminals = load_json(&data_dir.join("terminals.json"))?;

        Ok(Self { stops, terminals })
    }

    /// Create a mock client directly from rows (for tests).
    pub fn from_rows(stops: Vec<StopRecord>, terminals: Vec<TerminalDto>) -> Self {
        Self { stops, terminals }
    }

    /// Stop rows for trips touching either terminal.
    ///
    /// Mirrors the store's `terminal_id=in.(origin,destination)` filter:
    /// only the matched rows are returned, not whole trips.
    pub async fn fetch_search_stops(
        &self,
        origin: TerminalId,
        destination: TerminalId,
    ) -> Result<Vec<StopRecord>, StoreError> {
        Ok(self
            .stops
            .iter()
            .filter(|s| s.terminal_id == origin || s.terminal_id == destination)
            .cloned()
            .collect())
    }

    /// Full ordered stop list for one trip.
    pub async fn fetch_trip_stops(&self, trip: TripId) -> Result<Vec<StopRecord>, StoreError> {
        let mut rows: Vec<StopRecord> = self
            .stops
            .iter()
            .filter(|s| s.trip_id == trip)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.sequence_order);
        Ok(rows)
    }

    /// All terminals.
    pub async fn fetch_terminals(&self) -> Result<Vec<TerminalDto>, StoreError> {
        Ok(self.terminals.clone())
    }
}

/// Load and parse one JSON fixture file.
fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let json = std::fs::read_to_string(path).map_err(|e| StoreError::Fixture {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;

    serde_json::from_str(&json).map_err(|e| StoreError::Fixture {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

//! Terminal directory and name search.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::TerminalId;

use super::client::{StoreClient, TerminalDto};
use super::error::StoreError;

/// A directory hit for the search box.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalMatch {
    pub id: TerminalId,
    /// Display label, e.g. "Quito (Quitumbe)".
    pub label: String,
    pub city: String,
    pub terminal_name: String,
}

/// Thread-safe terminal lookup.
///
/// Provides id → terminal mapping and substring search, fetched from the
/// store at startup and refreshed daily in the background.
#[derive(Clone)]
pub struct TerminalDirectory {
    inner: Arc<RwLock<HashMap<TerminalId, TerminalDto>>>,
    client: StoreClient,
}

impl TerminalDirectory {
    /// Create a new directory by fetching from the store.
    ///
    /// This will fail if the store is unreachable.
    pub async fn fetch(client: StoreClient) -> Result<Self, StoreError> {
        let terminals = client.fetch_terminals().await?;

        Ok(Self {
            inner: Arc::new(RwLock::new(build_map(terminals))),
            client,
        })
    }

    /// Create a directory pre-populated with the given entries.
    ///
    /// Useful for tests and for mock mode, where no store is available.
    pub fn from_entries(entries: Vec<TerminalDto>, client: StoreClient) -> Self {
        Self {
            inner: Arc::new(RwLock::new(build_map(entries))),
            client,
        }
    }

    /// Look up a terminal by id.
    pub async fn get(&self, id: TerminalId) -> Option<TerminalDto> {
        let guard = self.inner.read().await;
        guard.get(&id).cloned()
    }

    /// Number of terminals in the directory.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// Whether the directory is empty.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }

    /// Search terminals by city, terminal name, or alias substring.
    ///
    /// Matching is case-insensitive; results are ordered by city then
    /// terminal name so the same query always yields the same list.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<TerminalMatch> {
        let guard = self.inner.read().await;
        search_terminals(guard.values(), query, limit)
    }

    /// Refresh the directory from the store.
    ///
    /// On success, replaces the current mapping and returns the new entry
    /// count. On failure, the existing mapping is preserved and the error
    /// is returned.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let terminals = self.client.fetch_terminals().await?;
        let map = build_map(terminals);
        let count = map.len();

        let mut guard = self.inner.write().await;
        *guard = map;

        Ok(count)
    }
}

/// Build the id → terminal map.
fn build_map(terminals: Vec<TerminalDto>) -> HashMap<TerminalId, TerminalDto> {
    terminals.into_iter().map(|t| (t.id, t)).collect()
}

/// Case-insensitive substring search over directory entries.
fn search_terminals<'a>(
    entries: impl Iterator<Item = &'a TerminalDto>,
    query: &str,
    limit: usize,
) -> Vec<TerminalMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<&TerminalDto> = entries
        .filter(|t| {
            t.city_name.to_lowercase().contains(&needle)
                || t.terminal_name.to_lowercase().contains(&needle)
                || t.alias
                    .as_ref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .collect();

    hits.sort_by(|a, b| {
        (&a.city_name, &a.terminal_name).cmp(&(&b.city_name, &b.terminal_name))
    });

    hits.into_iter()
        .take(limit)
        .map(|t| TerminalMatch {
            id: t.id,
            label: t.label(),
            city: t.city_name.clone(),
            terminal_name: t.terminal_name.clone(),
        })
        .collect()
}

//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedStoreClient;
use crate::store::TerminalDirectory;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached store client
    pub store: Arc<CachedStoreClient>,

    /// Terminal directory for lookups and the search box
    pub terminals: Arc<TerminalDirectory>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: CachedStoreClient, terminals: TerminalDirectory) -> Self {
        Self {
            store: Arc::new(store),
            terminals: Arc::new(terminals),
        }
    }
}

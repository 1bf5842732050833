use std::net::SocketAddr;
use std::time::Duration;

use bus_server::cache::{CacheConfig, CachedStoreClient};
use bus_server::store::{StoreClient, StoreConfig, TerminalDirectory};
use bus_server::web::{AppState, create_router};

/// How often to refresh the terminal directory (24 hours).
const TERMINAL_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Get store credentials from environment
    let base_url = std::env::var("BUS_STORE_URL").unwrap_or_else(|_| {
        eprintln!("Warning: BUS_STORE_URL not set. Store calls will fail.");
        String::new()
    });
    let api_key = std::env::var("BUS_STORE_API_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: BUS_STORE_API_KEY not set. Store calls will fail.");
        String::new()
    });

    // Create store client
    let store_config = StoreConfig::new(&base_url, &api_key);
    let store_client = StoreClient::new(store_config).expect("Failed to create store client");

    // Create cached client
    let cache_config = CacheConfig::default();
    let cached_store = CachedStoreClient::new(store_client.clone(), &cache_config);

    // Fetch terminal directory (fail fast if unavailable)
    println!("Fetching terminal directory...");
    let terminals = TerminalDirectory::fetch(store_client)
        .await
        .expect("Failed to fetch terminal directory");
    println!("Loaded {} terminals", terminals.len().await);

    // Spawn background task to refresh the directory daily
    let terminals_refresh = terminals.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TERMINAL_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match terminals_refresh.refresh().await {
                Ok(count) => println!("Refreshed terminal directory: {} terminals", count),
                Err(e) => eprintln!("Failed to refresh terminal directory: {}", e),
            }
        }
    });

    // Build app state
    let state = AppState::new(cached_store, terminals);

    // Create router
    let app = create_router(state, "static");

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Bus Trip Search listening on http://{addr}");
    println!();
    println!("Open http://{addr} in your browser for the web interface.");
    println!();
    println!("API Endpoints:");
    println!("  GET /health                 - Health check");
    println!("  GET /about                  - About page");
    println!("  GET /api/terminals/search   - Search terminals by name");
    println!("  GET /search                 - Search trips between terminals");
    println!("  GET /trip/:id/itinerary     - Stop-by-stop itinerary");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

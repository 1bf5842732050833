//! Web layer for the bus trip search server.
//!
//! Provides HTTP endpoints for searching trips between terminals and
//! viewing a trip's stop-by-stop itinerary.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;

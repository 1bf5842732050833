//! Itinerary aggregation.
//!
//! Turns the flat stop rows returned by a terminal-pair search into
//! bookable trip summaries (departure, arrival, duration, fare).

mod aggregate;

pub use aggregate::{TripSummary, summarize_trips};

//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Fare, StopRecord};
use crate::itinerary::TripSummary;
use crate::store::TerminalMatch;

/// Request to search trips between two terminals.
#[derive(Debug, Deserialize)]
pub struct SearchTripsRequest {
    /// Origin terminal id
    pub origin: i64,

    /// Destination terminal id
    pub destination: i64,
}

/// A trip card in search results.
#[derive(Debug, Serialize)]
pub struct TripResult {
    /// Trip id (for the itinerary detail request)
    pub trip_id: i64,

    /// Operating cooperative's name
    pub cooperative: String,

    /// Cooperative logo URL
    pub logo_url: Option<String>,

    /// Service class (e.g. "Ejecutivo")
    pub service_class: String,

    /// Departure time, "HH:MM"
    pub departure: String,

    /// Arrival time, "HH:MM"
    pub arrival: String,

    /// Travel time in minutes
    pub duration_mins: i64,

    /// Travel time for display, e.g. "5h 30m"
    pub duration: String,

    /// Segment fare
    pub fare: Fare,

    /// Stops between origin and destination
    pub intermediate_stops: u32,

    /// Origin terminal display name
    pub origin_terminal: String,

    /// Destination terminal display name
    pub destination_terminal: String,
}

impl TripResult {
    /// Create from a trip summary.
    pub fn from_summary(summary: &TripSummary) -> Self {
        Self {
            trip_id: summary.trip_id.0,
            cooperative: summary.cooperative_name.clone(),
            logo_url: summary.cooperative_logo_url.clone(),
            service_class: summary.service_class.clone(),
            departure: summary.departure.clone(),
            arrival: summary.arrival.clone(),
            duration_mins: summary.duration_mins,
            duration: summary.duration_text.clone(),
            fare: summary.fare,
            intermediate_stops: summary.intermediate_stop_count,
            origin_terminal: summary.origin_terminal_name.clone(),
            destination_terminal: summary.destination_terminal_name.clone(),
        }
    }
}

/// Response for trip search.
#[derive(Debug, Serialize)]
pub struct SearchTripsResponse {
    /// Qualifying trips, sorted by departure time
    pub trips: Vec<TripResult>,
}

/// A stop in an itinerary detail response.
#[derive(Debug, Serialize)]
pub struct StopResult {
    /// 1-based position along the trip
    pub sequence_order: u32,

    /// Terminal id
    pub terminal_id: i64,

    /// Terminal display name
    pub terminal_name: String,

    /// Scheduled clock time, "HH:MM"
    pub time: String,

    /// Days after the trip's start day
    pub day_offset: u32,

    /// Cumulative fare up to this stop
    pub cumulative_fare: Fare,

    /// Whether boarding is open at this stop
    pub sellable: bool,
}

impl StopResult {
    /// Create from a raw stop row.
    pub fn from_record(stop: &StopRecord) -> Self {
        Self {
            sequence_order: stop.sequence_order,
            terminal_id: stop.terminal_id.0,
            terminal_name: stop.terminal_name.clone(),
            time: clip_hhmm(&stop.estimated_time),
            day_offset: stop.day_offset,
            cumulative_fare: stop.cumulative_fare,
            sellable: stop.sellable,
        }
    }
}

/// Response for an itinerary detail request.
#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub trip_id: i64,
    /// Stops in sequence order
    pub stops: Vec<StopResult>,
}

/// Request to search terminals by name.
#[derive(Debug, Deserialize)]
pub struct TerminalSearchRequest {
    /// Query string (city, terminal name, or alias substring)
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A terminal in directory search results.
#[derive(Debug, Serialize)]
pub struct TerminalSearchResult {
    pub id: i64,
    /// Display label, e.g. "Quito (Quitumbe)"
    pub label: String,
    pub city: String,
    pub terminal_name: String,
}

impl TerminalSearchResult {
    /// Create from a directory match.
    pub fn from_match(m: TerminalMatch) -> Self {
        Self {
            id: m.id.0,
            label: m.label,
            city: m.city,
            terminal_name: m.terminal_name,
        }
    }
}

/// Response for terminal search.
#[derive(Debug, Serialize)]
pub struct TerminalSearchResponse {
    pub terminals: Vec<TerminalSearchResult>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Truncate a "HH:MM:SS" string to "HH:MM"; shorter strings pass through.
fn clip_hhmm(time: &str) -> String {
    time.get(..5).unwrap_or(time).to_string()
}

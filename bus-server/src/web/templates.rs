//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::StopRecord;
use crate::itinerary::TripSummary;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate;

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Trip list fragment (search results).
#[derive(Template)]
#[template(path = "trip_list.html")]
pub struct TripListTemplate {
    pub trips: Vec<TripView>,
}

/// Itinerary detail fragment.
#[derive(Template)]
#[template(path = "itinerary.html")]
pub struct ItineraryTemplate {
    pub trip_id: String,
    pub stops: Vec<StopView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Trip card view model for templates.
#[derive(Debug, Clone)]
pub struct TripView {
    pub trip_id: String,
    pub cooperative: String,
    pub logo_url: Option<String>,
    pub service_class: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub fare: String,
    pub intermediate_stops: u32,
    pub origin_terminal: String,
    pub destination_terminal: String,
}

impl TripView {
    /// Human label for the stop count, e.g. "Directo" or "2 paradas".
    pub fn stops_label(&self) -> String {
        match self.intermediate_stops {
            0 => "Directo".to_string(),
            1 => "1 parada".to_string(),
            n => format!("{n} paradas"),
        }
    }

    /// Create from a trip summary.
    pub fn from_summary(summary: &TripSummary) -> Self {
        Self {
            trip_id: summary.trip_id.to_string(),
            cooperative: summary.cooperative_name.clone(),
            logo_url: summary.cooperative_logo_url.clone(),
            service_class: summary.service_class.clone(),
            departure: summary.departure.clone(),
            arrival: summary.arrival.clone(),
            duration: summary.duration_text.clone(),
            fare: format!("${}", summary.fare),
            intermediate_stops: summary.intermediate_stop_count,
            origin_terminal: summary.origin_terminal_name.clone(),
            destination_terminal: summary.destination_terminal_name.clone(),
        }
    }
}

/// Itinerary stop view model for templates.
#[derive(Debug, Clone)]
pub struct StopView {
    pub terminal_name: String,
    pub time: String,
    pub fare: String,
}

impl StopView {
    /// Create from a raw stop row.
    pub fn from_record(stop: &StopRecord) -> Self {
        Self {
            terminal_name: stop.terminal_name.clone(),
            time: stop.estimated_time.get(..5).unwrap_or(&stop.estimated_time).to_string(),
            fare: format!("${}", stop.cumulative_fare),
        }
    }
}

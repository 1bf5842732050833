//! The trip-summary aggregator.
//!
//! Input: a flat, unordered list of [`StopRecord`]s covering every trip
//! that touches either the queried origin or destination terminal (the
//! store query filters on `terminal_id IN (origin, destination)`, so a
//! qualifying trip contributes exactly its two matched rows, plus more if
//! it calls at both terminals repeatedly).
//!
//! Output: one [`TripSummary`] per trip that actually connects the pair in
//! the right direction with boarding open at the origin, sorted by
//! departure time. Trips that don't qualify are silently excluded; that is
//! the normal outcome for trips touching only one of the two terminals.
//!
//! This is a pure, single-pass batch transform: no I/O, no shared state,
//! safe to call concurrently.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::domain::{Fare, StopRecord, StopTime, TerminalId, TripId};

/// A bookable trip between the queried origin and destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    /// The trip this summary was derived from.
    pub trip_id: TripId,

    /// Operating cooperative's display name.
    pub cooperative_name: String,

    /// Cooperative logo URL, if any.
    pub cooperative_logo_url: Option<String>,

    /// Service class (e.g. "Ejecutivo").
    pub service_class: String,

    /// Departure clock time at the origin terminal, "HH:MM".
    pub departure: String,

    /// Arrival clock time at the destination terminal, "HH:MM".
    pub arrival: String,

    /// Total travel time in minutes.
    pub duration_mins: i64,

    /// Travel time for display, e.g. "5h 30m".
    pub duration_text: String,

    /// Fare for this origin/destination segment.
    pub fare: Fare,

    /// Stops strictly between the matched origin and destination.
    pub intermediate_stop_count: u32,

    /// Display name of the origin terminal.
    pub origin_terminal_name: String,

    /// Display name of the destination terminal.
    pub destination_terminal_name: String,
}

/// Reference date for duration arithmetic.
///
/// Stop times carry no date, so any fixed date works; only differences and
/// day offsets matter.
fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid reference date")
}

/// Derive trip summaries for an origin/destination pair.
///
/// A summary is produced for a trip iff the trip has a stop at `origin`, a
/// stop at `destination`, the origin stop precedes the destination stop in
/// sequence order, and boarding is open at the origin stop. Everything else
/// is excluded without error.
///
/// The result is sorted ascending by departure time. Grouping iterates
/// trips in ascending id order and the sort is stable, so the output is
/// fully deterministic even when departures tie.
///
/// # Examples
///
/// ```
/// use bus_server::domain::TerminalId;
/// use bus_server::itinerary::summarize_trips;
///
/// // No stops, no trips: an empty result is the normal "no trips found".
/// let summaries = summarize_trips(&[], TerminalId(10), TerminalId(20));
/// assert!(summaries.is_empty());
/// ```
pub fn summarize_trips(
    stops: &[StopRecord],
    origin: TerminalId,
    destination: TerminalId,
) -> Vec<TripSummary> {
    let mut groups: BTreeMap<TripId, Vec<&StopRecord>> = BTreeMap::new();
    for stop in stops {
        groups.entry(stop.trip_id).or_default().push(stop);
    }

    let mut summaries: Vec<TripSummary> = groups
        .into_iter()
        .filter_map(|(trip_id, group)| summarize_group(trip_id, &group, origin, destination))
        .collect();

    // Lexicographic comparison on zero-padded "HH:MM" is chronological
    // order within a day.
    summaries.sort_by(|a, b| a.departure.cmp(&b.departure));
    summaries
}

/// Summarize one trip's stops, or exclude the trip.
fn summarize_group(
    trip_id: TripId,
    group: &[&StopRecord],
    origin: TerminalId,
    destination: TerminalId,
) -> Option<TripSummary> {
    let origin_stop = group.iter().find(|s| s.terminal_id == origin)?;
    let destination_stop = group.iter().find(|s| s.terminal_id == destination)?;

    // Wrong direction: the "destination" comes first on this trip's path.
    if origin_stop.sequence_order >= destination_stop.sequence_order {
        return None;
    }

    // Boarding closed at the origin stop.
    if !origin_stop.sellable {
        return None;
    }

    let base = reference_date();
    let departs = match StopTime::parse(&origin_stop.estimated_time, base) {
        Ok(t) => t,
        Err(e) => {
            warn!(%trip_id, time = %origin_stop.estimated_time, error = %e,
                "skipping trip: unparseable origin time");
            return None;
        }
    };
    let mut arrives = match StopTime::parse(&destination_stop.estimated_time, base) {
        Ok(t) => t,
        Err(e) => {
            warn!(%trip_id, time = %destination_stop.estimated_time, error = %e,
                "skipping trip: unparseable destination time");
            return None;
        }
    };

    // An explicit day-offset delta is authoritative. Without one, an
    // arrival clock time earlier than the departure implies the trip
    // crossed midnight and the offset was left at zero in the data.
    let day_delta =
        i64::from(destination_stop.day_offset) - i64::from(origin_stop.day_offset);
    if day_delta > 0 {
        arrives = arrives.plus_days(day_delta)?;
    } else if arrives < departs {
        arrives = arrives.plus_days(1)?;
    }

    let duration_mins = arrives.signed_duration_since(departs).num_minutes();

    let fare = segment_fare(origin_stop.cumulative_fare, destination_stop.cumulative_fare);

    Some(TripSummary {
        trip_id,
        cooperative_name: origin_stop.cooperative_name.clone(),
        cooperative_logo_url: origin_stop.cooperative_logo_url.clone(),
        service_class: origin_stop.service_class.clone(),
        departure: departs.to_string(),
        arrival: arrives.to_string(),
        duration_mins,
        duration_text: format!("{}h {}m", duration_mins / 60, duration_mins % 60),
        fare,
        intermediate_stop_count: destination_stop.sequence_order
            - origin_stop.sequence_order
            - 1,
        origin_terminal_name: origin_stop.terminal_name.clone(),
        destination_terminal_name: destination_stop.terminal_name.clone(),
    })
}

/// Fare for a boarding/alighting pair of cumulative fares.
///
/// The cumulative-subtraction model only yields a meaningful fare when the
/// delta is positive. A zero or negative delta marks a flat-rate segment
/// (intermediate fare tables that reset, or a zero-fare boarding point), in
/// which case the destination's absolute cumulative fare applies.
fn segment_fare(boarding: Fare, alighting: Fare) -> Fare {
    let delta = alighting.cents() as i64 - boarding.cents() as i64;
    if delta > 0 {
        Fare::from_cents(delta as u64)
    } else {
        alighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a stop row with sensible defaults for the fields a given test
    /// doesn't care about.
    fn stop(trip: i64, order: u32, terminal: i64, time: &str, fare_cents: u64) -> StopRecord {
        StopRecord {
            trip_id: TripId(trip),
            sequence_order: order,
            terminal_id: TerminalId(terminal),
            terminal_name: format!("Terminal {terminal}"),
            estimated_time: time.to_string(),
            day_offset: 0,
            cumulative_fare: Fare::from_cents(fare_cents),
            sellable: true,
            cooperative_name: "Trans Andina".to_string(),
            cooperative_logo_url: None,
            service_class: "Ejecutivo".to_string(),
        }
    }

    #[test]
    fn basic_summary() {
        let stops = vec![
            stop(1, 1, 10, "08:00", 0),
            stop(1, 3, 20, "12:30", 1500),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result.len(), 1);

        let s = &result[0];
        assert_eq!(s.trip_id, TripId(1));
        assert_eq!(s.departure, "08:00");
        assert_eq!(s.arrival, "12:30");
        assert_eq!(s.duration_text, "4h 30m");
        assert_eq!(s.duration_mins, 270);
        assert_eq!(s.fare, Fare::from_cents(1500));
        assert_eq!(s.intermediate_stop_count, 1);
        assert_eq!(s.origin_terminal_name, "Terminal 10");
        assert_eq!(s.destination_terminal_name, "Terminal 20");
        assert_eq!(s.cooperative_name, "Trans Andina");
        assert_eq!(s.service_class, "Ejecutivo");
    }

    #[test]
    fn reversed_direction_excluded() {
        // Querying the same trip backwards yields nothing.
        let stops = vec![
            stop(1, 1, 10, "08:00", 0),
            stop(1, 3, 20, "12:30", 1500),
        ];

        let result = summarize_trips(&stops, TerminalId(20), TerminalId(10));
        assert!(result.is_empty());
    }

    #[test]
    fn non_sellable_origin_excluded() {
        // Boarding closed at the origin stop.
        let mut origin = stop(2, 1, 10, "09:00", 0);
        origin.sellable = false;
        let stops = vec![origin, stop(2, 2, 20, "11:00", 1000)];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert!(result.is_empty());
    }

    #[test]
    fn non_sellable_destination_is_fine() {
        // Only the origin stop's flag gates boarding.
        let mut dest = stop(2, 2, 20, "11:00", 1000);
        dest.sellable = false;
        let stops = vec![stop(2, 1, 10, "09:00", 0), dest];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn explicit_day_offset_crosses_midnight() {
        // 23:00 -> 01:00 next day via day_offset.
        let mut dest = stop(3, 2, 6, "01:00", 850);
        dest.day_offset = 1;
        let stops = vec![stop(3, 1, 5, "23:00", 0), dest];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].duration_text, "2h 0m");
        assert_eq!(result[0].duration_mins, 120);
        assert_eq!(result[0].fare, Fare::from_cents(850));
    }

    #[test]
    fn implied_midnight_crossing_without_offset() {
        // Arrival clock time before departure, day_offset left at 0:
        // the missing day is inferred.
        let stops = vec![stop(3, 1, 5, "22:30", 0), stop(3, 2, 6, "00:15", 700)];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].duration_text, "1h 45m");
    }

    #[test]
    fn multi_day_offset() {
        // day_offset deltas larger than one are applied in full.
        let mut dest = stop(3, 2, 6, "08:00", 4000);
        dest.day_offset = 2;
        let stops = vec![stop(3, 1, 5, "08:00", 0), dest];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result[0].duration_mins, 48 * 60);
        assert_eq!(result[0].duration_text, "48h 0m");
    }

    #[test]
    fn day_offset_is_relative_to_origin() {
        // Origin itself a day into the trip: equal offsets mean same day.
        let mut origin = stop(3, 3, 5, "06:00", 1000);
        origin.day_offset = 1;
        let mut dest = stop(3, 5, 6, "09:00", 1800);
        dest.day_offset = 1;
        let stops = vec![origin, dest];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result[0].duration_text, "3h 0m");
        assert_eq!(result[0].intermediate_stop_count, 1);
    }

    #[test]
    fn zero_fare_delta_falls_back_to_destination_fare() {
        // Equal cumulative fares: use the destination's.
        let stops = vec![
            stop(4, 1, 5, "07:00", 1465),
            stop(4, 2, 6, "09:00", 1465),
        ];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result[0].fare, Fare::from_cents(1465));
    }

    #[test]
    fn negative_fare_delta_falls_back_to_destination_fare() {
        // A fare table that resets mid-route.
        let stops = vec![
            stop(4, 1, 5, "07:00", 2000),
            stop(4, 2, 6, "09:00", 500),
        ];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result[0].fare, Fare::from_cents(500));
    }

    #[test]
    fn positive_fare_delta_is_the_segment_fare() {
        let stops = vec![
            stop(4, 2, 5, "07:00", 650),
            stop(4, 4, 6, "09:00", 1125),
        ];

        let result = summarize_trips(&stops, TerminalId(5), TerminalId(6));
        assert_eq!(result[0].fare, Fare::from_cents(475));
        assert_eq!(result[0].fare.to_string(), "4.75");
    }

    #[test]
    fn sorted_by_departure() {
        // 14:05 and 09:30 come out ordered.
        let stops = vec![
            stop(1, 1, 10, "14:05", 0),
            stop(1, 2, 20, "18:00", 900),
            stop(2, 1, 10, "09:30", 0),
            stop(2, 2, 20, "13:30", 900),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        let departures: Vec<&str> = result.iter().map(|s| s.departure.as_str()).collect();
        assert_eq!(departures, vec!["09:30", "14:05"]);
    }

    #[test]
    fn equal_departures_ordered_by_trip_id() {
        let stops = vec![
            stop(9, 1, 10, "10:00", 0),
            stop(9, 2, 20, "12:00", 500),
            stop(4, 1, 10, "10:00", 0),
            stop(4, 2, 20, "12:00", 500),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        let trips: Vec<TripId> = result.iter().map(|s| s.trip_id).collect();
        assert_eq!(trips, vec![TripId(4), TripId(9)]);
    }

    #[test]
    fn trips_missing_an_endpoint_are_excluded() {
        let stops = vec![
            // Touches only the origin
            stop(1, 1, 10, "08:00", 0),
            // Touches only the destination
            stop(2, 4, 20, "12:00", 1200),
            // Touches both
            stop(3, 1, 10, "10:00", 0),
            stop(3, 2, 20, "13:00", 800),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].trip_id, TripId(3));
    }

    #[test]
    fn malformed_time_skips_only_that_trip() {
        let stops = vec![
            stop(1, 1, 10, "not a time", 0),
            stop(1, 2, 20, "12:00", 900),
            stop(2, 1, 10, "09:00", 0),
            stop(2, 2, 20, "11:00", 700),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].trip_id, TripId(2));
    }

    #[test]
    fn times_with_seconds_are_truncated() {
        let stops = vec![
            stop(1, 1, 10, "08:00:00", 0),
            stop(1, 2, 20, "12:30:45", 1500),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result[0].departure, "08:00");
        assert_eq!(result[0].arrival, "12:30");
        assert_eq!(result[0].duration_text, "4h 30m");
    }

    #[test]
    fn duplicate_terminal_uses_first_row() {
        // A loop trip calling at the origin twice: the first matching row
        // in input order wins.
        let stops = vec![
            stop(1, 2, 10, "08:30", 200),
            stop(1, 5, 10, "15:00", 1800),
            stop(1, 4, 20, "12:00", 1400),
        ];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].departure, "08:30");
        assert_eq!(result[0].intermediate_stop_count, 1);
        assert_eq!(result[0].fare, Fare::from_cents(1200));
    }

    #[test]
    fn adjacent_stops_have_no_intermediates() {
        let stops = vec![stop(1, 1, 10, "08:00", 0), stop(1, 2, 20, "09:00", 300)];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(result[0].intermediate_stop_count, 0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let result = summarize_trips(&[], TerminalId(10), TerminalId(20));
        assert!(result.is_empty());
    }

    #[test]
    fn idempotent_over_identical_input() {
        let stops = vec![
            stop(1, 1, 10, "14:05", 0),
            stop(1, 2, 20, "18:00", 900),
            stop(2, 1, 10, "09:30", 0),
            stop(2, 2, 20, "13:30", 900),
        ];

        let a = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        let b = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        assert_eq!(a, b);
    }

    #[test]
    fn operator_fields_come_from_origin_stop() {
        let mut origin = stop(1, 1, 10, "08:00", 0);
        origin.cooperative_name = "Cooperativa Loja".to_string();
        origin.cooperative_logo_url = Some("https://cdn.example/loja.png".to_string());
        origin.service_class = "Semicama".to_string();
        let stops = vec![origin, stop(1, 2, 20, "12:00", 1200)];

        let result = summarize_trips(&stops, TerminalId(10), TerminalId(20));
        let s = &result[0];
        assert_eq!(s.cooperative_name, "Cooperativa Loja");
        assert_eq!(s.cooperative_logo_url.as_deref(), Some("https://cdn.example/loja.png"));
        assert_eq!(s.service_class, "Semicama");
    }
}

//! Raw stop rows from the data store.

use serde::{Deserialize, Serialize};

use super::{Fare, TerminalId, TripId};

/// One stop of one trip, as returned by the store's flattened search view.
///
/// Each row carries the trip-level cooperative and service-class columns
/// denormalized alongside the stop data, so a flat list of these rows is
/// self-contained: the search view joins trips, cooperatives, and terminals
/// into a single relation.
///
/// Rows are read-only inputs, fetched fresh per query and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    /// Parent trip this stop belongs to.
    pub trip_id: TripId,

    /// 1-based position of this stop along the trip's path.
    /// Unique per trip; strictly increasing in physical stop order.
    pub sequence_order: u32,

    /// Terminal served by this stop.
    pub terminal_id: TerminalId,

    /// Display name of the terminal.
    pub terminal_name: String,

    /// Scheduled clock time at this stop, "HH:MM" or "HH:MM:SS".
    /// Kept as a string here; parsing happens where a date context exists.
    pub estimated_time: String,

    /// Calendar days after the trip's nominal start day (0 = departure day).
    #[serde(default, deserialize_with = "null_as_zero")]
    pub day_offset: u32,

    /// Cumulative fare from the trip's origin up to and including this stop.
    pub cumulative_fare: Fare,

    /// Whether passengers may board at this stop. Only an explicit `false`
    /// in the data closes boarding; a missing or null value means open.
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub sellable: bool,

    /// Operating cooperative's display name.
    pub cooperative_name: String,

    /// URL of the cooperative's logo, if one is on file.
    #[serde(default)]
    pub cooperative_logo_url: Option<String>,

    /// Service class of the trip (e.g. "Ejecutivo", "Semicama").
    pub service_class: String,
}

fn default_true() -> bool {
    true
}

// Nullable store columns come back as explicit JSON nulls, not absent keys;
// `#[serde(default)]` alone only covers the latter.

fn null_as_zero<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

fn null_as_true<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

//! Domain types for the bus trip search server.
//!
//! This module contains the core domain model types that represent
//! validated schedule data. All types enforce their invariants at
//! construction time, so code that receives these types can trust
//! their validity.

mod fare;
mod ids;
mod stop;
mod time;

pub use fare::{Fare, InvalidFare};
pub use ids::{TerminalId, TripId};
pub use stop::StopRecord;
pub use time::{StopTime, TimeError};

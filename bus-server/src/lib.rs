//! Intercity bus trip search server.
//!
//! A web application that answers: "which buses run between these two
//! terminals, at what times, and for how much?"

pub mod cache;
pub mod domain;
pub mod itinerary;
pub mod store;
pub mod web;

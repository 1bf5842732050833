//! Data access for the hosted store.
//!
//! Persistence, auth, and row-level security live in a managed backend;
//! this module only reads from its REST interface. The aggregator itself
//! never sees the store: callers fetch rows here and pass them in, which
//! keeps the core pure and testable without network mocking.

mod client;
mod error;
mod mock;
mod terminals;

pub use client::{StoreClient, StoreConfig, TerminalDto};
pub use error::StoreError;
pub use mock::MockStoreClient;
pub use terminals::{TerminalDirectory, TerminalMatch};

//! Request routing
//!
//! ## Routing Table (table.rs)
//!
//! Immutable exact-match map from target to the capability agent that
//! declared ownership of it, built once at startup.
//!
//! ## Dispatcher (dispatcher.rs)
//!
//! Validates inbound requests, routes them through the table, and escalates
//! to the fallback coordinator when the owning agent fails or no agent owns
//! the target.

pub mod dispatcher;
pub mod table;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use table::RoutingTable;

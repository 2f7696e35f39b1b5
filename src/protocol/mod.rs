//! Request, result, and escalation message types
//!
//! These are the values passed between the dispatcher, the capability
//! agents, and the fallback coordinator.

pub mod messages;

pub use messages::*;

//! Testing utilities and mock implementations
//!
//! Scripted workers and enrichers with call recording, plus an observer that
//! captures every dispatch event, so routing behavior can be asserted
//! without the stub collaborators.

pub mod mocks;

pub use mocks::*;

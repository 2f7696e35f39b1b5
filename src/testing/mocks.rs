//! Mock implementations for testing
//!
//! Provides scripted Worker and Enricher implementations that record every
//! payload they receive, and an observer that records every dispatch event.

use crate::observability::{DispatchEvent, DispatchObserver};
use crate::workers::{Enricher, SolveOutcome, Worker};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Scripted outcomes cycled per call, plus a record of received payloads
#[derive(Debug, Default)]
struct Script {
    outcomes: Vec<SolveOutcome>,
    current: Arc<Mutex<usize>>,
    payloads: Arc<Mutex<Vec<Value>>>,
}

impl Script {
    fn new(outcomes: Vec<SolveOutcome>) -> Self {
        Self {
            outcomes,
            ..Default::default()
        }
    }

    fn next(&self, payload: &Value) -> SolveOutcome {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.push(payload.clone());
        }

        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let idx = *current % self.outcomes.len().max(1);
        *current += 1;

        self.outcomes
            .get(idx)
            .cloned()
            .unwrap_or_else(|| SolveOutcome::success("Mock response"))
    }

    fn payloads(&self) -> Vec<Value> {
        self.payloads
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }
}

/// Mock worker for testing
#[derive(Debug)]
pub struct MockWorker {
    name: String,
    script: Script,
}

impl MockWorker {
    pub fn new(name: impl Into<String>, outcomes: Vec<SolveOutcome>) -> Self {
        Self {
            name: name.into(),
            script: Script::new(outcomes),
        }
    }

    pub fn succeeding(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(name, vec![SolveOutcome::success(data)])
    }

    pub fn failing(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(name, vec![SolveOutcome::failure(error)])
    }

    pub fn call_count(&self) -> usize {
        self.script.payloads().len()
    }

    /// Payloads received so far, in call order
    pub fn payloads(&self) -> Vec<Value> {
        self.script.payloads()
    }
}

impl Worker for MockWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, payload: &Value) -> SolveOutcome {
        self.script.next(payload)
    }
}

/// Mock enricher for testing
#[derive(Debug)]
pub struct MockEnricher {
    name: String,
    script: Script,
}

impl MockEnricher {
    pub fn new(name: impl Into<String>, outcomes: Vec<SolveOutcome>) -> Self {
        Self {
            name: name.into(),
            script: Script::new(outcomes),
        }
    }

    pub fn succeeding(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(name, vec![SolveOutcome::success(data)])
    }

    /// Enricher that fails, with or without an error message
    pub fn failing(name: impl Into<String>, error: Option<&str>) -> Self {
        let outcome = match error {
            Some(error) => SolveOutcome::failure(error),
            None => SolveOutcome::silent_failure(),
        };
        Self::new(name, vec![outcome])
    }

    pub fn call_count(&self) -> usize {
        self.script.payloads().len()
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.script.payloads()
    }
}

impl Enricher for MockEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    fn enrich_and_solve(&self, payload: &Value) -> SolveOutcome {
        self.script.next(payload)
    }
}

/// Observer that keeps every event it sees
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<DispatchEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl DispatchObserver for RecordingObserver {
    fn on_event(&self, event: &DispatchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

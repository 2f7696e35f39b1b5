//! Reference collaborators used by the default topology
//!
//! `StubWorker` fails when its payload carries a truthy `error` marker.
//! `StubEnricher` always resolves through `enrich_and_solve`; its plain
//! `solve` entry point is gated by an explicit `enrichment_needed` flag.

use super::{is_truthy, Enricher, PayloadRepr, SolveOutcome, Worker};
use serde_json::Value;
use tracing::debug;

/// Worker that echoes its payload back in a processed-data string
#[derive(Debug, Clone)]
pub struct StubWorker {
    name: String,
}

impl StubWorker {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Worker for StubWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, payload: &Value) -> SolveOutcome {
        let fails = payload
            .as_object()
            .and_then(|map| map.get("error"))
            .is_some_and(is_truthy);

        if fails {
            debug!(worker = %self.name, "Stub worker simulating failure");
            return SolveOutcome::failure(format!(
                "Simulated processing error in {}",
                self.name
            ));
        }

        SolveOutcome::success(format!(
            "Processed data from {}: {}",
            self.name,
            PayloadRepr(payload)
        ))
    }
}

/// Generalist enricher used by the fallback coordinator
#[derive(Debug, Clone)]
pub struct StubEnricher {
    name: String,
}

impl StubEnricher {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Enricher for StubEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    fn enrich_and_solve(&self, payload: &Value) -> SolveOutcome {
        SolveOutcome::success(format!(
            "Enriched and solved by {}: {} with comprehensive analysis",
            self.name,
            PayloadRepr(payload)
        ))
    }
}

/// Direct solving is only allowed for payloads that ask for enrichment
impl Worker for StubEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, payload: &Value) -> SolveOutcome {
        let map = payload.as_object();
        let requested = map
            .and_then(|m| m.get("enrichment_needed"))
            .is_some_and(is_truthy);

        if !requested {
            return SolveOutcome::failure(format!(
                "{} requires enrichment_needed to be true.",
                self.name
            ));
        }

        let partial = map
            .and_then(|m| m.get("partial_data"))
            .unwrap_or(&Value::Null);
        SolveOutcome::success(format!(
            "Enriched data by {}: {} with new details",
            self.name,
            PayloadRepr(partial)
        ))
    }
}

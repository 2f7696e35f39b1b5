//! Fallback coordinator: best-effort resolution through an enricher
//!
//! An escalation envelope arrives in one of two shapes, after an agent
//! failure or because no agent owns the target. The coordinator recovers
//! the most specific payload it can from either shape and hands it to its
//! enricher.
//!
//! ## Payload precedence
//!
//! Null counts as absent at every step.
//!
//! 1. `partial_data.data`, unwrapped once if it is a mapping with a `data`
//!    key. The unwrap goes exactly one level deep.
//! 2. `original_request.data`.
//! 3. The whole `partial_data` mapping. This always exists, so extraction
//!    never comes back empty-handed.

use crate::observability::{escalation_span, DispatchEvent, SharedObserver, TracingObserver};
use crate::protocol::{AgentResult, EscalationEnvelope};
use crate::workers::{Enricher, SolveOutcome};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Owns the enricher and resolves escalated requests
pub struct FallbackCoordinator {
    name: String,
    enricher: Arc<dyn Enricher>,
    observer: SharedObserver,
}

impl fmt::Debug for FallbackCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackCoordinator")
            .field("name", &self.name)
            .field("enricher", &self.enricher.name())
            .finish()
    }
}

impl FallbackCoordinator {
    pub fn new<S: Into<String>>(name: S, enricher: Arc<dyn Enricher>) -> Self {
        Self {
            name: name.into(),
            enricher,
            observer: TracingObserver::shared(),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enricher_name(&self) -> &str {
        self.enricher.name()
    }

    /// Pick the payload to enrich from an envelope of either shape
    pub fn extract_payload(envelope: &EscalationEnvelope) -> Value {
        let partial = &envelope.partial_data;

        let mut candidate = partial.data().filter(|v| !v.is_null());
        if let Some(inner) = candidate
            .and_then(Value::as_object)
            .and_then(|map| map.get("data"))
        {
            candidate = Some(inner);
        }

        candidate
            .filter(|v| !v.is_null())
            .or_else(|| Some(&envelope.original_request.payload).filter(|v| !v.is_null()))
            .cloned()
            .unwrap_or_else(|| partial.to_value())
    }

    /// Enrich the best available payload exactly once
    pub fn enrich_and_solve(&self, envelope: &EscalationEnvelope) -> AgentResult {
        let span = escalation_span!(
            coordinator = %self.name,
            cause = envelope.partial_data.kind()
        );
        let _guard = span.enter();

        let payload = Self::extract_payload(envelope);
        debug!(enricher = %self.enricher.name(), "Attempting enrichment");

        match self.enricher.enrich_and_solve(&payload) {
            SolveOutcome::Success { data } => {
                self.observer.on_event(&DispatchEvent::EnrichmentSucceeded {
                    coordinator: self.name.clone(),
                    enricher: self.enricher.name().to_string(),
                });
                AgentResult::solved(data.into())
            }
            SolveOutcome::Failure { error } => {
                self.observer.on_event(&DispatchEvent::EnrichmentFailed {
                    coordinator: self.name.clone(),
                    enricher: self.enricher.name().to_string(),
                    error: error.clone(),
                });
                let error = error.unwrap_or_else(|| self.default_error());
                AgentResult::failed(Some(error))
            }
        }
    }

    /// Error reported when the enricher fails without a message
    pub fn default_error(&self) -> String {
        format!("{} failed to enrich and solve", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PartialData, Request};
    use crate::testing::MockEnricher;
    use crate::workers::StubEnricher;
    use serde_json::json;

    fn no_agent(payload: Value) -> EscalationEnvelope {
        EscalationEnvelope::from_no_agent(&Request::new("Unknown", payload))
    }

    fn agent_failure(payload: Value) -> EscalationEnvelope {
        let request = Request::new("WorkerA", payload);
        let result = AgentResult::unsolved(Some("failed".to_string()), request.clone());
        EscalationEnvelope::from_agent_failure(&request, result)
    }

    #[test]
    fn test_no_agent_uses_partial_data() {
        let envelope = no_agent(json!({"info": "z"}));
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({"info": "z"})
        );
    }

    #[test]
    fn test_nested_data_unwraps_once() {
        let envelope = no_agent(json!({"data": "actual_info"}));
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!("actual_info")
        );

        let envelope = no_agent(json!({"data": {"data": "deep"}}));
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({"data": "deep"})
        );
    }

    #[test]
    fn test_agent_failure_uses_original_payload() {
        let envelope = agent_failure(json!({"payload": "y", "error": true}));
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({"payload": "y", "error": true})
        );
    }

    #[test]
    fn test_agent_failure_does_not_unwrap_original_payload() {
        let envelope = agent_failure(json!({"data": "inner"}));
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({"data": "inner"})
        );
    }

    #[test]
    fn test_null_inner_data_falls_back_to_original() {
        let envelope = no_agent(json!({"data": null}));
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({"data": null})
        );
    }

    #[test]
    fn test_partial_data_differs_from_original() {
        let envelope = EscalationEnvelope {
            original_request: Request::new("Unknown", json!("original")),
            partial_data: PartialData::NoAgent {
                error: "No specialized agent for this MCP.".to_string(),
                data: json!("from partial"),
            },
        };
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!("from partial")
        );
    }

    #[test]
    fn test_null_everywhere_uses_whole_partial_data() {
        let envelope = no_agent(Value::Null);
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({"error": "No specialized agent for this MCP.", "data": null})
        );

        let envelope = agent_failure(Value::Null);
        assert_eq!(
            FallbackCoordinator::extract_payload(&envelope),
            json!({
                "solved": false,
                "error": "failed",
                "partial_data": {"mcp_server": "WorkerA", "data": null}
            })
        );
    }

    #[test]
    fn test_enrich_and_solve_success() {
        let coordinator =
            FallbackCoordinator::new("FallbackCoordinator", Arc::new(StubEnricher::new("Enricher")));
        let result = coordinator.enrich_and_solve(&no_agent(json!({"info": "z"})));

        assert_eq!(
            result,
            AgentResult::solved(json!(
                "Enriched and solved by Enricher: {'info': 'z'} with comprehensive analysis"
            ))
        );
    }

    #[test]
    fn test_enrich_and_solve_failure_keeps_enricher_error() {
        let enricher = Arc::new(MockEnricher::failing("Enricher", Some("no luck")));
        let coordinator = FallbackCoordinator::new("FallbackCoordinator", enricher.clone());

        let result = coordinator.enrich_and_solve(&no_agent(json!("x")));

        assert!(!result.solved);
        assert_eq!(result.error.as_deref(), Some("no luck"));
        assert_eq!(result.partial_data, None);
        assert_eq!(enricher.call_count(), 1);
        assert_eq!(enricher.payloads(), vec![json!("x")]);
    }

    #[test]
    fn test_enrich_and_solve_failure_default_message() {
        let enricher = Arc::new(MockEnricher::failing("Enricher", None));
        let coordinator = FallbackCoordinator::new("Squad", enricher);

        let result = coordinator.enrich_and_solve(&no_agent(json!("x")));

        assert_eq!(result.error.as_deref(), Some("Squad failed to enrich and solve"));
    }
}

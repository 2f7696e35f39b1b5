//! Dispatch counters collected from observer events
//!
//! Each `DispatchMetrics` is owned by whoever wires it in; there is no
//! process-wide collector.

use super::events::{DispatchEvent, DispatchObserver};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe dispatch counters
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    requests_received: AtomicU64,
    requests_rejected: AtomicU64,
    requests_routed: AtomicU64,
    solved_by_agent: AtomicU64,
    capability_denials: AtomicU64,
    configuration_faults: AtomicU64,
    worker_failures: AtomicU64,
    escalations: AtomicU64,
    enrichment_successes: AtomicU64,
    enrichment_failures: AtomicU64,
    requests_succeeded: AtomicU64,
    requests_failed: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub requests_rejected: u64,
    pub requests_routed: u64,
    pub solved_by_agent: u64,
    pub capability_denials: u64,
    pub configuration_faults: u64,
    pub worker_failures: u64,
    pub escalations: u64,
    pub enrichment_successes: u64,
    pub enrichment_failures: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
}

impl MetricsSnapshot {
    /// Share of completed requests that needed the fallback
    pub fn escalation_rate(&self) -> f64 {
        let completed = self.requests_succeeded + self.requests_failed;
        if completed == 0 {
            return 0.0;
        }
        self.escalations as f64 / completed as f64
    }
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        MetricsSnapshot {
            requests_received: load(&self.requests_received),
            requests_rejected: load(&self.requests_rejected),
            requests_routed: load(&self.requests_routed),
            solved_by_agent: load(&self.solved_by_agent),
            capability_denials: load(&self.capability_denials),
            configuration_faults: load(&self.configuration_faults),
            worker_failures: load(&self.worker_failures),
            escalations: load(&self.escalations),
            enrichment_successes: load(&self.enrichment_successes),
            enrichment_failures: load(&self.enrichment_failures),
            requests_succeeded: load(&self.requests_succeeded),
            requests_failed: load(&self.requests_failed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl DispatchObserver for DispatchMetrics {
    fn on_event(&self, event: &DispatchEvent) {
        match event {
            DispatchEvent::RequestRejected { .. } => {
                Self::bump(&self.requests_received);
                Self::bump(&self.requests_rejected);
                Self::bump(&self.requests_failed);
            }
            DispatchEvent::Routed { .. } => Self::bump(&self.requests_routed),
            DispatchEvent::AgentSolved { .. } => Self::bump(&self.solved_by_agent),
            DispatchEvent::CapabilityDenied { .. } => Self::bump(&self.capability_denials),
            DispatchEvent::ConfigurationFault { .. } => Self::bump(&self.configuration_faults),
            DispatchEvent::WorkerFailed { .. } => Self::bump(&self.worker_failures),
            DispatchEvent::Escalated { .. } => Self::bump(&self.escalations),
            DispatchEvent::EnrichmentSucceeded { .. } => Self::bump(&self.enrichment_successes),
            DispatchEvent::EnrichmentFailed { .. } => Self::bump(&self.enrichment_failures),
            DispatchEvent::Completed { success, .. } => {
                Self::bump(&self.requests_received);
                if *success {
                    Self::bump(&self.requests_succeeded);
                } else {
                    Self::bump(&self.requests_failed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        assert_eq!(DispatchMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_rejection_counts_as_received_and_failed() {
        let metrics = DispatchMetrics::new();
        metrics.on_event(&DispatchEvent::RequestRejected {
            reason: "Missing 'mcp_server' key in request.".to_string(),
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_received, 1);
        assert_eq!(snapshot.requests_rejected, 1);
        assert_eq!(snapshot.requests_failed, 1);
        assert_eq!(snapshot.requests_routed, 0);
    }

    #[test]
    fn test_escalation_rate() {
        let metrics = DispatchMetrics::new();
        for success in [true, true, false, true] {
            metrics.on_event(&DispatchEvent::Completed {
                target: "WorkerA".to_string(),
                success,
            });
        }
        metrics.on_event(&DispatchEvent::Escalated {
            target: "WorkerA".to_string(),
            coordinator: "FallbackCoordinator".to_string(),
            cause: "agent_failure",
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_received, 4);
        assert_eq!(snapshot.requests_succeeded, 3);
        assert_eq!(snapshot.requests_failed, 1);
        assert!((snapshot.escalation_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_escalation_rate_without_requests() {
        assert_eq!(MetricsSnapshot::default().escalation_rate(), 0.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        assert_eq!(json["escalations"], 0);
        assert_eq!(json["configuration_faults"], 0);
    }
}

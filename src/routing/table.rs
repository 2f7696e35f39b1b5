//! Static target → agent routing table
//!
//! Built once from each agent's declared routes and never mutated. Agents
//! live in an owned arena; the index maps exact target strings to arena
//! slots. Two agents claiming one target is a build error.

use crate::agent::CapabilityAgent;
use crate::config::ConfigError;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug)]
pub struct RoutingTable {
    agents: Vec<CapabilityAgent>,
    index: HashMap<String, usize>,
}

impl RoutingTable {
    /// Build the table, rejecting duplicate route ownership
    pub fn build(agents: Vec<CapabilityAgent>) -> Result<Self, ConfigError> {
        let mut index = HashMap::new();

        for (slot, agent) in agents.iter().enumerate() {
            for target in agent.routes() {
                if let Some(previous) = index.insert(target.clone(), slot) {
                    return Err(ConfigError::DuplicateRoute {
                        target: target.clone(),
                        first: agents[previous].name().to_string(),
                        second: agent.name().to_string(),
                    });
                }
                debug!(target_name = %target, agent = %agent.name(), "Registered route");
            }
        }

        Ok(Self { agents, index })
    }

    /// Exact-match lookup of the agent owning `target`
    pub fn lookup(&self, target: &str) -> Option<&CapabilityAgent> {
        self.index.get(target).map(|&slot| &self.agents[slot])
    }

    pub fn agents(&self) -> &[CapabilityAgent] {
        &self.agents
    }

    /// Routed targets in sorted order
    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = self.index.keys().map(String::as_str).collect();
        targets.sort_unstable();
        targets
    }

    /// Number of routed targets
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::StubWorker;
    use std::sync::Arc;

    fn agent(name: &str, target: &str) -> CapabilityAgent {
        CapabilityAgent::new(name, [target], Arc::new(StubWorker::new(target)))
    }

    #[test]
    fn test_lookup_by_exact_target() {
        let table = RoutingTable::build(vec![
            agent("CapabilityAgentA", "WorkerA"),
            agent("CapabilityAgentB", "WorkerB"),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("WorkerA").unwrap().name(), "CapabilityAgentA");
        assert_eq!(table.lookup("WorkerB").unwrap().name(), "CapabilityAgentB");
        assert!(table.lookup("UnknownServer").is_none());
    }

    #[test]
    fn test_no_prefix_or_case_matching() {
        let table = RoutingTable::build(vec![agent("CapabilityAgentA", "WorkerA")]).unwrap();

        assert!(table.lookup("Worker").is_none());
        assert!(table.lookup("WorkerA2").is_none());
        assert!(table.lookup("workera").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_multiple_routes_for_one_agent() {
        let table = RoutingTable::build(vec![
            agent("CapabilityAgentA", "WorkerA").with_routes(["WorkerA", "Legacy"])
        ])
        .unwrap();

        assert_eq!(table.targets(), vec!["Legacy", "WorkerA"]);
        assert_eq!(table.agents().len(), 1);
        assert_eq!(table.lookup("Legacy").unwrap().name(), "CapabilityAgentA");
    }

    #[test]
    fn test_duplicate_ownership_rejected() {
        let err = RoutingTable::build(vec![
            agent("CapabilityAgentA", "WorkerA"),
            agent("CapabilityAgentB", "WorkerB").with_routes(["WorkerA"]),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Target 'WorkerA' is claimed by both 'CapabilityAgentA' and 'CapabilityAgentB'"
        );
    }

    #[test]
    fn test_empty_table() {
        let table = RoutingTable::build(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.lookup("WorkerA").is_none());
    }
}

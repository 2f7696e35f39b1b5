//! Router topology configuration
//!
//! Declares the capability agents (allow-list, routing ownership, bound
//! worker) and the fallback coordinator. Loaded from TOML; when no file is
//! given the default two-agent topology is used.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Complete router topology
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    #[serde(default)]
    pub fallback: FallbackSection,
    #[serde(default)]
    pub agents: Vec<AgentSection>,
}

/// One capability agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// Agent name (must match [a-zA-Z0-9._-]+)
    pub name: String,
    /// Targets this agent is authorized to invoke
    pub allowed_targets: Vec<String>,
    /// Targets routed to this agent (defaults to `allowed_targets`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<String>>,
    /// Worker type bound to this agent
    pub worker: String,
}

impl AgentSection {
    /// Routing ownership after applying the default
    pub fn effective_routes(&self) -> &[String] {
        self.routes.as_deref().unwrap_or(&self.allowed_targets)
    }
}

/// Fallback coordinator section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackSection {
    #[serde(default = "default_fallback_name")]
    pub name: String,
    #[serde(default = "default_enricher_name")]
    pub enricher: String,
}

fn default_fallback_name() -> String {
    "FallbackCoordinator".to_string()
}

fn default_enricher_name() -> String {
    "Enricher".to_string()
}

impl Default for FallbackSection {
    fn default() -> Self {
        Self {
            name: default_fallback_name(),
            enricher: default_enricher_name(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackSection::default(),
            agents: vec![
                AgentSection {
                    name: "CapabilityAgentA".to_string(),
                    allowed_targets: vec!["WorkerA".to_string()],
                    routes: None,
                    worker: "WorkerA".to_string(),
                },
                AgentSection {
                    name: "CapabilityAgentB".to_string(),
                    allowed_targets: vec!["WorkerB".to_string()],
                    routes: None,
                    worker: "WorkerB".to_string(),
                },
            ],
        }
    }
}

/// Configuration loading and topology errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Target '{target}' is claimed by both '{first}' and '{second}'")]
    DuplicateRoute {
        target: String,
        first: String,
        second: String,
    },
    #[error("No fallback coordinator configured")]
    MissingFallback,
}

impl RouterConfig {
    /// Load and validate configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate identifiers and routing ownership
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_identifier(&self.fallback.name)?;
        validate_identifier(&self.fallback.enricher)?;

        let mut names = HashSet::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for agent in &self.agents {
            validate_identifier(&agent.name)?;
            validate_identifier(&agent.worker)?;

            if !names.insert(agent.name.as_str()) {
                return Err(ConfigError::InvalidConfig(format!(
                    "Agent name '{}' is declared more than once",
                    agent.name
                )));
            }

            if agent.allowed_targets.is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "Agent '{}' must allow at least one target",
                    agent.name
                )));
            }

            for target in agent.allowed_targets.iter().chain(agent.effective_routes()) {
                validate_identifier(target)?;
            }

            for target in agent.effective_routes() {
                if let Some(first) = owners.insert(target.as_str(), agent.name.as_str()) {
                    return Err(ConfigError::DuplicateRoute {
                        target: target.clone(),
                        first: first.to_string(),
                        second: agent.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Names and targets must match [a-zA-Z0-9._-]+
fn validate_identifier(id: &str) -> Result<(), ConfigError> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidIdentifier(format!(
            "'{id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}

//! Message types flowing through the dispatch pipeline
//!
//! A [`Request`] is the only inbound type. [`AgentResult`] and
//! [`EscalationEnvelope`] are transient values created per call, and
//! [`FinalResult`] is the only type the caller observes.

use crate::error::RequestError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key naming the target in an inbound request mapping
pub const TARGET_KEY: &str = "mcp_server";

/// Key carrying the payload in an inbound request mapping
pub const PAYLOAD_KEY: &str = "data";

/// Validated inbound request
///
/// # Examples
/// ```
/// use escalation_router::protocol::Request;
/// use serde_json::json;
///
/// let request = Request::from_value(&json!({
///     "mcp_server": "WorkerA",
///     "data": {"info": "x"}
/// }))
/// .unwrap();
///
/// assert_eq!(request.target, "WorkerA");
/// assert_eq!(request.payload, json!({"info": "x"}));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    /// Worker class this request is meant for, exactly as received
    #[serde(rename = "mcp_server")]
    pub target: Value,
    /// Opaque application data, never interpreted by the router
    #[serde(rename = "data")]
    pub payload: Value,
}

impl Request {
    pub fn new<T: Into<Value>>(target: T, payload: Value) -> Self {
        Self {
            target: target.into(),
            payload,
        }
    }

    /// Validate an inbound mapping and build a request from it.
    ///
    /// Only key presence is checked. A null payload is valid, and a
    /// non-string target is kept as-is; it never names a route.
    pub fn from_value(raw: &Value) -> Result<Self, RequestError> {
        let map = raw
            .as_object()
            .ok_or(RequestError::missing_field(TARGET_KEY))?;

        let target = map
            .get(TARGET_KEY)
            .ok_or(RequestError::missing_field(TARGET_KEY))?;
        let payload = map
            .get(PAYLOAD_KEY)
            .ok_or(RequestError::missing_field(PAYLOAD_KEY))?;

        Ok(Self::new(target.clone(), payload.clone()))
    }

    /// Target as a route key; `None` when the target is not a string
    pub fn target_name(&self) -> Option<&str> {
        self.target.as_str()
    }

    /// Target rendered for messages and diagnostics
    pub fn target_label(&self) -> String {
        match &self.target {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Mapping form of this request, as collaborators see it
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(TARGET_KEY.to_string(), self.target.clone());
        map.insert(PAYLOAD_KEY.to_string(), self.payload.clone());
        Value::Object(map)
    }
}

/// Normalized outcome of a capability agent or the fallback coordinator
///
/// Exactly one of `result` / `error` is meaningful, selected by `solved`.
/// An unsolved result always carries an `error` entry, null when the
/// failing collaborator gave no message.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    pub solved: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    /// Echo of the originating request, kept for the fallback
    pub partial_data: Option<Request>,
}

impl AgentResult {
    /// Create a solved result
    pub fn solved(result: Value) -> Self {
        Self {
            solved: true,
            result: Some(result),
            error: None,
            partial_data: None,
        }
    }

    /// Create an unsolved result echoing the originating request
    pub fn unsolved(error: Option<String>, partial_data: Request) -> Self {
        Self {
            solved: false,
            result: None,
            error,
            partial_data: Some(partial_data),
        }
    }

    /// Create an unsolved result with nothing to echo
    pub fn failed(error: Option<String>) -> Self {
        Self {
            solved: false,
            result: None,
            error,
            partial_data: None,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("solved".to_string(), Value::Bool(self.solved));
        if let Some(result) = &self.result {
            map.insert("result".to_string(), result.clone());
        }
        if !self.solved || self.error.is_some() {
            let error = self.error.clone().map_or(Value::Null, Value::String);
            map.insert("error".to_string(), error);
        }
        if let Some(request) = &self.partial_data {
            map.insert("partial_data".to_string(), request.to_value());
        }
        Value::Object(map)
    }
}

impl Serialize for AgentResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Whatever preceded an escalation
///
/// Serializes untagged, so each variant keeps the mapping shape the
/// enricher would receive if the coordinator falls back to the whole value.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PartialData {
    /// The owning agent ran and reported failure
    AgentFailure(AgentResult),
    /// No agent owns the request's target
    NoAgent { error: String, data: Value },
}

impl PartialData {
    /// The `data` entry of this shape, if it has one.
    ///
    /// An agent result never carries `data`; its payload lives in the
    /// original request.
    pub fn data(&self) -> Option<&Value> {
        match self {
            PartialData::AgentFailure(_) => None,
            PartialData::NoAgent { data, .. } => Some(data),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            PartialData::AgentFailure(result) => result.to_value(),
            PartialData::NoAgent { error, data } => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(error.clone()));
                map.insert("data".to_string(), data.clone());
                Value::Object(map)
            }
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PartialData::AgentFailure(_) => "agent_failure",
            PartialData::NoAgent { .. } => "no_agent",
        }
    }
}

/// Error text placed in the envelope when no agent owns a target
pub const NO_AGENT_ERROR: &str = "No specialized agent for this MCP.";

/// Original request plus the partial result that preceded escalation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EscalationEnvelope {
    pub original_request: Request,
    pub partial_data: PartialData,
}

impl EscalationEnvelope {
    /// Escalation after the owning agent failed
    pub fn from_agent_failure(request: &Request, result: AgentResult) -> Self {
        Self {
            original_request: request.clone(),
            partial_data: PartialData::AgentFailure(result),
        }
    }

    /// Escalation because no agent owns the target
    pub fn from_no_agent(request: &Request) -> Self {
        Self {
            original_request: request.clone(),
            partial_data: PartialData::NoAgent {
                error: NO_AGENT_ERROR.to_string(),
                data: request.payload.clone(),
            },
        }
    }
}

/// Final response handed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FinalResult {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

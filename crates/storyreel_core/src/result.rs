//! Agent invocation results.

use crate::AgentStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Result of a single agent invocation.
///
/// Produced once per `execute` call and consumed by the orchestrator and
/// pipeline to decide continuation. `error` is set iff `status` is
/// [`AgentStatus::Failed`]; `data` is an opaque payload whose shape is the
/// contract between adjacent stages.
///
/// # Examples
///
/// ```
/// use storyreel_core::AgentResult;
/// use serde_json::json;
///
/// let ok = AgentResult::completed("ScriptAgent", json!({"processed_script": "text"}));
/// assert!(ok.is_completed());
///
/// let bad = AgentResult::failed("ScriptAgent", "empty prompt");
/// assert_eq!(bad.error().as_deref(), Some("empty prompt"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AgentResult {
    /// Name of the agent that produced this result
    agent_name: String,
    /// Final execution status
    status: AgentStatus,
    /// Opaque stage output
    data: Value,
    /// Error message, set iff the agent failed
    error: Option<String>,
    /// Free-form per-invocation metadata
    metadata: HashMap<String, Value>,
}

impl AgentResult {
    /// Successful result carrying stage output.
    pub fn completed(agent_name: impl Into<String>, data: Value) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Completed,
            data,
            error: None,
            metadata: HashMap::new(),
        }
    }

    /// Successful result with metadata attached.
    pub fn completed_with(
        agent_name: impl Into<String>,
        data: Value,
        metadata: HashMap<String, Value>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Completed,
            data,
            error: None,
            metadata,
        }
    }

    /// Failed result carrying the error message.
    pub fn failed(agent_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Failed,
            data: Value::Null,
            error: Some(error.into()),
            metadata: HashMap::new(),
        }
    }

    /// Whether the agent completed successfully.
    pub fn is_completed(&self) -> bool {
        self.status == AgentStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_result_has_null_data_and_error() {
        let result = AgentResult::failed("SegmenterAgent", "no input");
        assert!(!result.is_completed());
        assert_eq!(*result.data(), Value::Null);
        assert_eq!(result.error().as_deref(), Some("no input"));
    }

    #[test]
    fn completed_with_attaches_metadata() {
        let mut meta = HashMap::new();
        meta.insert("segment_count".to_string(), json!(4));
        let result = AgentResult::completed_with("SegmenterAgent", json!({}), meta);
        assert_eq!(result.metadata().get("segment_count"), Some(&json!(4)));
    }
}

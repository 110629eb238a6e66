//! The agent contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storyreel_core::{AgentResult, AgentStatus, WorkflowConfig};

/// Snapshot of an agent's identity and state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Agent name
    pub name: String,
    /// One-line role description
    pub role: String,
    /// What the agent is trying to achieve
    pub goal: String,
    /// One-line backstory
    pub backstory: String,
    /// Current execution status
    pub status: AgentStatus,
    /// Declared tool tags
    pub tools: Vec<String>,
}

/// Uniform execution contract for all pipeline agents.
///
/// `execute` must never let an expected failure escape its boundary: bad
/// upstream data and collaborator failures become an
/// [`AgentResult`] with `status: Failed` and the error message attached.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name, e.g. "ScriptAgent".
    fn name(&self) -> &str;

    /// One-line role description.
    fn role(&self) -> &str;

    /// What the agent is trying to achieve.
    fn goal(&self) -> &str;

    /// One-line backstory.
    fn backstory(&self) -> &str;

    /// Declared tool tags.
    fn tools(&self) -> &[&'static str];

    /// Current execution status.
    fn status(&self) -> AgentStatus;

    /// Whether the upstream payload is acceptable input for this agent.
    fn validate_input(&self, input: &Value) -> bool {
        !input.is_null()
    }

    /// Execute the agent against the upstream payload.
    ///
    /// Stage-specific parameters (segment counts, style presets, output
    /// directories) are read from `config`.
    async fn execute(&mut self, input: Value, config: &WorkflowConfig) -> AgentResult;

    /// Identity and state snapshot.
    fn info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name().to_string(),
            role: self.role().to_string(),
            goal: self.goal().to_string(),
            backstory: self.backstory().to_string(),
            status: self.status(),
            tools: self.tools().iter().map(|t| t.to_string()).collect(),
        }
    }
}

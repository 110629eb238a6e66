//! Workflow execution results.

use serde_json::Value;
use std::collections::HashMap;
use storyreel_core::{AgentResult, WorkflowStatus};

/// Outcome of one full workflow execution.
///
/// Holds the per-role results keyed by role tag, the realized execution
/// order, and run-level metadata such as wall-clock timing.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct WorkflowResult {
    /// Final workflow status
    status: WorkflowStatus,
    /// Per-role results, keyed by role tag
    agent_results: HashMap<String, AgentResult>,
    /// Roles in the order they were executed
    execution_order: Vec<String>,
    /// Wall-clock execution time in seconds
    execution_time: f64,
    /// Error message from the failing stage, if any
    error: Option<String>,
    /// Run-level metadata
    metadata: HashMap<String, Value>,
}

impl WorkflowResult {
    pub(crate) fn new(
        status: WorkflowStatus,
        agent_results: HashMap<String, AgentResult>,
        execution_order: Vec<String>,
        execution_time: f64,
        error: Option<String>,
        metadata: HashMap<String, Value>,
    ) -> Self {
        Self {
            status,
            agent_results,
            execution_order,
            execution_time,
            error,
            metadata,
        }
    }

    /// Whether every stage completed.
    pub fn is_completed(&self) -> bool {
        self.status == WorkflowStatus::Completed
    }

    /// Output payload of the last executed stage, if it completed.
    pub fn final_output(&self) -> Option<&Value> {
        let role = self.execution_order.last()?;
        let result = self.agent_results.get(role)?;
        result.is_completed().then(|| result.data())
    }

    /// Result of a single role, if that role ran.
    pub fn result_for(&self, role: &str) -> Option<&AgentResult> {
        self.agent_results.get(role)
    }
}

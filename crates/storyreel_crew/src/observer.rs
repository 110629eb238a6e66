//! Workflow lifecycle observation.

use crate::WorkflowResult;
use storyreel_core::AgentResult;
use tracing::{info, warn};

/// Hooks invoked by [`crate::Crew`] at workflow lifecycle points.
///
/// All methods default to no-ops so observers implement only what they
/// need. Observers must not fail; anything fallible belongs in an agent.
pub trait WorkflowObserver: Send + Sync {
    /// A workflow began executing.
    fn on_workflow_started(&self, _name: &str) {}

    /// A stage is about to execute.
    fn on_agent_started(&self, _role: &str, _agent: &str) {}

    /// A stage finished, successfully or not.
    fn on_agent_finished(&self, _role: &str, _result: &AgentResult) {}

    /// The workflow finished.
    fn on_workflow_finished(&self, _name: &str, _result: &WorkflowResult) {}
}

impl<T: WorkflowObserver + ?Sized> WorkflowObserver for std::sync::Arc<T> {
    fn on_workflow_started(&self, name: &str) {
        (**self).on_workflow_started(name);
    }

    fn on_agent_started(&self, role: &str, agent: &str) {
        (**self).on_agent_started(role, agent);
    }

    fn on_agent_finished(&self, role: &str, result: &AgentResult) {
        (**self).on_agent_finished(role, result);
    }

    fn on_workflow_finished(&self, name: &str, result: &WorkflowResult) {
        (**self).on_workflow_finished(name, result);
    }
}

/// Observer that emits structured log events for each lifecycle point.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl WorkflowObserver for TracingObserver {
    fn on_workflow_started(&self, name: &str) {
        info!(workflow = name, "workflow started");
    }

    fn on_agent_started(&self, role: &str, agent: &str) {
        info!(role, agent, "stage started");
    }

    fn on_agent_finished(&self, role: &str, result: &AgentResult) {
        if result.is_completed() {
            info!(role, agent = %result.agent_name(), "stage completed");
        } else {
            warn!(
                role,
                agent = %result.agent_name(),
                error = result.error().as_deref().unwrap_or("unknown"),
                "stage failed"
            );
        }
    }

    fn on_workflow_finished(&self, name: &str, result: &WorkflowResult) {
        info!(
            workflow = name,
            status = %result.status(),
            seconds = result.execution_time(),
            "workflow finished"
        );
    }
}

//! Sequential workflow orchestrator.

use crate::{WorkflowObserver, WorkflowResult};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use storyreel_agent::{AgentRegistry, AGENT_ROLES};
use storyreel_core::{WorkflowConfig, WorkflowStatus};
use storyreel_error::{ConfigError, StoryreelResult};
use tracing::{info, instrument, warn};

/// Named workflow over a dependency graph of agent roles.
///
/// The standard graph chains the four built-in roles:
/// `script -> segmenter -> prompt_gen -> image_render`. Execution order is
/// resolved topologically at construction, so a cyclic or dangling graph is
/// rejected before anything runs.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use storyreel_agent::AgentRegistry;
/// use storyreel_core::WorkflowConfig;
/// use storyreel_crew::Crew;
/// use storyreel_interface::{ImageRenderer, TextGenerator};
///
/// async fn run(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageRenderer>) {
///     let registry = AgentRegistry::new(text, images);
///     let crew = Crew::new("video_workflow", registry, WorkflowConfig::default()).unwrap();
///     let result = crew.execute(serde_json::json!("a script about tides")).await;
///     assert!(result.is_completed());
/// }
/// ```
pub struct Crew {
    name: String,
    registry: AgentRegistry,
    config: WorkflowConfig,
    graph: Vec<(String, Vec<String>)>,
    order: Vec<String>,
    observers: Vec<Box<dyn WorkflowObserver>>,
}

impl Crew {
    /// Crew over the standard four-stage graph.
    pub fn new(
        name: impl Into<String>,
        registry: AgentRegistry,
        config: WorkflowConfig,
    ) -> StoryreelResult<Self> {
        let graph = AGENT_ROLES
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let deps = if i == 0 {
                    Vec::new()
                } else {
                    vec![AGENT_ROLES[i - 1].to_string()]
                };
                (role.to_string(), deps)
            })
            .collect();
        Self::with_graph(name, registry, config, graph)
    }

    /// Crew over an explicit role graph. Each entry pairs a role tag with
    /// the roles it depends on.
    pub fn with_graph(
        name: impl Into<String>,
        registry: AgentRegistry,
        config: WorkflowConfig,
        graph: Vec<(String, Vec<String>)>,
    ) -> StoryreelResult<Self> {
        let order = topological_order(&graph)?;
        Ok(Self {
            name: name.into(),
            registry,
            config,
            graph,
            order,
            observers: Vec::new(),
        })
    }

    /// Attach an observer. Observers are notified in attachment order.
    pub fn with_observer(mut self, observer: impl WorkflowObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Workflow name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved execution order.
    pub fn execution_order(&self) -> &[String] {
        &self.order
    }

    /// Run configuration shared by every stage.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Pre-flight diagnostics. Empty vec means the workflow is runnable.
    ///
    /// Unlike [`Crew::execute`], this touches no collaborators; it checks
    /// role resolvability, graph references, and configuration values.
    pub fn validate_workflow(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (role, deps) in &self.graph {
            if !self.registry.contains(role) {
                issues.push(format!("role '{role}' has no registered agent"));
            }
            for dep in deps {
                if !self.graph.iter().any(|(r, _)| r == dep) {
                    issues.push(format!("role '{role}' depends on undeclared role '{dep}'"));
                }
            }
        }
        if *self.config.target_segments() <= 0 {
            issues.push(format!(
                "target_segments must be positive, got {}",
                self.config.target_segments()
            ));
        }
        if *self.config.target_duration() <= 0.0 {
            issues.push(format!(
                "target_duration must be positive, got {}",
                self.config.target_duration()
            ));
        }
        if let Err(e) = std::fs::create_dir_all(self.config.output_dir()) {
            issues.push(format!(
                "output directory {} is not writable: {e}",
                self.config.output_dir().display()
            ));
        }
        issues
    }

    /// Execute every stage in dependency order.
    ///
    /// The first stage receives `input`; each later stage receives the
    /// previous stage's output payload. The first failed stage stops the
    /// workflow; stages after it never run.
    #[instrument(skip(self, input), fields(workflow = %self.name))]
    pub async fn execute(&self, input: Value) -> WorkflowResult {
        let started = Instant::now();
        for observer in &self.observers {
            observer.on_workflow_started(&self.name);
        }
        info!(stages = self.order.len(), "executing workflow");

        let mut agent_results = HashMap::new();
        let mut executed = Vec::new();
        let mut current = input;
        let mut error = None;

        for role in &self.order {
            let mut agent = match self.registry.get(role) {
                Ok(agent) => agent,
                Err(e) => {
                    error = Some(format!("cannot resolve role '{role}': {e}"));
                    break;
                }
            };
            for observer in &self.observers {
                observer.on_agent_started(role, agent.name());
            }

            let result = agent.execute(current.clone(), &self.config).await;
            for observer in &self.observers {
                observer.on_agent_finished(role, &result);
            }
            executed.push(role.clone());

            if result.is_completed() {
                current = result.data().clone();
                agent_results.insert(role.clone(), result);
            } else {
                warn!(role = %role, "stage failed, stopping workflow");
                error = result
                    .error()
                    .clone()
                    .or_else(|| Some(format!("stage '{role}' failed")));
                agent_results.insert(role.clone(), result);
                break;
            }
        }

        let status = if error.is_none() {
            WorkflowStatus::Completed
        } else {
            WorkflowStatus::Failed
        };
        let metadata = [
            ("crew_name".to_string(), json!(self.name)),
            ("stages_declared".to_string(), json!(self.order.len())),
            ("stages_executed".to_string(), json!(executed.len())),
        ]
        .into_iter()
        .collect();
        let result = WorkflowResult::new(
            status,
            agent_results,
            executed,
            started.elapsed().as_secs_f64(),
            error,
            metadata,
        );
        for observer in &self.observers {
            observer.on_workflow_finished(&self.name, &result);
        }
        result
    }
}

/// Kahn's algorithm over the role graph. Deterministic for a fixed input
/// order; rejects cycles and references to undeclared roles.
fn topological_order(graph: &[(String, Vec<String>)]) -> StoryreelResult<Vec<String>> {
    let mut in_degree: HashMap<&str, usize> = graph.iter().map(|(r, _)| (r.as_str(), 0)).collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (role, deps) in graph {
        for dep in deps {
            if !in_degree.contains_key(dep.as_str()) {
                return Err(ConfigError::new(format!(
                    "role '{role}' depends on undeclared role '{dep}'"
                ))
                .into());
            }
            *in_degree.get_mut(role.as_str()).ok_or_else(|| {
                ConfigError::new(format!("role '{role}' missing from degree table"))
            })? += 1;
            dependents.entry(dep.as_str()).or_default().push(role.as_str());
        }
    }

    let mut ready: VecDeque<&str> = graph
        .iter()
        .filter(|(r, _)| in_degree[r.as_str()] == 0)
        .map(|(r, _)| r.as_str())
        .collect();
    let mut order = Vec::with_capacity(graph.len());
    while let Some(role) = ready.pop_front() {
        order.push(role.to_string());
        if let Some(next) = dependents.get(role) {
            for dependent in next {
                let degree = in_degree.get_mut(dependent).ok_or_else(|| {
                    ConfigError::new(format!("role '{dependent}' missing from degree table"))
                })?;
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(dependent);
                }
            }
        }
    }

    if order.len() != graph.len() {
        let stuck: Vec<&str> = graph
            .iter()
            .map(|(r, _)| r.as_str())
            .filter(|r| !order.iter().any(|o| o == r))
            .collect();
        return Err(ConfigError::new(format!(
            "workflow graph has a dependency cycle involving: {}",
            stuck.join(", ")
        ))
        .into());
    }
    Ok(order)
}

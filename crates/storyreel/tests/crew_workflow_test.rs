//! Crew orchestration against stub collaborators.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storyreel::{
    AgentRegistry, AgentResult, ConfigError, Crew, ImageRenderer, StoryreelResult, TextGenerator,
    WorkflowConfig, WorkflowObserver, WorkflowResult,
};

const SCRIPT: &str = "The tide rises slowly over the flats. Birds gather along the \
    waterline. A fisherman checks his nets. The first boat leaves before dawn.";

struct StubText;

#[async_trait]
impl TextGenerator for StubText {
    async fn generate(&self, _prompt: &str) -> StoryreelResult<String> {
        Ok(SCRIPT.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-text-v1"
    }
}

struct BrokenText;

#[async_trait]
impl TextGenerator for BrokenText {
    async fn generate(&self, _prompt: &str) -> StoryreelResult<String> {
        Err(ConfigError::new("text backend offline").into())
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "broken-v1"
    }
}

struct TouchImages;

#[async_trait]
impl ImageRenderer for TouchImages {
    async fn render(&self, _prompt: &str, output_path: &Path) -> StoryreelResult<PathBuf> {
        std::fs::write(output_path, b"png").map_err(|e| ConfigError::new(e.to_string()))?;
        Ok(output_path.to_path_buf())
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "touch-v1"
    }
}

#[derive(Default)]
struct CountingObserver {
    started: AtomicUsize,
    finished: AtomicUsize,
    workflows: AtomicUsize,
}

impl WorkflowObserver for CountingObserver {
    fn on_workflow_started(&self, _name: &str) {
        self.workflows.fetch_add(1, Ordering::SeqCst);
    }

    fn on_agent_started(&self, _role: &str, _agent: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_agent_finished(&self, _role: &str, _result: &AgentResult) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }

    fn on_workflow_finished(&self, _name: &str, _result: &WorkflowResult) {
        self.workflows.fetch_add(1, Ordering::SeqCst);
    }
}

fn crew(text: impl TextGenerator + 'static, dir: &Path) -> Crew {
    let registry = AgentRegistry::new(Arc::new(text), Arc::new(TouchImages));
    let config = WorkflowConfig::builder()
        .target_segments(2)
        .output_dir(dir)
        .build()
        .unwrap();
    Crew::new("video_workflow", registry, config).unwrap()
}

#[tokio::test]
async fn workflow_chains_stage_outputs_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let crew = crew(StubText, dir.path());
    let result = crew.execute(json!("Write a script about: tides")).await;

    assert!(result.is_completed());
    assert_eq!(
        *result.execution_order(),
        ["script", "segmenter", "prompt_gen", "image_render"]
    );
    assert_eq!(
        result.result_for("segmenter").unwrap().data()["segment_count"],
        json!(2)
    );
    assert_eq!(result.final_output().unwrap()["image_count"], json!(2));
}

#[tokio::test]
async fn observers_see_every_stage_once() {
    let dir = tempfile::tempdir().unwrap();
    let observer = Arc::new(CountingObserver::default());
    let crew = crew(StubText, dir.path()).with_observer(Arc::clone(&observer));

    let result = crew.execute(json!("Write a script about: tides")).await;
    assert!(result.is_completed());
    assert_eq!(observer.started.load(Ordering::SeqCst), 4);
    assert_eq!(observer.finished.load(Ordering::SeqCst), 4);
    assert_eq!(observer.workflows.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failure_stops_the_chain_and_observers_still_fire() {
    let dir = tempfile::tempdir().unwrap();
    let observer = Arc::new(CountingObserver::default());
    let crew = crew(BrokenText, dir.path()).with_observer(Arc::clone(&observer));

    let result = crew.execute(json!("topic")).await;
    assert!(!result.is_completed());
    assert_eq!(*result.execution_order(), ["script"]);
    assert_eq!(observer.started.load(Ordering::SeqCst), 1);
    assert_eq!(observer.finished.load(Ordering::SeqCst), 1);
    assert_eq!(observer.workflows.load(Ordering::SeqCst), 2);
}

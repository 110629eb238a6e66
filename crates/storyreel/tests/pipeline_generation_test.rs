//! End-to-end pipeline runs against stub collaborators.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storyreel::{
    AgentError, AgentErrorKind, AgentRegistry, ImageRenderer, Pipeline, PipelineState,
    SegmentStatus, StateStore, StoryreelResult, TextGenerator, WorkflowConfig,
};

const SCRIPT: &str = "The tide rises slowly over the flats. Birds gather along the \
    waterline in the early light. A fisherman checks his nets one more time. The first \
    boat leaves the harbor before dawn. Gulls follow the wake out past the breakwater. \
    By noon the water has turned and the flats are bare again.";

struct StubText {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for StubText {
    async fn generate(&self, _prompt: &str) -> StoryreelResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SCRIPT.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-text-v1"
    }
}

struct StubImages {
    calls: Arc<AtomicUsize>,
    fail_segment: Option<&'static str>,
}

#[async_trait]
impl ImageRenderer for StubImages {
    async fn render(&self, _prompt: &str, output_path: &Path) -> StoryreelResult<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = self.fail_segment {
            if output_path.to_string_lossy().contains(marker) {
                return Err(AgentError::new(AgentErrorKind::ExecutionFailed {
                    agent: "stub".to_string(),
                    message: "render backend unavailable".to_string(),
                })
                .into());
            }
        }
        std::fs::write(output_path, b"png").map_err(|e| {
            AgentError::new(AgentErrorKind::ExecutionFailed {
                agent: "stub".to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(output_path.to_path_buf())
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-image-v1"
    }
}

fn registry(fail_segment: Option<&'static str>) -> (AgentRegistry, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let text_calls = Arc::new(AtomicUsize::new(0));
    let image_calls = Arc::new(AtomicUsize::new(0));
    let registry = AgentRegistry::new(
        Arc::new(StubText {
            calls: Arc::clone(&text_calls),
        }),
        Arc::new(StubImages {
            calls: Arc::clone(&image_calls),
            fail_segment,
        }),
    );
    (registry, text_calls, image_calls)
}

fn config(target: i32) -> WorkflowConfig {
    WorkflowConfig::builder()
        .target_segments(target)
        .build()
        .unwrap()
}

#[tokio::test]
async fn generate_content_produces_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, text_calls, image_calls) = registry(None);
    let pipeline = Pipeline::new(registry);

    let report = pipeline
        .generate_content(
            "ocean tides",
            "educational",
            dir.path(),
            Some("Ocean Tides"),
            Some(config(3)),
        )
        .await;

    assert!(report.is_completed(), "report: {report:?}");
    assert!(report.project_slug().starts_with("Ocean_Tides_"));
    assert_eq!(*report.segments_processed(), 3);
    assert_eq!(text_calls.load(Ordering::SeqCst), 1);
    assert_eq!(image_calls.load(Ordering::SeqCst), 3);

    let project_dir = report.output_dir();
    assert!(project_dir.join("state.json").exists());
    assert!(project_dir.join("transcript.txt").exists());
    assert!(project_dir.join("segments.json").exists());
    assert!(project_dir.join("manifest.json").exists());
    for n in 1..=3 {
        let segment_dir = project_dir.join(format!("segment_{n:02}"));
        assert!(segment_dir.join("script.txt").exists());
        assert!(segment_dir.join("prompt.txt").exists());
        assert!(segment_dir.join(format!("image_{n:02}.png")).exists());
    }

    let transcript = std::fs::read_to_string(project_dir.join("transcript.txt")).unwrap();
    assert!(transcript.contains("The tide rises"));

    let manifest = report.manifest();
    assert_eq!(manifest["statistics"]["total_segments"], 3);
    assert_eq!(manifest["statistics"]["success_rate"], 1.0);

    let state = StateStore::new(project_dir.join("state.json")).load().unwrap();
    assert!(state.all_segments_completed());
}

#[tokio::test]
async fn one_failing_segment_does_not_stop_its_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _, _) = registry(Some("segment_03"));
    let pipeline = Pipeline::new(registry);

    let report = pipeline
        .generate_content("ocean tides", "educational", dir.path(), None, Some(config(5)))
        .await;

    assert!(report.is_completed());
    let state: PipelineState = StateStore::new(report.state_file().clone()).load().unwrap();
    assert_eq!(*state.completed_segments(), 4);
    assert_eq!(*state.failed_segments(), 1);

    let failed = &state.segments()["segment_03"];
    assert_eq!(*failed.status(), SegmentStatus::Failed);
    assert!(failed
        .error_message()
        .as_deref()
        .unwrap()
        .contains("render backend unavailable"));

    for n in [1, 2, 4, 5] {
        assert!(report
            .output_dir()
            .join(format!("segment_{n:02}/image_{n:02}.png"))
            .exists());
    }
    assert!(!report.output_dir().join("segment_03/image_03.png").exists());

    let manifest = report.manifest();
    let rate = manifest["statistics"]["success_rate"].as_f64().unwrap();
    assert!((rate - 4.0 / 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn invalid_config_yields_an_error_report_without_collaborator_calls() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, text_calls, image_calls) = registry(None);
    let pipeline = Pipeline::new(registry);

    let report = pipeline
        .generate_content("ocean tides", "educational", dir.path(), None, Some(config(-1)))
        .await;

    assert_eq!(report.status(), "error");
    assert!(report
        .error()
        .as_deref()
        .unwrap()
        .contains("target_segments"));
    assert_eq!(text_calls.load(Ordering::SeqCst), 0);
    assert_eq!(image_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn progress_milestones_are_monotonic_and_end_at_one_hundred() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _, _) = registry(None);
    let updates: Arc<Mutex<Vec<(String, f32)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_updates = Arc::clone(&updates);
    let pipeline = Pipeline::new(registry).with_progress(move |message: &str, percent: f32| {
        sink_updates
            .lock()
            .unwrap()
            .push((message.to_string(), percent));
    });

    let report = pipeline
        .generate_content("ocean tides", "educational", dir.path(), None, Some(config(3)))
        .await;
    assert!(report.is_completed());

    let updates = updates.lock().unwrap();
    let percents: Vec<f32> = updates.iter().map(|(_, p)| *p).collect();
    assert_eq!(percents.first(), Some(&0.0));
    assert_eq!(percents.last(), Some(&100.0));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
    assert!(percents.contains(&25.0));
    assert!(percents.contains(&40.0));
}

#[tokio::test]
async fn transcript_failure_is_fatal_and_reported() {
    struct BrokenText;

    #[async_trait]
    impl TextGenerator for BrokenText {
        async fn generate(&self, _prompt: &str) -> StoryreelResult<String> {
            Err(AgentError::new(AgentErrorKind::ExecutionFailed {
                agent: "stub".to_string(),
                message: "quota exhausted".to_string(),
            })
            .into())
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }

        fn model_name(&self) -> &str {
            "broken-v1"
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let (working, _, _) = registry(None);
    let registry = AgentRegistry::new(Arc::new(BrokenText), working.image_renderer());
    let pipeline = Pipeline::new(registry);

    let report = pipeline
        .generate_content("ocean tides", "educational", dir.path(), None, Some(config(3)))
        .await;

    assert_eq!(report.status(), "error");
    assert!(report.error().as_deref().unwrap().contains("quota exhausted"));
    // The failure is checkpointed before the report is returned.
    let state = StateStore::new(report.state_file().clone()).load().unwrap();
    assert_eq!(format!("{}", state.status()), "failed");
}

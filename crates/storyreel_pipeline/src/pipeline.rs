//! Pipeline director.

use crate::{GenerationReport, PipelineState, ResumeReport, SegmentState, StateStore};
use chrono::Utc;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyreel_agent::AgentRegistry;
use storyreel_core::{PipelineStatus, Segment, SegmentStatus, WorkflowConfig};
use storyreel_crew::Crew;
use storyreel_error::{
    JsonError, PipelineError, PipelineErrorKind, StorageError, StorageErrorKind, StoryreelResult,
};
use storyreel_interface::ProgressSink;
use tracing::{info, instrument, warn};

/// Drives a full topic-to-manifest run with checkpointing.
///
/// Five stages execute strictly in order: transcript, segmentation,
/// per-segment prompts, per-segment images, manifest. A transcript or
/// segmentation failure is fatal to the run; within the per-segment stages a
/// failure marks only that segment and the loop continues. The state file is
/// rewritten after every step, so [`Pipeline::resume_pipeline`] can pick up
/// an interrupted run from its last checkpoint.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use storyreel_agent::AgentRegistry;
/// use storyreel_interface::{ImageRenderer, TextGenerator};
/// use storyreel_pipeline::Pipeline;
///
/// async fn run(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageRenderer>) {
///     let pipeline = Pipeline::new(AgentRegistry::new(text, images))
///         .with_progress(|message: &str, percent: f32| {
///             println!("[{percent:>5.1}%] {message}");
///         });
///     let report = pipeline
///         .generate_content("ocean tides", "educational", Path::new("./output"), None, None)
///         .await;
///     assert!(report.is_completed());
/// }
/// ```
pub struct Pipeline {
    registry: AgentRegistry,
    progress: Option<Arc<dyn ProgressSink>>,
    max_retries: Option<u32>,
}

impl Pipeline {
    /// Pipeline over the given agent registry.
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            progress: None,
            max_retries: None,
        }
    }

    /// Attach a progress sink invoked at coarse milestones.
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Some(Arc::new(sink));
        self
    }

    /// Override the per-segment retry ceiling used by resume. Defaults to
    /// the `max_retries` persisted in the run configuration.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    fn report(&self, message: &str, percent: f32) {
        if let Some(sink) = &self.progress {
            sink.update(message, percent);
        }
    }

    /// Run the full pipeline for a topic.
    ///
    /// Never returns `Err`: a whole-run failure is converted to a report
    /// with `status: "error"` after the state file has been written.
    #[instrument(skip(self, config), fields(topic = %topic))]
    pub async fn generate_content(
        &self,
        topic: &str,
        video_type: &str,
        output_dir: &Path,
        title: Option<&str>,
        config: Option<WorkflowConfig>,
    ) -> GenerationReport {
        let project_title = title.unwrap_or(topic).to_string();
        let slug = project_slug(&project_title);
        let project_dir = output_dir.join(&slug);
        let run_config = config.unwrap_or_default().with_output_dir(&project_dir);
        let store = StateStore::new(project_dir.join("state.json"));
        let mut state =
            PipelineState::new(&slug, topic, video_type, &project_dir, run_config);

        match self.run_stages(&mut state, &store, &project_title).await {
            Ok((manifest, processed)) => GenerationReport::completed(
                slug,
                project_title,
                project_dir,
                manifest,
                processed,
                store.path().to_path_buf(),
            ),
            Err(e) => {
                warn!(error = %e, "pipeline run failed");
                state.set_status(PipelineStatus::Failed);
                if let Err(save_err) = store.save(&state) {
                    warn!(error = %save_err, "could not checkpoint failed state");
                }
                self.report("pipeline failed", -1.0);
                GenerationReport::failed(
                    slug,
                    project_title,
                    project_dir,
                    store.path().to_path_buf(),
                    e.to_string(),
                )
            }
        }
    }

    async fn run_stages(
        &self,
        state: &mut PipelineState,
        store: &StateStore,
        project_title: &str,
    ) -> StoryreelResult<(Value, usize)> {
        self.report("starting pipeline", 0.0);
        let run_config = state.config().clone();
        let project_dir = state.output_dir().clone();
        std::fs::create_dir_all(&project_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::CreateDir {
                path: project_dir.display().to_string(),
                message: e.to_string(),
            })
        })?;

        // Pre-flight validation, before any collaborator call.
        let crew = Crew::new("content_pipeline", self.registry.clone(), run_config.clone())?;
        let issues = crew.validate_workflow();
        if !issues.is_empty() {
            return Err(
                PipelineError::new(PipelineErrorKind::Validation(issues.join("; "))).into(),
            );
        }

        state.set_status(PipelineStatus::Running);
        store.save(state)?;

        // Stage 1: transcript.
        let prompt = format!(
            "Write a {} script about: {}",
            state.video_type(),
            state.topic()
        );
        let mut script_agent = self.registry.get("script")?;
        let script_result = script_agent.execute(json!(prompt), &run_config).await;
        if !script_result.is_completed() {
            return Err(PipelineError::new(PipelineErrorKind::Transcript(
                script_result
                    .error()
                    .clone()
                    .unwrap_or_else(|| "script agent failed".to_string()),
            ))
            .into());
        }
        let transcript = script_result.data()["processed_script"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        write_text(&project_dir.join("transcript.txt"), &transcript)?;
        store.save(state)?;
        self.report("transcript generated", 25.0);

        // Stage 2: segmentation.
        let mut segmenter_agent = self.registry.get("segmenter")?;
        let segment_result = segmenter_agent
            .execute(script_result.data().clone(), &run_config)
            .await;
        if !segment_result.is_completed() {
            return Err(PipelineError::new(PipelineErrorKind::Segmentation(
                segment_result
                    .error()
                    .clone()
                    .unwrap_or_else(|| "segmenter agent failed".to_string()),
            ))
            .into());
        }
        let segments: Vec<Segment> =
            serde_json::from_value(segment_result.data()["segments"].clone())
                .map_err(|e| JsonError::new(e.to_string()))?;
        if segments.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::Segmentation(
                "segmenter produced no segments".to_string(),
            ))
            .into());
        }
        let total_duration: f64 = segments.iter().map(|s| s.duration()).sum();
        write_json(
            &project_dir.join("segments.json"),
            &json!({
                "segments": segment_result.data()["segments"],
                "total_segments": segments.len(),
                "target_duration": run_config.target_duration(),
                "total_duration": total_duration,
                "created_at": Utc::now().to_rfc3339(),
            }),
        )?;
        for segment in &segments {
            state.insert_segment(SegmentState::new(segment_id(*segment.index()), segment.text()));
        }
        store.save(state)?;
        self.report("script segmented", 40.0);

        // Stage 3: per-segment prompts. A failure marks only that segment.
        let total = segments.len();
        for (i, segment) in segments.iter().enumerate() {
            let id = segment_id(*segment.index());
            let segment_dir = project_dir.join(&id);
            match self
                .prompts_for_segment(segment, &segment_dir, &run_config)
                .await
            {
                Ok(prompts) => state.update_segment(&id, |s| s.mark_prompts(prompts)),
                Err(message) => {
                    warn!(segment = %id, error = %message, "prompt stage failed for segment");
                    state.update_segment(&id, |s| s.mark_failed(message));
                }
            }
            store.save(state)?;
            self.report(
                &format!("prompts generated for {id}"),
                40.0 + 25.0 * (i + 1) as f32 / total as f32,
            );
        }

        // Stage 4: per-segment images, only for segments with prompts.
        for (i, segment) in segments.iter().enumerate() {
            let id = segment_id(*segment.index());
            let (status, prompts) = match state.segments().get(&id) {
                Some(record) => (*record.status(), record.enhanced_prompts().clone()),
                None => continue,
            };
            if status != SegmentStatus::PromptsGenerated {
                continue;
            }
            let segment_dir = project_dir.join(&id);
            match self
                .render_for_segment(*segment.index(), &prompts, &segment_dir, &run_config)
                .await
            {
                Ok(paths) => state.update_segment(&id, |s| s.mark_completed(paths)),
                Err(message) => {
                    warn!(segment = %id, error = %message, "image stage failed for segment");
                    state.update_segment(&id, |s| s.mark_failed(message));
                }
            }
            store.save(state)?;
            self.report(
                &format!("images rendered for {id}"),
                65.0 + 30.0 * (i + 1) as f32 / total as f32,
            );
        }

        // Stage 5: manifest.
        let manifest = build_manifest(state, project_title);
        write_json(&project_dir.join("manifest.json"), &manifest)?;
        state.set_status(PipelineStatus::Completed);
        store.save(state)?;
        info!(
            slug = %state.project_slug(),
            completed = state.completed_segments(),
            failed = state.failed_segments(),
            "pipeline complete"
        );
        self.report("pipeline complete", 100.0);
        Ok((manifest, total))
    }

    /// Resume an interrupted run from its state file.
    ///
    /// Segments not yet `Completed` are retried from the first stage whose
    /// artifact is missing: no prompts recorded means prompts then images,
    /// prompts present means images only. Segments at the retry ceiling are
    /// left `Failed`. Never returns `Err`; failures become a report with
    /// `status: "error"`.
    #[instrument(skip(self), fields(state_file = %state_file.display()))]
    pub async fn resume_pipeline(&self, state_file: &Path) -> ResumeReport {
        let store = StateStore::new(state_file);
        let mut state = match store.load() {
            Ok(state) => state,
            Err(e) => {
                let err = PipelineError::new(PipelineErrorKind::Resume(e.to_string()));
                self.report("resume failed", -1.0);
                return ResumeReport::failed(state_file.to_path_buf(), err.to_string());
            }
        };

        let pending = state.pending_segment_ids();
        if pending.is_empty() {
            info!(slug = %state.project_slug(), "nothing to resume");
            return ResumeReport::new(
                "already_complete",
                state.project_slug().clone(),
                0,
                0,
                *state.completed_segments(),
                *state.failed_segments(),
                state_file.to_path_buf(),
            );
        }

        match self.run_resume(&mut state, &store, pending).await {
            Ok((retried, skipped)) => ResumeReport::new(
                "resumed",
                state.project_slug().clone(),
                retried,
                skipped,
                *state.completed_segments(),
                *state.failed_segments(),
                state_file.to_path_buf(),
            ),
            Err(e) => {
                let err = PipelineError::new(PipelineErrorKind::Resume(e.to_string()));
                warn!(error = %err, "resume failed");
                state.set_status(PipelineStatus::Failed);
                if let Err(save_err) = store.save(&state) {
                    warn!(error = %save_err, "could not checkpoint failed state");
                }
                self.report("resume failed", -1.0);
                ResumeReport::failed(state_file.to_path_buf(), err.to_string())
            }
        }
    }

    async fn run_resume(
        &self,
        state: &mut PipelineState,
        store: &StateStore,
        pending: Vec<String>,
    ) -> StoryreelResult<(usize, usize)> {
        self.report("resuming pipeline", 0.0);
        let run_config = state.config().clone();
        let project_dir = state.output_dir().clone();
        let max_retries = self.max_retries.unwrap_or(*run_config.max_retries());

        state.set_status(PipelineStatus::Running);
        store.save(state)?;

        let mut retried = 0;
        let mut skipped = 0;
        let total = pending.len();
        for (i, id) in pending.iter().enumerate() {
            let Some(record) = state.segments().get(id).cloned() else {
                continue;
            };
            if *record.retry_count() >= max_retries {
                info!(segment = %id, retries = record.retry_count(), "retry budget exhausted");
                skipped += 1;
                continue;
            }
            state.update_segment(id, |s| s.begin_retry());
            retried += 1;
            let segment_dir = project_dir.join(id);
            let index = parse_segment_index(id);

            if record.enhanced_prompts().is_empty() {
                let segment = reconstruct_segment(index, record.script_content());
                match self
                    .prompts_for_segment(&segment, &segment_dir, &run_config)
                    .await
                {
                    Ok(prompts) => state.update_segment(id, |s| s.mark_prompts(prompts)),
                    Err(message) => {
                        warn!(segment = %id, error = %message, "retry failed at prompt stage");
                        state.update_segment(id, |s| s.mark_failed(message));
                        store.save(state)?;
                        continue;
                    }
                }
            }

            let prompts = state
                .segments()
                .get(id)
                .map(|s| s.enhanced_prompts().clone())
                .unwrap_or_default();
            match self
                .render_for_segment(index, &prompts, &segment_dir, &run_config)
                .await
            {
                Ok(paths) => state.update_segment(id, |s| s.mark_completed(paths)),
                Err(message) => {
                    warn!(segment = %id, error = %message, "retry failed at image stage");
                    state.update_segment(id, |s| s.mark_failed(message));
                }
            }
            store.save(state)?;
            self.report(
                &format!("retried {id}"),
                100.0 * (i + 1) as f32 / total as f32,
            );
        }

        let title = state.topic().clone();
        let manifest = build_manifest(state, &title);
        write_json(&project_dir.join("manifest.json"), &manifest)?;
        state.set_status(PipelineStatus::Completed);
        store.save(state)?;
        info!(retried, skipped, "resume complete");
        self.report("resume complete", 100.0);
        Ok((retried, skipped))
    }

    /// Prompt stage for one segment. Returns the enhanced prompts or the
    /// failure message to record on the segment.
    async fn prompts_for_segment(
        &self,
        segment: &Segment,
        segment_dir: &Path,
        config: &WorkflowConfig,
    ) -> Result<Vec<String>, String> {
        std::fs::create_dir_all(segment_dir)
            .map_err(|e| format!("cannot create {}: {e}", segment_dir.display()))?;
        std::fs::write(segment_dir.join("script.txt"), segment.text())
            .map_err(|e| format!("cannot write script.txt: {e}"))?;

        let mut agent = self.registry.get("prompt_gen").map_err(|e| e.to_string())?;
        let result = agent
            .execute(json!({ "segments": [segment] }), config)
            .await;
        if !result.is_completed() {
            return Err(result
                .error()
                .clone()
                .unwrap_or_else(|| "prompt generation failed".to_string()));
        }
        let prompts: Vec<String> = result.data()["enhanced_prompts"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|p| p["enhanced_prompt"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        if prompts.is_empty() {
            return Err("prompt generation produced no prompts".to_string());
        }
        std::fs::write(segment_dir.join("prompt.txt"), prompts.join("\n"))
            .map_err(|e| format!("cannot write prompt.txt: {e}"))?;
        Ok(prompts)
    }

    /// Image stage for one segment. Returns the rendered paths or the
    /// failure message to record on the segment.
    async fn render_for_segment(
        &self,
        index: usize,
        prompts: &[String],
        segment_dir: &Path,
        config: &WorkflowConfig,
    ) -> Result<Vec<PathBuf>, String> {
        let mut agent = self
            .registry
            .get("image_render")
            .map_err(|e| e.to_string())?;
        let entries: Vec<Value> = prompts
            .iter()
            .map(|p| json!({ "segment_index": index, "enhanced_prompt": p }))
            .collect();
        let segment_config = config.clone().with_output_dir(segment_dir);
        let result = agent
            .execute(json!({ "enhanced_prompts": entries }), &segment_config)
            .await;
        if !result.is_completed() {
            return Err(result
                .error()
                .clone()
                .unwrap_or_else(|| "image rendering failed".to_string()));
        }

        let mut paths = Vec::new();
        for image in result.data()["generated_images"]
            .as_array()
            .cloned()
            .unwrap_or_default()
        {
            if image["status"] == json!("success") {
                if let Some(path) = image["image_path"].as_str() {
                    paths.push(PathBuf::from(path));
                }
            } else {
                return Err(image["error"]
                    .as_str()
                    .unwrap_or("image render failed")
                    .to_string());
            }
        }
        if paths.is_empty() {
            return Err("no images rendered".to_string());
        }
        Ok(paths)
    }
}

/// Zero-padded segment id for a 1-based index.
fn segment_id(index: usize) -> String {
    format!("segment_{index:02}")
}

fn parse_segment_index(id: &str) -> usize {
    id.rsplit('_')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Minimal segment rebuilt from persisted script content, for retries where
/// the original segmenter output is no longer in memory.
fn reconstruct_segment(index: usize, text: &str) -> Segment {
    let word_count = text.split_whitespace().count();
    let duration = word_count as f64 / storyreel_segment::WORDS_PER_SECOND;
    Segment::new(index, text.to_string(), duration, word_count, 0.0, duration)
}

/// Directory-safe project identifier: filtered, Title_Cased, truncated to 50
/// chars, with a timestamp suffix for uniqueness.
fn project_slug(name: &str) -> String {
    let filtered: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let mut base = filtered
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join("_");
    if base.is_empty() {
        base = "Untitled".to_string();
    }
    base.truncate(50);
    format!("{base}_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn build_manifest(state: &PipelineState, project_title: &str) -> Value {
    let segments: Vec<Value> = state
        .segments()
        .values()
        .map(|s| {
            json!({
                "segment_id": s.segment_id(),
                "status": s.status(),
                "script": s.script_content(),
                "prompts": s.enhanced_prompts(),
                "images": s.image_paths(),
                "error": s.error_message(),
                "retry_count": s.retry_count(),
            })
        })
        .collect();
    let total = *state.total_segments();
    let completed = *state.completed_segments();
    let success_rate = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };
    json!({
        "project": {
            "slug": state.project_slug(),
            "title": project_title,
            "topic": state.topic(),
            "video_type": state.video_type(),
            "output_dir": state.output_dir(),
            "created_at": state.created_at(),
        },
        "segments": segments,
        "statistics": {
            "total_segments": total,
            "completed_segments": completed,
            "failed_segments": state.failed_segments(),
            "success_rate": success_rate,
        },
        "generated_at": Utc::now().to_rfc3339(),
    })
}

fn write_text(path: &Path, contents: &str) -> StoryreelResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    Ok(())
}

fn write_json(path: &Path, value: &Value) -> StoryreelResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    write_text(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_filtered_title_cased_and_timestamped() {
        let slug = project_slug("the rise & fall of OCEAN tides!");
        let (base, timestamp) = slug.split_at(slug.len() - 16);
        assert_eq!(base, "The_Rise_Fall_Of_Ocean_Tides");
        assert!(timestamp.starts_with('_'));
        assert_eq!(timestamp.len(), 16);
    }

    #[test]
    fn slug_base_is_truncated_to_fifty_chars() {
        let slug = project_slug(&"word ".repeat(30));
        let base_len = slug.len() - 16;
        assert!(base_len <= 50);
    }

    #[test]
    fn empty_title_falls_back_to_untitled() {
        let slug = project_slug("!!!");
        assert!(slug.starts_with("Untitled_"));
    }

    #[test]
    fn segment_ids_are_zero_padded_and_parse_back() {
        assert_eq!(segment_id(7), "segment_07");
        assert_eq!(parse_segment_index("segment_07"), 7);
        assert_eq!(parse_segment_index("segment_12"), 12);
    }

    #[test]
    fn reconstructed_segment_estimates_duration_from_words() {
        let segment = reconstruct_segment(3, "five words of segment text");
        assert_eq!(*segment.index(), 3);
        assert_eq!(*segment.word_count(), 5);
        assert!((segment.duration() - 2.0).abs() < 1e-9);
    }
}

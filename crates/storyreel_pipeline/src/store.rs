//! State file persistence.

use crate::{PipelineState, STATE_SCHEMA_VERSION};
use std::path::{Path, PathBuf};
use storyreel_error::{JsonError, StorageError, StorageErrorKind, StoryreelResult};
use tracing::{debug, error};

/// Reads and writes `state.json` for one project directory.
///
/// Saves are whole-file overwrites of pretty-printed JSON; loads are strict,
/// so an unknown status string or a schema-version mismatch fails instead of
/// silently resuming from a state this build does not understand.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store over the given state file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the full state, replacing any previous checkpoint.
    pub fn save(&self, state: &PipelineState) -> StoryreelResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::CreateDir {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })
            })?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| JsonError::new(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "state save failed");
            StorageError::new(StorageErrorKind::FileWrite {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        debug!(
            path = %self.path.display(),
            segments = state.segments().len(),
            "state checkpointed"
        );
        Ok(())
    }

    /// Load and strictly parse the checkpoint.
    pub fn load(&self) -> StoryreelResult<PipelineState> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "state load failed");
            StorageError::new(StorageErrorKind::FileRead {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        let state: PipelineState =
            serde_json::from_str(&json).map_err(|e| JsonError::new(e.to_string()))?;
        if *state.schema_version() != STATE_SCHEMA_VERSION {
            return Err(StorageError::new(StorageErrorKind::SchemaVersion {
                found: *state.schema_version(),
                expected: STATE_SCHEMA_VERSION,
            })
            .into());
        }
        debug!(
            path = %self.path.display(),
            segments = state.segments().len(),
            "state loaded"
        );
        Ok(state)
    }
}

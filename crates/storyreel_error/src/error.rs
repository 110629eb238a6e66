//! Top-level error wrapper types.

use crate::{AgentError, ConfigError, JsonError, PipelineError, SegmentError, StorageError};

/// The foundation error enum covering every failure class in the workspace.
///
/// # Examples
///
/// ```
/// use storyreel_error::{ConfigError, StoryreelError};
///
/// let config_err = ConfigError::new("missing output directory");
/// let err: StoryreelError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryreelErrorKind {
    /// Invalid configuration, rejected before any collaborator call
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Script segmentation error
    #[from(SegmentError)]
    Segment(SegmentError),
    /// Agent construction or execution error
    #[from(AgentError)]
    Agent(AgentError),
    /// Fatal pipeline stage error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// State or artifact persistence error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyreel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyreel_error::{ConfigError, StoryreelResult};
///
/// fn might_fail() -> StoryreelResult<()> {
///     Err(ConfigError::new("bad value"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyreel Error: {}", _0)]
pub struct StoryreelError(Box<StoryreelErrorKind>);

impl StoryreelError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryreelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryreelErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StoryreelErrorKind
impl<T> From<T> for StoryreelError
where
    T: Into<StoryreelErrorKind>,
{
    fn from(value: T) -> Self {
        Self(Box::new(value.into()))
    }
}

/// Convenience alias for fallible Storyreel operations.
pub type StoryreelResult<T> = Result<T, StoryreelError>;

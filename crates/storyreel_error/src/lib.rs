//! Error types for the Storyreel content pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enums define specific error conditions
//! - `*Error` structs wrap the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyreel_error::{ConfigError, StoryreelResult};
//!
//! fn check(count: i32) -> StoryreelResult<()> {
//!     if count <= 0 {
//!         Err(ConfigError::new("target_segments must be positive"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(0).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod config;
mod error;
mod json;
mod pipeline;
mod segment;
mod storage;

pub use agent::{AgentError, AgentErrorKind};
pub use config::ConfigError;
pub use error::{StoryreelError, StoryreelErrorKind, StoryreelResult};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use segment::{SegmentError, SegmentErrorKind};
pub use storage::{StorageError, StorageErrorKind};

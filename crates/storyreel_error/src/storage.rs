//! Storage error types.

/// Specific error conditions for state and artifact persistence.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to read a persisted file
    #[display("Failed to read {}: {}", path, message)]
    FileRead {
        /// Path that failed
        path: String,
        /// Underlying error message
        message: String,
    },
    /// Failed to write a persisted file
    #[display("Failed to write {}: {}", path, message)]
    FileWrite {
        /// Path that failed
        path: String,
        /// Underlying error message
        message: String,
    },
    /// Failed to create a directory
    #[display("Failed to create directory {}: {}", path, message)]
    CreateDir {
        /// Path that failed
        path: String,
        /// Underlying error message
        message: String,
    },
    /// Persisted state carries an unsupported schema version
    #[display("Unsupported state schema version {} (expected {})", found, expected)]
    SchemaVersion {
        /// Version found in the file
        found: u32,
        /// Version this build understands
        expected: u32,
    },
}

/// Error type for persistence operations.
///
/// Losing a checkpoint defeats the resume contract, so storage errors are
/// logged at the call site and propagated rather than swallowed.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The specific error condition
    pub kind: StorageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StorageError {
    /// Create a new StorageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

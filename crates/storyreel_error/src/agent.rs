//! Agent error types.

/// Specific error conditions for agent construction and execution.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum AgentErrorKind {
    /// Requested role tag has no registered agent
    #[display("Unknown agent type: {}", _0)]
    UnknownAgent(String),
    /// Upstream data failed the agent's input validation
    #[display("Agent '{}' rejected its input: {}", agent, message)]
    InvalidInput {
        /// Agent name
        agent: String,
        /// Reason the input was rejected
        message: String,
    },
    /// A collaborator call failed during execution
    #[display("Agent '{}' execution failed: {}", agent, message)]
    ExecutionFailed {
        /// Agent name
        agent: String,
        /// Error message from the collaborator or stage
        message: String,
    },
}

/// Error type for agent operations.
///
/// # Examples
///
/// ```
/// use storyreel_error::{AgentError, AgentErrorKind};
///
/// let err = AgentError::new(AgentErrorKind::UnknownAgent("narrator".into()));
/// assert!(format!("{}", err).contains("Unknown agent type"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Agent Error: {} at line {} in {}", kind, line, file)]
pub struct AgentError {
    /// The specific error condition
    pub kind: AgentErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AgentError {
    /// Create a new AgentError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AgentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

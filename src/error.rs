//! Error types for action dispatch and the browser host boundary

use thiserror::Error;

/// Result type alias for action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Result type alias for host calls
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Errors raised by the browser host
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// The tab, window, frame, bookmark or session does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The host refused the operation (permissions, invalid frame, ...)
    #[error("rejected: {0}")]
    Rejected(String),

    /// The host does not implement the operation
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Action error types
#[derive(Debug, Error)]
pub enum ActionError {
    /// No command is registered under this name
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The target tab/window/frame vanished before the command ran
    #[error("target gone: {0}")]
    TargetGone(String),

    /// A host call failed
    #[error("host operation failed: {0}")]
    HostOperationFailed(String),

    /// Invalid arguments or configuration values
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<HostError> for ActionError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NotFound(what) => ActionError::TargetGone(what),
            other => ActionError::HostOperationFailed(other.to_string()),
        }
    }
}

impl ActionError {
    /// Stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            ActionError::TargetGone(_) => "TARGET_GONE",
            ActionError::HostOperationFailed(_) => "HOST_OPERATION_FAILED",
            ActionError::InvalidArguments(_) => "INVALID_ARGUMENTS",
            ActionError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the dispatcher must return this error to its caller.
    ///
    /// `surfaced_by_command` is set for commands whose failures would leave
    /// the user with an inconsistent state (the toggles).
    pub fn is_reportable(&self, surfaced_by_command: bool) -> bool {
        match self {
            ActionError::UnknownCommand(_) => true,
            ActionError::TargetGone(_) => false,
            ActionError::HostOperationFailed(_) => surfaced_by_command,
            ActionError::InvalidArguments(_) | ActionError::SerializationError(_) => true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

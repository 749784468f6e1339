//! Error types for auditstore operations

use thiserror::Error;

/// Numeric error code with a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    pub code: u16,
    pub message: &'static str,
}

impl ErrorCode {
    pub const NOT_FOUND: ErrorCode = ErrorCode {
        code: 404,
        message: "NotFound",
    };

    pub const CONFLICT: ErrorCode = ErrorCode {
        code: 409,
        message: "Conflict",
    };
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// Precondition violations, raised before any inner store call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identity is not assigned")]
    UnassignedIdentity,

    #[error("operation context has no user agent")]
    MissingUserAgent,

    #[error("isDeleted cannot be set to true in {operation}")]
    DeletedEntity { operation: &'static str },
}

/// Errors originating in a storage adapter.
///
/// The decorator layers never construct these; they only pass them through.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("backend failure: {reason}")]
    Backend { reason: String },
}

/// Master error type for store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entity not found: {id}")]
    NotFound { id: String },

    #[error("Entity already exists: {id}")]
    Conflict { id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

impl StoreError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub fn conflict(id: impl std::fmt::Display) -> Self {
        Self::Conflict { id: id.to_string() }
    }

    /// Numeric code for the two error kinds the store layers raise themselves.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::NotFound { .. } => Some(ErrorCode::NOT_FOUND),
            Self::Conflict { .. } => Some(ErrorCode::CONFLICT),
            Self::InvalidInput(_) | Self::Adapter(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// TESTS
// =============================================================================

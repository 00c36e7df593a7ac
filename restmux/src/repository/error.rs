//! Item provider error types
//!
//! A provider reports "not found" and "key exists" through its return values,
//! never through these errors. A [`ProviderError`] means the provider could
//! not answer at all, and the dispatcher turns it into a 500.
//!
//! # Example
//!
//! ```rust
//! use restmux::repository::{ProviderError, ProviderErrorKind, ProviderOperation};
//!
//! let error = ProviderError::unavailable(ProviderOperation::GetMany, "backing store offline");
//! assert_eq!(error.kind, ProviderErrorKind::Unavailable);
//! assert_eq!(
//!     error.to_string(),
//!     "Provider unavailable error during get_many: backing store offline"
//! );
//! ```

use std::fmt;

/// Operation being performed when the provider failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// Fetching one item by key
    GetOne,
    /// Fetching a filtered collection
    GetMany,
    /// Inserting an item
    Insert,
    /// Updating an item
    Update,
    /// Deleting an item
    Delete,
    /// Answering a health probe
    HealthCheck,
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetOne => write!(f, "get_one"),
            Self::GetMany => write!(f, "get_many"),
            Self::Insert => write!(f, "insert"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::HealthCheck => write!(f, "health_check"),
        }
    }
}

/// Category of provider error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Backing store could not be reached
    Unavailable,
    /// Operation timed out
    Timeout,
    /// Item failed validation
    ValidationFailed,
    /// Stored data could not be converted
    SerializationError,
    /// Underlying store reported an error
    BackendError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Timeout => write!(f, "timeout"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::BackendError => write!(f, "backend_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured provider error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// The operation being performed when the error occurred
    pub operation: ProviderOperation,
    /// The category of error
    pub kind: ProviderErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl ProviderError {
    /// Create a new provider error
    pub fn new(
        operation: ProviderOperation,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Backing store could not be reached
    pub fn unavailable(operation: ProviderOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ProviderErrorKind::Unavailable, message)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Provider {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for ProviderError {}

//! Error types

use thiserror::Error;

use crate::codec::CodecError;
use crate::repository::ProviderError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error type
///
/// Every variant is terminal for the current request only. The dispatcher
/// logs the full error and answers with an opaque `INTERNAL ERROR` body.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Encode/decode failure at the codec boundary
    #[error("{0}")]
    Codec(#[from] CodecError),

    /// Failure reported by an item provider
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Health probe failed
    #[error("Health check failed: {0}")]
    Unhealthy(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Short machine-readable code used in log fields
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Codec(_) => "CODEC_ERROR",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Unhealthy(_) => "UNHEALTHY",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

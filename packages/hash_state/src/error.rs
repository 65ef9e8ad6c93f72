//! Error handling for hash state operations

use thiserror::Error;

/// Hash state errors
///
/// Primitive failures (`InitFailed` through `WipeFailed`) are fatal for the
/// state that produced them; the state must be re-initialized or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Unrecognized algorithm tag or name, or an algorithm the mode policy forbids
    #[error("Invalid hash algorithm: {0}")]
    InvalidAlgorithm(String),

    /// Digest context could not be initialized
    #[error("Hash initialization failed: {0}")]
    InitFailed(String),

    /// Digest context rejected input
    #[error("Hash update failed: {0}")]
    UpdateFailed(String),

    /// Digest context could not be finalized
    #[error("Hash digest failed: {0}")]
    DigestFailed(String),

    /// Digest context could not be duplicated
    #[error("Hash copy failed: {0}")]
    CopyFailed(String),

    /// Digest context could not be wiped for reuse
    #[error("Hash wipe failed: {0}")]
    WipeFailed(String),

    /// Caller supplied an output buffer of the wrong length
    #[error("Digest size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Length required by the bound algorithm
        expected: usize,
        /// Length supplied by the caller
        actual: usize,
    },

    /// An opaque digest context handle is not held
    #[error("Digest context unavailable: {0}")]
    NullResource(String),

    /// Mode policy configuration could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl HashError {
    /// Create an `InvalidAlgorithm` error
    #[must_use]
    pub fn invalid_algorithm(msg: impl Into<String>) -> Self {
        Self::InvalidAlgorithm(msg.into())
    }

    /// Create an `UpdateFailed` error
    #[must_use]
    pub fn update_failed(msg: impl Into<String>) -> Self {
        Self::UpdateFailed(msg.into())
    }

    /// Create a `DigestFailed` error
    #[must_use]
    pub fn digest_failed(msg: impl Into<String>) -> Self {
        Self::DigestFailed(msg.into())
    }

    /// Create a `NullResource` error
    #[must_use]
    pub fn null_resource(msg: impl Into<String>) -> Self {
        Self::NullResource(msg.into())
    }

    /// Whether the error leaves the state unusable until the next `init`
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InitFailed(_)
                | Self::UpdateFailed(_)
                | Self::DigestFailed(_)
                | Self::CopyFailed(_)
                | Self::WipeFailed(_)
        )
    }
}

/// Result type for hash state operations
pub type Result<T> = std::result::Result<T, HashError>;

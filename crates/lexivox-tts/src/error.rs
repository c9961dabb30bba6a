//! Error types for synthesis providers

use thiserror::Error;

/// Synthesis error types
#[derive(Error, Debug)]
pub enum TtsError {
    /// Provider is not available (missing credentials, binary, or library)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// The remote or local engine reported a synthesis failure
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// The response was empty or could not be decoded into audio
    #[error("Malformed audio response: {0}")]
    MalformedResponse(String),

    /// Invalid text or voice input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (file operations, process spawning)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },
}

/// Result type for synthesis operations
pub type TtsResult<T> = Result<T, TtsError>;

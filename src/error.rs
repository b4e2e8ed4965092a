//! Error types for the pet photo editing workflow.

/// Errors that can occur while turning a pet photo into a Christmas edit.
#[derive(Debug, thiserror::Error)]
pub enum XmasifyError {
    /// The pet-presence check explicitly reported no animal in the photo.
    /// Hard stop: the user must upload a different photo.
    #[error("We couldn't detect a pet in this photo. Please upload a clear photo of your furry friend!")]
    NoPetDetected,

    /// The edit response contained no inline image. The model may have
    /// refused the request; indistinguishable from other empty results.
    #[error("The model did not return an image. It might have refused the request.")]
    NoImageReturned,

    /// A 403/404-equivalent failure. The active API key is unusable and the
    /// user must select a different one.
    #[error("{0}")]
    CredentialInvalid(String),

    /// Catch-all for edit failures, carrying the original message.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// API key missing or invalid at client construction.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Invalid request or illegal workflow transition.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The uploaded file is not an accepted image type.
    #[error("{0}")]
    UnsupportedImage(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading the upload or saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XmasifyError {
    /// Returns true if this failure means the active API key must be
    /// replaced. Callers use this to flip the credential gate back to
    /// absent (the only post-startup revision of the gate).
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::CredentialInvalid(_))
    }

    /// Returns true if the user can simply retry the same request.
    pub fn is_retryable_by_user(&self) -> bool {
        matches!(
            self,
            Self::NoImageReturned | Self::GenerationFailed(_) | Self::Network(_)
        )
    }
}

/// Result type alias for the editing workflow.
pub type Result<T> = std::result::Result<T, XmasifyError>;

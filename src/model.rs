//! The generative model seam.
//!
//! The orchestrator talks to the remote service through this trait so the
//! two-call workflow can be exercised against a scripted stand-in. The
//! credential-check object the original host injected as ambient state is
//! handled the same way in [`crate::credentials`].

use crate::error::Result;
use crate::image::SourceImage;
use async_trait::async_trait;

/// A content segment of a generation response.
///
/// Responses are heterogeneous: a segment carries plain text, inline binary
/// image data, or (rarely) neither.
#[derive(Debug, Clone, Default)]
pub struct ResponsePart {
    /// Plain text content, if any.
    pub text: Option<String>,
    /// Inline image content, if any.
    pub inline_data: Option<InlineImage>,
}

/// Inline binary image data plus its declared media type.
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// Declared MIME type. Absent in some responses; callers default to PNG.
    pub mime_type: Option<String>,
    /// Base64-encoded image payload.
    pub data: String,
}

/// Client for the two calls the workflow makes against the generative
/// service.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Issues a lightweight classification request over the image and
    /// returns the raw text of the response.
    async fn classify(&self, image: &SourceImage, prompt: &str) -> Result<String>;

    /// Issues an image edit request and returns the response's content
    /// segments. At most one segment is expected to carry inline image data.
    async fn edit(&self, image: &SourceImage, prompt: &str) -> Result<Vec<ResponsePart>>;
}

#![warn(missing_docs)]
//! Xmasify - Christmas-themed pet photo edits via the Gemini image API.
//!
//! Upload a pet photo, pick or type a style instruction, and get back a
//! festive re-rendering with the pet itself left untouched. The workflow
//! makes two sequential calls against the API: a cheap pet-presence check,
//! then the actual edit.
//!
//! # Quick Start
//!
//! ```no_run
//! use xmasify::{generate_christmas_edit, GeminiClient};
//!
//! #[tokio::main]
//! async fn main() -> xmasify::Result<()> {
//!     let source = xmasify::upload::load_source("dog.jpg")?;
//!     let client = GeminiClient::builder().build()?;
//!     let image = generate_christmas_edit(&client, &source, "add a tiny Santa hat").await?;
//!     image.save("festive-dog.png")?;
//!     Ok(())
//! }
//! ```

mod error;

pub mod credentials;
pub mod edit;
pub mod gemini;
pub mod image;
pub mod model;
pub mod presets;
pub mod session;
pub mod upload;

pub use error::{Result, XmasifyError};

pub use edit::{compose_edit_prompt, generate_christmas_edit};
pub use gemini::{GeminiClient, GeminiClientBuilder};
pub use image::{GeneratedImage, ImageFormat, SourceImage};
pub use model::{GenerativeModel, InlineImage, ResponsePart};
pub use presets::{compose, StylePreset, PRESET_STYLES};
pub use session::{Session, WorkflowPhase};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::credentials::{CredentialGate, CredentialHost, EnvCredentialHost};
    pub use crate::edit::generate_christmas_edit;
    pub use crate::error::{Result, XmasifyError};
    pub use crate::gemini::GeminiClient;
    pub use crate::image::{GeneratedImage, SourceImage};
    pub use crate::model::GenerativeModel;
    pub use crate::session::{Session, WorkflowPhase};
}

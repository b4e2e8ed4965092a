//! The two-call edit workflow: pet-presence check, then the Christmas edit.
//!
//! The check fails open (any technical failure proceeds to the edit) while
//! the edit fails closed. That asymmetry is a deliberate trade-off of
//! availability over strict filtering: the check only exists to avoid
//! spending the expensive edit call on photos with no clear subject.

use crate::error::{Result, XmasifyError};
use crate::image::{decode_base64, GeneratedImage, ImageFormat, SourceImage};
use crate::model::GenerativeModel;
use serde::Deserialize;

/// Prompt for the pet-presence check, requesting a structured boolean.
const PET_CHECK_PROMPT: &str = "Analyze this image. Does it contain a visible real animal or pet (like a dog, cat, bird, hamster, rabbit, etc)? \
If it is a human, a landscape, or an object without an animal, return false. \
Return a JSON object with a single property \"hasPet\" (boolean).";

/// Instruction used when the user supplies no text of their own.
const DEFAULT_INSTRUCTION: &str =
    "Decorate the surroundings with Christmas lights, snow, and gifts.";

/// Message shown when the active key is rejected by the API.
const ACCESS_DENIED_HINT: &str = "Access denied. Please ensure you have selected a valid API key with billing enabled for Gemini 3 Pro.";

#[derive(Debug, Deserialize)]
struct PetCheck {
    #[serde(rename = "hasPet", default)]
    has_pet: Option<bool>,
}

/// Builds the full edit instruction around the user's text.
///
/// Identity preservation comes first: the model must keep the exact animal
/// and only restyle its surroundings.
pub fn compose_edit_prompt(user_prompt: &str) -> String {
    let instructions = if user_prompt.is_empty() {
        DEFAULT_INSTRUCTION
    } else {
        user_prompt
    };

    format!(
        "Edit this photo to create a Christmas-themed masterpiece. \
CRITICAL: You MUST preserve the exact appearance, breed, fur color/pattern, and pose of the pet in the original image. Do not generate a different animal.\n\
\n\
Task:\n\
1. Keep the pet exactly as is (identity preservation is priority #1).\n\
2. Change the background or add elements to create a festive Christmas atmosphere.\n\
3. Ensure the lighting on the pet matches the new scene (warm, magical holiday lighting).\n\
\n\
User Instructions: {instructions}\n\
\n\
Style: Photorealistic, cinematic lighting, 8k resolution, magical holiday vibes."
    )
}

/// Runs the two-call workflow and returns the generated edit.
///
/// Exactly one edit request is issued, and only after the pet check either
/// passes or fails open. No state is mutated; the caller applies the result
/// to its session.
pub async fn generate_christmas_edit<M: GenerativeModel + ?Sized>(
    model: &M,
    image: &SourceImage,
    user_prompt: &str,
) -> Result<GeneratedImage> {
    check_pet_presence(model, image).await?;

    let prompt = compose_edit_prompt(user_prompt);
    let parts = model
        .edit(image, &prompt)
        .await
        .map_err(classify_edit_failure)?;

    let inline = parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or(XmasifyError::NoImageReturned)?;

    let data = decode_base64(&inline.data).map_err(classify_edit_failure)?;
    let format = inline
        .mime_type
        .as_deref()
        .and_then(ImageFormat::from_mime_type)
        .unwrap_or(ImageFormat::Png);

    Ok(GeneratedImage::new(data, format))
}

/// The soft gate before the expensive edit call.
///
/// Only an explicit `{"hasPet": false}` stops the workflow. A missing
/// field, unparsable text, or a failed request is logged and tolerated.
async fn check_pet_presence<M: GenerativeModel + ?Sized>(
    model: &M,
    image: &SourceImage,
) -> Result<()> {
    let text = match model.classify(image, PET_CHECK_PROMPT).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("pet detection check failed, proceeding anyway: {e}");
            return Ok(());
        }
    };

    match serde_json::from_str::<PetCheck>(text.trim()) {
        Ok(PetCheck {
            has_pet: Some(false),
        }) => Err(XmasifyError::NoPetDetected),
        Ok(PetCheck { has_pet }) => {
            tracing::debug!(?has_pet, "pet detection check passed");
            Ok(())
        }
        Err(e) => {
            tracing::warn!("pet detection returned unparsable text, proceeding anyway: {e}");
            Ok(())
        }
    }
}

/// Maps edit-call failures into the user-facing taxonomy.
///
/// 403/404-equivalents mean the active key cannot reach the image model;
/// everything else keeps its original message.
fn classify_edit_failure(err: XmasifyError) -> XmasifyError {
    match err {
        XmasifyError::Api {
            status: 403 | 404, ..
        } => XmasifyError::CredentialInvalid(ACCESS_DENIED_HINT.into()),
        e @ XmasifyError::CredentialInvalid(_) => e,
        e => {
            let message = e.to_string();
            if message.contains("403")
                || message.contains("404")
                || message.contains("Requested entity was not found")
            {
                XmasifyError::CredentialInvalid(ACCESS_DENIED_HINT.into())
            } else {
                XmasifyError::GenerationFailed(message)
            }
        }
    }
}

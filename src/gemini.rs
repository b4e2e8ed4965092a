//! Gemini (Google) client for the pet check and the Christmas edit.

use crate::error::{Result, XmasifyError};
use crate::image::SourceImage;
use crate::model::{GenerativeModel, InlineImage, ResponsePart};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Fast text model used for the pet-presence check.
const CHECK_MODEL: &str = "gemini-2.5-flash";

/// Image model used for the edit itself.
const EDIT_MODEL: &str = "gemini-3-pro-image-preview";

/// Output resolution tier requested from the image model.
const IMAGE_SIZE: &str = "1K";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Builder for [`GeminiClient`].
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                XmasifyError::Auth("GOOGLE_API_KEY not set and no API key provided".into())
            })?;

        Ok(GeminiClient {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

/// HTTP client for the Gemini generateContent API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    /// Creates a new `GeminiClientBuilder`.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GeminiRequest,
    ) -> Result<GeminiResponse> {
        let url = format!("{API_BASE}/{model}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(XmasifyError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn classify(&self, image: &SourceImage, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiRequestPart::Text {
                        text: prompt.to_string(),
                    },
                    GeminiRequestPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: image.format.mime_type().to_string(),
                            data: image.base64_data(),
                        },
                    },
                ],
            }],
            generation_config: Some(GeminiConfig {
                response_mime_type: Some("application/json".to_string()),
                image_config: None,
            }),
        };

        let response = self.generate_content(CHECK_MODEL, &body).await?;
        tracing::debug!(
            model = CHECK_MODEL,
            duration_ms = start.elapsed().as_millis() as u64,
            "classification request complete"
        );

        response
            .first_text()
            .ok_or_else(|| XmasifyError::GenerationFailed("No text in classification response".into()))
    }

    async fn edit(&self, image: &SourceImage, prompt: &str) -> Result<Vec<ResponsePart>> {
        let start = Instant::now();

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiRequestPart::Text {
                        text: prompt.to_string(),
                    },
                    GeminiRequestPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: image.format.mime_type().to_string(),
                            data: image.base64_data(),
                        },
                    },
                ],
            }],
            generation_config: Some(GeminiConfig {
                response_mime_type: None,
                image_config: Some(GeminiImageConfig {
                    image_size: IMAGE_SIZE.to_string(),
                }),
            }),
        };

        let response = self.generate_content(EDIT_MODEL, &body).await?;
        tracing::debug!(
            model = EDIT_MODEL,
            duration_ms = start.elapsed().as_millis() as u64,
            "edit request complete"
        );

        Ok(response.into_parts())
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text { text: String },
    InlineData { inline_data: GeminiInlineData },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<GeminiImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiImageConfig {
    image_size: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<GeminiInlineResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineResponse {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .find_map(|p| p.text)
    }

    fn into_parts(self) -> Vec<ResponsePart> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .map(|p| ResponsePart {
                text: p.text,
                inline_data: p.inline_data.map(|d| InlineImage {
                    mime_type: d.mime_type,
                    data: d.data,
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageFormat;

    #[test]
    fn test_builder_with_explicit_key() {
        let client = GeminiClientBuilder::new().api_key("test-key").build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiRequestPart::Text {
                    text: "hello".into(),
                }],
            }],
            generation_config: Some(GeminiConfig {
                response_mime_type: Some("application/json".into()),
                image_config: None,
            }),
        };
        let json = serde_json::to_value(&req).unwrap();

        assert!(json.get("generationConfig").is_some());
        assert!(json.get("generation_config").is_none());
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json["generationConfig"].get("imageConfig").is_none());
    }

    #[test]
    fn test_edit_config_serialization() {
        let config = GeminiConfig {
            response_mime_type: None,
            image_config: Some(GeminiImageConfig {
                image_size: IMAGE_SIZE.into(),
            }),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["imageConfig"]["imageSize"], "1K");
        assert!(json.get("responseMimeType").is_none());
    }

    #[test]
    fn test_inline_data_part_serialization() {
        let image = SourceImage::new(vec![1, 2, 3], ImageFormat::Jpeg);
        let part = GeminiRequestPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: image.format.mime_type().into(),
                data: image.base64_data(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inline_data"]["mimeType"], "image/jpeg");
        assert_eq!(json["inline_data"]["data"], "AQID");
    }

    #[test]
    fn test_response_first_text() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "{\"hasPet\": true}"}]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("{\"hasPet\": true}"));
    }

    #[test]
    fn test_response_into_parts_with_image() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your festive pet!"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let parts = resp.into_parts();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some("Here is your festive pet!"));
        let inline = parts[1].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
        assert_eq!(inline.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_response_without_candidates() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_parts().is_empty());
    }

    #[test]
    fn test_response_inline_data_without_mime_type() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"inlineData": {"data": "AQID"}}]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let parts = resp.into_parts();
        assert!(parts[0].inline_data.as_ref().unwrap().mime_type.is_none());
    }
}

//! `generateContent` wire types.
//!
//! Parts are a typed union; reading a reply means walking the first
//! candidate's parts in order, never probing arbitrary fields.

use serde::{Deserialize, Serialize};

use super::error::ServiceFailure;
use crate::media::MediaPart;
use crate::prompt::{ContentPart, RequestPayload, ResponseModality};

// ---------------------------------------------------------------------------
// Shared content types
// ---------------------------------------------------------------------------

/// Content container used in both requests and responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Untagged union of content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding: anything that
/// is neither text nor inline data lands in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        /// Set on reasoning parts, which are not part of the answer.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            thought: None,
        }
    }
}

/// Base64 inline payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl From<&MediaPart> for Blob {
    fn from(m: &MediaPart) -> Self {
        Self {
            mime_type: m.mime_type.clone(),
            data: m.data.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<ResponseModality>,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl From<&RequestPayload> for GenerateContentRequest {
    fn from(payload: &RequestPayload) -> Self {
        let parts = payload
            .content_parts()
            .iter()
            .map(|p| match p {
                ContentPart::Text(t) => Part::text(t.clone()),
                ContentPart::InlineData(m) => Part::InlineData {
                    inline_data: Blob::from(m),
                },
            })
            .collect();

        let system_instruction = payload.system_instruction().map(|s| Content {
            role: None,
            parts: vec![Part::text(s)],
        });

        let generation_config = (!payload.response_modalities().is_empty()).then(|| {
            GenerationConfig {
                response_modalities: payload.response_modalities().to_vec(),
            }
        });

        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts,
            }],
            system_instruction,
            generation_config,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Top-level `generateContent` response envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate.
    fn first_parts(&self) -> Result<&[Part], ServiceFailure> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(ServiceFailure::Blocked(reason.to_string()));
        }

        let candidate = self.candidates.first().ok_or(ServiceFailure::NoCandidates)?;
        match &candidate.content {
            Some(content) if !content.parts.is_empty() => Ok(&content.parts),
            _ => Err(ServiceFailure::NoContent(
                candidate
                    .finish_reason
                    .clone()
                    .unwrap_or_else(|| "unspecified".into()),
            )),
        }
    }

    /// Concatenated answer text (reasoning parts skipped).  Blank text is a
    /// failure, never an empty success.
    pub fn text(&self) -> Result<String, ServiceFailure> {
        let text: String = self
            .first_parts()?
            .iter()
            .filter_map(|p| match p {
                Part::Text { text, thought } if *thought != Some(true) => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if text.trim().is_empty() {
            return Err(ServiceFailure::EmptyText);
        }
        Ok(text)
    }

    /// First part carrying non-empty inline data, scanning in order.
    pub fn first_inline_data(&self) -> Result<&Blob, ServiceFailure> {
        self.first_parts()?
            .iter()
            .find_map(|p| match p {
                Part::InlineData { inline_data } if !inline_data.data.is_empty() => {
                    Some(inline_data)
                }
                _ => None,
            })
            .ok_or(ServiceFailure::NoImagePart)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).expect("valid response json")
    }

    #[test]
    fn request_serialises_in_camel_case() {
        let payload = RequestPayload::new(
            "gemini-2.5-flash-image",
            Some("policy".into()),
            vec![
                ContentPart::Text("expand".into()),
                ContentPart::InlineData(MediaPart::new("AAAA", "image/png")),
            ],
            vec![ResponseModality::Image],
        )
        .unwrap();

        let value = serde_json::to_value(GenerateContentRequest::from(&payload)).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "expand" },
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
                    ]
                }],
                "systemInstruction": { "parts": [{ "text": "policy" }] },
                "generationConfig": { "responseModalities": ["IMAGE"] }
            })
        );
    }

    #[test]
    fn text_request_omits_optional_sections() {
        let payload =
            RequestPayload::new("m", None, vec![ContentPart::Text("hi".into())], vec![]).unwrap();
        let value = serde_json::to_value(GenerateContentRequest::from(&payload)).unwrap();
        assert!(value.get("systemInstruction").is_none());
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn text_joins_parts_and_skips_thoughts() {
        let r = response(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "سڵاو " },
                    { "text": "جیهان" }
                ]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(r.text().unwrap(), "سڵاو جیهان");
    }

    #[test]
    fn blank_text_is_a_failure() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }));
        assert_eq!(r.text(), Err(ServiceFailure::EmptyText));
    }

    #[test]
    fn image_scan_skips_leading_text() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is your image" },
                { "inlineData": { "mimeType": "image/png", "data": "SECOND" } },
                { "inlineData": { "mimeType": "image/png", "data": "THIRD" } }
            ]}}]
        }));
        assert_eq!(r.first_inline_data().unwrap().data, "SECOND");
    }

    #[test]
    fn no_inline_data_is_a_failure() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "sorry" }] } }]
        }));
        assert_eq!(r.first_inline_data(), Err(ServiceFailure::NoImagePart));
    }

    #[test]
    fn unknown_parts_are_tolerated() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [
                { "functionCall": { "name": "x" } },
                { "text": "ok" }
            ]}}]
        }));
        assert_eq!(r.text().unwrap(), "ok");
    }

    #[test]
    fn blocked_prompt_and_missing_candidates() {
        let blocked = response(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert_eq!(blocked.text(), Err(ServiceFailure::Blocked("SAFETY".into())));

        let empty = response(json!({}));
        assert_eq!(empty.text(), Err(ServiceFailure::NoCandidates));

        let no_content = response(json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] }));
        assert_eq!(
            no_content.first_inline_data(),
            Err(ServiceFailure::NoContent("MAX_TOKENS".into()))
        );
    }

    #[test]
    fn api_error_envelope_parses() {
        let env: ApiErrorEnvelope = serde_json::from_value(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        }))
        .unwrap();
        assert_eq!(env.error.code, Some(400));
        assert_eq!(env.error.message, "API key not valid");
        assert_eq!(env.error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}

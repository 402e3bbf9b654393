//! Gemini `generateContent` client producing schema-constrained verdicts.

use medcheck_core::Verdict;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::response::GenerateContentResponse;
use crate::{AnalysisError, ClaimAnalyzer, ImageAttachment};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the provider's `generateContent` endpoint.
///
/// Every call re-queries the provider: no caching, no retry, no local
/// timeout. Failure semantics are a single error the caller surfaces as one
/// retryable notice.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), api_key)
    }

    /// Create a client against a non-default endpoint.
    ///
    /// `base_url` should be like `https://host` (no trailing slash).
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn request_verdict(
        &self,
        claim_text: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<Verdict, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = build_request(claim_text, image);

        info!(model = %self.model, has_image = image.is_some(), "requesting claim analysis");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let raw: GenerateContentResponse = resp.json().await?;
        let verdict = raw.into_verdict(claim_text)?;
        info!(
            status = %verdict.status,
            confidence = verdict.confidence_score,
            sources = verdict.sources.len(),
            "claim analysis complete"
        );
        Ok(verdict)
    }
}

#[async_trait::async_trait]
impl ClaimAnalyzer for GeminiClient {
    async fn analyze(
        &self,
        claim_text: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<Verdict, AnalysisError> {
        self.request_verdict(claim_text, image).await
    }
}

// ── Request body ──

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    tools: Vec<Value>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

fn build_prompt(claim_text: &str) -> String {
    format!(
        "Analyze the following medical claim: \"{claim_text}\"\n\
         \n\
         Roles:\n\
         1. Verify if the claim is scientifically accurate.\n\
         2. Extract and define complex medical terminology mentioned.\n\
         3. Provide a confidence score (0-100).\n\
         4. List 2-3 related medical ingredients or claims that could educate the user further.\n\
         5. Count supporting studies found via search.\n\
         \n\
         Rules for terminology: wrap complex terms in the summary like this: [Term: Definition].\n\
         \n\
         Return the response strictly in the required JSON format."
    )
}

fn build_request(claim_text: &str, image: Option<&ImageAttachment>) -> GenerateContentRequest {
    let mut parts = vec![Part {
        text: Some(build_prompt(claim_text)),
        inline_data: None,
    }];
    if let Some(image) = image {
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.media_type().to_string(),
                data: image.data().to_string(),
            }),
        });
    }
    GenerateContentRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
        tools: vec![json!({ "googleSearch": {} })],
    }
}

/// Output schema declared to the provider, constraining it to machine-parseable
/// structured output rather than free text.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "status": {
                "type": "STRING",
                "description": "One of: TRUE, FALSE, PARTIAL, MISLEADING, UNVERIFIED"
            },
            "summary": {
                "type": "STRING",
                "description": "Detailed scientific explanation with [Term: Definition] tags."
            },
            "confidenceScore": { "type": "NUMBER" },
            "evidenceCount": { "type": "NUMBER" },
            "sources": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "url": { "type": "STRING" }
                    }
                }
            },
            "definitions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "term": { "type": "STRING" },
                        "explanation": { "type": "STRING" }
                    }
                }
            },
            "relatedClaims": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": [
            "status", "summary", "confidenceScore", "evidenceCount",
            "sources", "definitions", "relatedClaims"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = GeminiClient::with_base_url("http://localhost:9090/".into(), "key".into());
        assert_eq!(client.base_url, "http://localhost:9090");
    }

    #[test]
    fn request_embeds_claim_and_search_tool() {
        let request = build_request("Vitamin C cures colds", None);
        let value = serde_json::to_value(&request).unwrap();

        let text = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Vitamin C cures colds"));
        assert!(text.contains("[Term: Definition]"));

        assert!(value["tools"][0]["googleSearch"].is_object());
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn request_attaches_image_with_media_type() {
        let image = ImageAttachment::from_user_input("data:image/png;base64,iVBORw0KGgo=");
        let request = build_request("", Some(&image));
        let value = serde_json::to_value(&request).unwrap();

        let inline = &value["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(inline["mimeType"], "image/png");
        assert_eq!(inline["data"], "iVBORw0KGgo=");
        // Text part carries no inline payload and vice versa.
        assert!(value["contents"][0]["parts"][0].get("inlineData").is_none());
        assert!(value["contents"][0]["parts"][1].get("text").is_none());
    }

    #[test]
    fn schema_requires_all_verdict_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "status",
            "summary",
            "confidenceScore",
            "evidenceCount",
            "sources",
            "definitions",
            "relatedClaims",
        ] {
            assert!(required.contains(&field), "missing required field {field}");
        }
        assert_eq!(schema["type"], "OBJECT");
    }
}

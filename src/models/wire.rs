//! Request and response bodies of the external services.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct EnhanceRequest {
    pub contents: Vec<EnhanceContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: EnhanceGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhanceContent {
    pub parts: Vec<EnhancePart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhancePart {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceGenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for EnhanceGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EnhanceResponse {
    #[serde(default)]
    pub candidates: Vec<EnhanceCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceCandidate {
    pub content: Option<EnhanceContent>,
}

impl EnhanceResponse {
    /// `candidates[0].content.parts[0].text`, trimmed, if non-empty.
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(String::from)
    }
}

#[derive(Debug, Deserialize)]
pub struct FormImageResponse {
    pub output_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StabilityRequest {
    pub text_prompts: Vec<StabilityPrompt>,
    pub cfg_scale: f32,
    pub height: u32,
    pub width: u32,
    pub samples: u32,
    pub steps: u32,
    pub seed: u32,
}

#[derive(Debug, Serialize)]
pub struct StabilityPrompt {
    pub text: String,
    pub weight: f32,
}

#[derive(Debug, Deserialize)]
pub struct StabilityResponse {
    #[serde(default)]
    pub artifacts: Vec<StabilityArtifact>,
}

#[derive(Debug, Deserialize)]
pub struct StabilityArtifact {
    pub base64: Option<String>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enhance_request_matches_wire_shape() {
        let body = EnhanceRequest {
            contents: vec![EnhanceContent {
                parts: vec![EnhancePart {
                    text: Some("hi".into()),
                }],
            }],
            generation_config: EnhanceGenerationConfig::default(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(value["generationConfig"]["topK"], 40);
    }

    #[test]
    fn first_text_skips_blank_and_missing() {
        let parsed: EnhanceResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  a lush forest  "}]}}]
        }))
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("a lush forest"));

        let blank: EnhanceResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": [{"text": " "}]}}]}))
                .unwrap();
        assert_eq!(blank.first_text(), None);

        let empty: EnhanceResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}

//! OpenAI provider clients: chat completions and image generation.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{
    ChatMessage, GenerateRequest, GenerateResponse, GeneratedImage, ImageModel, LanguageModel,
    StopReason, TokenUsage,
};

/// Client for the OpenAI API.
///
/// Holds one HTTP client; model handles obtained from [`model`] and
/// [`image_model`] share its connection pool.
///
/// [`model`]: OpenAiClient::model
/// [`image_model`]: OpenAiClient::image_model
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different OpenAI-compatible endpoint root.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Bind an API identifier to an invokable chat-model handle.
    pub fn model(&self, api_identifier: &str) -> OpenAiModel {
        OpenAiModel {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: api_identifier.to_string(),
        }
    }

    /// Bind an API identifier to an invokable image-model handle.
    pub fn image_model(&self, api_identifier: &str) -> OpenAiImageModel {
        OpenAiImageModel {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: api_identifier.to_string(),
        }
    }
}

/// A chat model served over the OpenAI chat completions API.
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiModel {
    fn to_wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|msg| WireMessage {
                role: msg.role.to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }

    fn from_wire_response(response: ChatCompletionResponse) -> Result<GenerateResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenAI response had no choices"))?;

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("stop") => StopReason::EndTurn,
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::Unknown,
        };

        let usage = response.usage.map_or(TokenUsage::default(), |u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(GenerateResponse {
            text: choice.message.content.unwrap_or_default(),
            stop_reason,
            usage,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: Self::to_wire_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            model = %self.model,
            messages = body.messages.len(),
            "openai chat request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "OpenAI API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        Self::from_wire_response(api_response)
    }
}

/// An image model served over the OpenAI images API.
pub struct OpenAiImageModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for OpenAiImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiImageModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl ImageModel for OpenAiImageModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let url = format!("{}/images/generations", self.base_url);
        let body = ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
        };

        debug!(model = %self.model, "openai image request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to OpenAI images API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "OpenAI images API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let api_response: ImageGenerationResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI images API response")?;

        let image = api_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenAI images response had no data"))?;

        let url = image
            .url
            .ok_or_else(|| anyhow!("OpenAI images response had no URL"))?;

        Ok(GeneratedImage { url })
    }
}

// ── OpenAI wire types ──

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages_keep_roles_and_order() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi"),
        ];
        let wire = OpenAiModel::to_wire_messages(&messages);
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[2].role, "assistant");
        assert_eq!(wire[1].content, "hello");
    }

    #[test]
    fn test_request_omits_unset_options() {
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: OpenAiModel::to_wire_messages(&[ChatMessage::user("hi")]),
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o-mini\""));
        assert!(!json.contains("temperature"));
        assert!(!json.contains("max_tokens"));
    }

    #[test]
    fn test_response_parse_and_mapping() {
        let json = r#"{
            "choices": [
                {
                    "message": {"role": "assistant", "content": "Hello!"},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let response = OpenAiModel::from_wire_response(parsed).unwrap();
        assert_eq!(response.text, "Hello!");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 9);
        assert_eq!(response.usage.output_tokens, 3);
    }

    #[test]
    fn test_length_maps_to_max_tokens() {
        let parsed = ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: ChoiceMessage {
                    content: Some("truncated".to_string()),
                },
                finish_reason: Some("length".to_string()),
            }],
            usage: None,
        };
        let response = OpenAiModel::from_wire_response(parsed).unwrap();
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let parsed = ChatCompletionResponse {
            choices: vec![],
            usage: None,
        };
        assert!(OpenAiModel::from_wire_response(parsed).is_err());
    }

    #[test]
    fn test_image_response_parse() {
        let json = r#"{"data": [{"url": "https://img.example/1.png"}]}"#;
        let parsed: ImageGenerationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.data[0].url.as_deref(),
            Some("https://img.example/1.png")
        );
    }

    #[test]
    fn test_model_handle_reports_identity() {
        let client = OpenAiClient::new("sk-secret".to_string());
        let model = client.model("gpt-4o");
        assert_eq!(model.provider_name(), "openai");
        assert_eq!(model.model_id(), "gpt-4o");
    }

    #[test]
    fn test_debug_never_contains_key() {
        let client = OpenAiClient::new("sk-secret".to_string());
        assert!(!format!("{:?}", client).contains("sk-secret"));
        assert!(!format!("{:?}", client.model("gpt-4o")).contains("sk-secret"));
        assert!(!format!("{:?}", client.image_model("dall-e-3")).contains("sk-secret"));
    }
}

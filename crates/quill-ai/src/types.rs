//! Provider-agnostic chat types and the model handle traits.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// A generation request, independent of any provider wire format.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Unknown,
}

impl StopReason {
    /// Whether the model finished its turn.
    pub fn is_end_turn(&self) -> bool {
        matches!(self, Self::EndTurn)
    }
}

/// Token usage from a single invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A generation result.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

/// An invokable text-model handle.
///
/// Constructing a handle never performs I/O; the network is only touched
/// when [`generate`] is called. Concurrency, cancellation, and timeouts are
/// whatever the underlying provider client defines.
///
/// [`generate`]: LanguageModel::generate
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider family name (e.g. "openai", "bedrock").
    fn provider_name(&self) -> &str;

    /// The API identifier forwarded to the provider.
    fn model_id(&self) -> &str;

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

/// A generated image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
}

/// An invokable image-model handle.
#[async_trait]
pub trait ImageModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_display() {
        assert_eq!(ChatRole::System.to_string(), "system");
        assert_eq!(ChatRole::User.to_string(), "user");
        assert_eq!(ChatRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_chat_message_serde() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"hello\""));

        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, ChatRole::User);
        assert_eq!(back.content, "hello");
    }

    #[test]
    fn test_stop_reason_predicate() {
        assert!(StopReason::EndTurn.is_end_turn());
        assert!(!StopReason::MaxTokens.is_end_turn());
        assert!(!StopReason::Unknown.is_end_turn());
    }

    #[test]
    fn test_token_usage_default() {
        let usage = TokenUsage::default();
        assert_eq!(usage.input_tokens, 0);
        assert_eq!(usage.output_tokens, 0);
    }
}

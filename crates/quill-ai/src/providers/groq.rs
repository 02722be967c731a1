//! Groq provider client.
//!
//! Groq serves the OpenAI wire format; this wraps the OpenAI client with the
//! Groq endpoint root and provider name.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use quill_config::AppConfig;

use super::openai::{OpenAiClient, OpenAiModel};
use crate::types::{GenerateRequest, GenerateResponse, LanguageModel};

/// Client for the Groq API.
#[derive(Clone)]
pub struct GroqClient {
    inner: OpenAiClient,
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient").field("inner", &self.inner).finish()
    }
}

impl GroqClient {
    pub const BASE_URL: &'static str = "https://api.groq.com/openai/v1";

    pub fn new(api_key: String) -> Self {
        Self {
            inner: OpenAiClient::with_base_url(api_key, Self::BASE_URL.to_string()),
        }
    }

    /// Build from validated configuration, if a Groq key was provided.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config.server.groq_api_key.clone().map(Self::new)
    }

    /// Bind an API identifier to an invokable chat-model handle.
    pub fn model(&self, api_identifier: &str) -> GroqModel {
        GroqModel {
            inner: self.inner.model(api_identifier),
        }
    }
}

/// A chat model served by Groq.
#[derive(Debug)]
pub struct GroqModel {
    inner: OpenAiModel,
}

#[async_trait]
impl LanguageModel for GroqModel {
    fn provider_name(&self) -> &str {
        "groq"
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.inner.generate(request).await
    }
}

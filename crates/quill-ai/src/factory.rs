//! Binds symbolic model identifiers to invokable, middleware-wrapped
//! provider handles.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use quill_config::AppConfig;

use crate::error::ModelError;
use crate::middleware::{
    LanguageModelMiddleware, WrappedModel, default_middleware, wrap_language_model,
};
use crate::models::{ModelProvider, find_model_by_id};
use crate::providers::{BedrockClient, OpenAiClient, OpenAiImageModel};
use crate::types::LanguageModel;

/// The fixed model behind [`ModelFactory::image_model`].
const IMAGE_MODEL_API_IDENTIFIER: &str = "dall-e-3";

/// Resolves registry identifiers to provider-backed model handles.
///
/// Constructed once at process entry and passed by reference to whatever
/// needs models; it holds one client per provider family.
pub struct ModelFactory {
    openai: OpenAiClient,
    bedrock: BedrockClient,
    middleware: Vec<Arc<dyn LanguageModelMiddleware>>,
}

impl fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelFactory")
            .field("openai", &self.openai)
            .field("bedrock", &self.bedrock)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl ModelFactory {
    pub fn new(openai: OpenAiClient, bedrock: BedrockClient) -> Self {
        Self {
            openai,
            bedrock,
            middleware: default_middleware(),
        }
    }

    /// Build the factory from validated configuration.
    pub async fn from_config(config: &AppConfig) -> Self {
        Self::new(
            OpenAiClient::new(config.server.openai_api_key.clone()),
            BedrockClient::new().await,
        )
    }

    /// Replace the middleware chain applied to every produced handle.
    pub fn with_middleware(mut self, middleware: Vec<Arc<dyn LanguageModelMiddleware>>) -> Self {
        self.middleware = middleware;
        self
    }

    pub fn openai(&self) -> &OpenAiClient {
        &self.openai
    }

    pub fn bedrock(&self) -> &BedrockClient {
        &self.bedrock
    }

    /// Resolve a symbolic model identifier to an invokable handle.
    ///
    /// An identifier outside the registry fails here, before any provider is
    /// touched. A known identifier picks its provider family by tag, binds
    /// the descriptor's API identifier, and wraps the handle with the fixed
    /// middleware chain. No network I/O occurs until the handle is invoked.
    pub fn custom_model(&self, model_id: &str) -> Result<WrappedModel, ModelError> {
        let descriptor = find_model_by_id(model_id)
            .ok_or_else(|| ModelError::UnsupportedModel(model_id.to_string()))?;

        let handle: Box<dyn LanguageModel> = match descriptor.provider() {
            ModelProvider::OpenAi => Box::new(self.openai.model(descriptor.api_identifier)),
            ModelProvider::Bedrock => Box::new(self.bedrock.model(descriptor.api_identifier)),
        };

        debug!(
            model = model_id,
            provider = %descriptor.provider(),
            "resolved model"
        );

        Ok(wrap_language_model(handle, self.middleware.clone()))
    }

    /// The image-generation handle: fixed provider and model, independent of
    /// the text-model dispatch.
    pub fn image_model(&self) -> OpenAiImageModel {
        self.openai.image_model(IMAGE_MODEL_API_IDENTIFIER)
    }
}

//! quill-ai: model registry and provider clients for the quill assistant.
//!
//! This crate maps symbolic model identifiers to provider-backed model
//! handles:
//!
//! - [`models`] is the static registry of offered models with lookup and
//!   validation helpers.
//! - [`providers`] holds one client per provider family (OpenAI, Bedrock,
//!   Groq); handles are cheap bindings of an API identifier to a shared
//!   client.
//! - [`middleware`] wraps handles with cross-cutting behavior without
//!   changing their invocation contract.
//! - [`factory`] ties the three together: [`ModelFactory::custom_model`]
//!   resolves an identifier and returns a wrapped, invokable handle.
//!
//! Nothing here performs network I/O until a returned handle is invoked.

pub mod error;
pub mod factory;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod types;

pub use error::ModelError;
pub use factory::ModelFactory;
pub use middleware::{
    LanguageModelMiddleware, RequestLogMiddleware, WrappedModel, wrap_language_model,
};
pub use models::{
    DEFAULT_MODEL_ID, MODELS, ModelDescriptor, ModelId, ModelProvider, find_model_by_id,
    get_model_by_id, is_valid_model_id,
};
pub use providers::{BedrockClient, GroqClient, OpenAiClient};
pub use types::{
    ChatMessage, ChatRole, GenerateRequest, GenerateResponse, GeneratedImage, ImageModel,
    LanguageModel, StopReason, TokenUsage,
};

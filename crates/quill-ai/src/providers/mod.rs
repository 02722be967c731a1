//! Provider client implementations.

pub mod bedrock;
pub mod groq;
pub mod openai;

pub use bedrock::{BedrockClient, BedrockModel};
pub use groq::{GroqClient, GroqModel};
pub use openai::{OpenAiClient, OpenAiImageModel, OpenAiModel};

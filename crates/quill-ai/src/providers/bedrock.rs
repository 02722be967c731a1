//! Amazon Bedrock provider client.
//!
//! One regional client is constructed for the whole provider family; every
//! Bedrock model handle shares it and differs only in the model id forwarded
//! to the Converse API. SigV4 signing and transport come from the AWS SDK
//! credential chain, not from API keys.

use std::fmt;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, StopReason as ConverseStopReason,
    SystemContentBlock,
};
use tracing::debug;

use crate::types::{
    ChatRole, GenerateRequest, GenerateResponse, LanguageModel, StopReason, TokenUsage,
};

/// Client for the Bedrock runtime, pinned to one region.
#[derive(Clone)]
pub struct BedrockClient {
    client: Client,
}

impl fmt::Debug for BedrockClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockClient")
            .field("region", &self.region())
            .finish()
    }
}

impl BedrockClient {
    /// All Bedrock models are invoked through `us.`-prefixed inference
    /// profiles, which are served out of this region.
    pub const REGION: &'static str = "us-east-1";

    /// Assemble the shared client from the default AWS credential chain.
    ///
    /// No network I/O happens here; credentials are resolved on first use.
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(Self::REGION))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }

    /// The region the client is configured for.
    pub fn region(&self) -> Option<String> {
        self.client.config().region().map(|r| r.to_string())
    }

    /// Bind an API identifier to an invokable chat-model handle sharing this
    /// client.
    pub fn model(&self, api_identifier: &str) -> BedrockModel {
        BedrockModel {
            client: self.client.clone(),
            model: api_identifier.to_string(),
        }
    }
}

/// A chat model served over the Bedrock Converse API.
pub struct BedrockModel {
    client: Client,
    model: String,
}

impl fmt::Debug for BedrockModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockModel")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl LanguageModel for BedrockModel {
    fn provider_name(&self) -> &str {
        "bedrock"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let mut converse = self.client.converse().model_id(&self.model);

        for message in &request.messages {
            match message.role {
                // Converse takes system text out-of-band of the turn list
                ChatRole::System => {
                    converse = converse.system(SystemContentBlock::Text(message.content.clone()));
                }
                ChatRole::User | ChatRole::Assistant => {
                    let role = if message.role == ChatRole::User {
                        ConversationRole::User
                    } else {
                        ConversationRole::Assistant
                    };
                    let turn = Message::builder()
                        .role(role)
                        .content(ContentBlock::Text(message.content.clone()))
                        .build()
                        .context("Failed to build Bedrock message")?;
                    converse = converse.messages(turn);
                }
            }
        }

        if request.temperature.is_some() || request.max_tokens.is_some() {
            let mut inference = InferenceConfiguration::builder();
            if let Some(temperature) = request.temperature {
                inference = inference.temperature(temperature);
            }
            if let Some(max_tokens) = request.max_tokens {
                inference = inference.max_tokens(max_tokens as i32);
            }
            converse = converse.inference_config(inference.build());
        }

        debug!(model = %self.model, "bedrock converse request");

        let output = converse
            .send()
            .await
            .context("Bedrock Converse request failed")?;

        let message = output
            .output()
            .ok_or_else(|| anyhow!("Bedrock response had no output"))?
            .as_message()
            .map_err(|_| anyhow!("Bedrock response did not contain a message"))?
            .clone();

        let text = message
            .content()
            .iter()
            .filter_map(|block| block.as_text().ok())
            .cloned()
            .collect::<Vec<_>>()
            .join("");

        let stop_reason = match output.stop_reason() {
            ConverseStopReason::EndTurn | ConverseStopReason::StopSequence => StopReason::EndTurn,
            ConverseStopReason::MaxTokens => StopReason::MaxTokens,
            _ => StopReason::Unknown,
        };

        let usage = output.usage().map_or(TokenUsage::default(), |u| TokenUsage {
            input_tokens: u.input_tokens().max(0) as u32,
            output_tokens: u.output_tokens().max(0) as u32,
        });

        Ok(GenerateResponse {
            text,
            stop_reason,
            usage,
        })
    }
}

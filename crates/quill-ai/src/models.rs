//! The model registry: the closed set of chat models the assistant offers.
//!
//! Identifiers double as routing keys and a human-meaningful namespace:
//! OpenAI ids start with `gpt-`, Bedrock ids with the `us.` cross-region
//! inference-profile prefix. The id-to-provider coupling lives in
//! [`ModelId::provider`], so it is fixed when an id is added to the enum
//! rather than checked at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Provider family a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenAi,
    Bedrock,
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelProvider::OpenAi => write!(f, "openai"),
            ModelProvider::Bedrock => write!(f, "bedrock"),
        }
    }
}

/// The closed set of registry identifiers.
///
/// Adding a model means adding a variant here; the compiler then forces a
/// dispatch arm in every match over [`ModelId::provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    Gpt4oMini,
    Gpt4o,
    Claude35Haiku,
    Claude35Sonnet,
    NovaPro,
}

impl ModelId {
    /// Every identifier, in display order.
    pub const ALL: [ModelId; 5] = [
        ModelId::Gpt4oMini,
        ModelId::Gpt4o,
        ModelId::Claude35Haiku,
        ModelId::Claude35Sonnet,
        ModelId::NovaPro,
    ];

    /// The symbolic identifier string.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Gpt4oMini => "gpt-4o-mini",
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Claude35Haiku => "us.anthropic.claude-3-5-haiku-20241022-v1:0",
            ModelId::Claude35Sonnet => "us.anthropic.claude-3-5-sonnet-20241022-v2:0",
            ModelId::NovaPro => "us.amazon.nova-pro-v1:0",
        }
    }

    /// Non-throwing lookup of an identifier string.
    pub fn parse(id: &str) -> Option<ModelId> {
        Self::ALL.iter().copied().find(|model| model.as_str() == id)
    }

    /// The provider family this identifier routes to.
    pub fn provider(self) -> ModelProvider {
        match self {
            ModelId::Gpt4oMini | ModelId::Gpt4o => ModelProvider::OpenAi,
            ModelId::Claude35Haiku | ModelId::Claude35Sonnet | ModelId::NovaPro => {
                ModelProvider::Bedrock
            }
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for one registry model.
#[derive(Debug, Clone, Copy)]
pub struct ModelDescriptor {
    pub id: ModelId,
    pub label: &'static str,
    /// The string forwarded to the provider API at invocation time.
    pub api_identifier: &'static str,
    pub description: &'static str,
}

impl ModelDescriptor {
    pub fn provider(&self) -> ModelProvider {
        self.id.provider()
    }

    pub fn is_openai(&self) -> bool {
        self.provider() == ModelProvider::OpenAi
    }

    pub fn is_bedrock(&self) -> bool {
        self.provider() == ModelProvider::Bedrock
    }
}

/// The registry. Order is preserved for display; it carries no routing
/// meaning.
pub const MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: ModelId::Gpt4oMini,
        label: "GPT 4o mini",
        api_identifier: "gpt-4o-mini",
        description: "Small model for fast, lightweight tasks",
    },
    ModelDescriptor {
        id: ModelId::Gpt4o,
        label: "GPT 4o",
        api_identifier: "gpt-4o",
        description: "For complex, multi-step tasks",
    },
    ModelDescriptor {
        id: ModelId::Claude35Haiku,
        label: "Claude 3.5 haiku",
        api_identifier: "us.anthropic.claude-3-5-haiku-20241022-v1:0",
        description: "For needs for speeds",
    },
    ModelDescriptor {
        id: ModelId::Claude35Sonnet,
        label: "Claude 3.5 sonnet",
        api_identifier: "us.anthropic.claude-3-5-sonnet-20241022-v2:0",
        description: "For outsmarting humans",
    },
    ModelDescriptor {
        id: ModelId::NovaPro,
        label: "Amazon Nova Pro",
        api_identifier: "us.amazon.nova-pro-v1:0",
        description: "For outsmarting select humans",
    },
];

/// The model used when the caller expresses no preference. Membership in the
/// registry is by construction.
pub const DEFAULT_MODEL_ID: ModelId = ModelId::Claude35Haiku;

/// Find a descriptor by identifier string. Returns `None` on a miss.
pub fn find_model_by_id(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|model| model.id.as_str() == id)
}

/// Whether the identifier string is a registry member.
pub fn is_valid_model_id(id: &str) -> bool {
    ModelId::parse(id).is_some()
}

/// Find a descriptor by identifier string, failing on a miss.
///
/// The only registry operation that signals failure; callers wanting a
/// non-throwing lookup use [`find_model_by_id`].
pub fn get_model_by_id(id: &str) -> Result<&'static ModelDescriptor, ModelError> {
    find_model_by_id(id).ok_or_else(|| ModelError::InvalidModelId(id.to_string()))
}

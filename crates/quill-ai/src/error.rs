//! Model lookup and dispatch errors.

use thiserror::Error;

/// Errors from registry lookup and provider dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The identifier is not in the model registry.
    #[error("invalid model ID: {0}")]
    InvalidModelId(String),
    /// No provider client is registered for the identifier.
    #[error("unsupported model '{0}': no provider client is registered for this identifier")]
    UnsupportedModel(String),
}

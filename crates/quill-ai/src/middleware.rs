//! Cross-cutting wrapping for model handles.
//!
//! [`wrap_language_model`] decorates a raw provider handle with a middleware
//! chain. The result implements [`LanguageModel`] itself, so callers cannot
//! tell a wrapped handle from an unwrapped one.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::types::{GenerateRequest, GenerateResponse, LanguageModel};

/// Hooks applied around every invocation of a wrapped model.
///
/// Both hooks default to no-ops; implementors override what they need.
pub trait LanguageModelMiddleware: Send + Sync {
    /// Reshape the request before it reaches the underlying model.
    fn transform_request(&self, request: GenerateRequest) -> GenerateRequest {
        request
    }

    /// Observe the response after the underlying model returns.
    fn on_response(&self, model_id: &str, response: &GenerateResponse) {
        let _ = (model_id, response);
    }
}

/// A model handle augmented with a middleware chain.
pub struct WrappedModel {
    inner: Box<dyn LanguageModel>,
    middleware: Vec<Arc<dyn LanguageModelMiddleware>>,
}

impl fmt::Debug for WrappedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedModel")
            .field("model", &self.inner.model_id())
            .field("provider", &self.inner.provider_name())
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// Wrap a raw model handle with a middleware chain, applied in order.
///
/// Wrapping performs no I/O; the chain runs on each [`generate`] call.
///
/// [`generate`]: LanguageModel::generate
pub fn wrap_language_model(
    model: Box<dyn LanguageModel>,
    middleware: Vec<Arc<dyn LanguageModelMiddleware>>,
) -> WrappedModel {
    WrappedModel {
        inner: model,
        middleware,
    }
}

#[async_trait]
impl LanguageModel for WrappedModel {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let mut request = request;
        for middleware in &self.middleware {
            request = middleware.transform_request(request);
        }

        let response = self.inner.generate(request).await?;

        for middleware in &self.middleware {
            middleware.on_response(self.inner.model_id(), &response);
        }

        Ok(response)
    }
}

/// Logs every invocation via `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogMiddleware;

impl LanguageModelMiddleware for RequestLogMiddleware {
    fn transform_request(&self, request: GenerateRequest) -> GenerateRequest {
        debug!(
            messages = request.messages.len(),
            "dispatching model request"
        );
        request
    }

    fn on_response(&self, model_id: &str, response: &GenerateResponse) {
        debug!(
            model = model_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model responded"
        );
    }
}

/// The fixed chain applied to every handle the factory produces.
pub fn default_middleware() -> Vec<Arc<dyn LanguageModelMiddleware>> {
    vec![Arc::new(RequestLogMiddleware)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, StopReason, TokenUsage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock handle that echoes the request back.
    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        fn provider_name(&self) -> &str {
            "mock"
        }

        fn model_id(&self) -> &str {
            "echo-1"
        }

        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
            let text = request
                .messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("|");
            Ok(GenerateResponse {
                text,
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: request.messages.len() as u32,
                    output_tokens: 1,
                },
            })
        }
    }

    /// Middleware that prepends a system message and counts responses.
    struct PrefixMiddleware {
        responses: AtomicUsize,
    }

    impl LanguageModelMiddleware for PrefixMiddleware {
        fn transform_request(&self, mut request: GenerateRequest) -> GenerateRequest {
            request.messages.insert(0, ChatMessage::system("injected"));
            request
        }

        fn on_response(&self, _model_id: &str, _response: &GenerateResponse) {
            self.responses.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_wrapped_handle_presents_inner_contract() {
        let wrapped = wrap_language_model(Box::new(EchoModel), default_middleware());
        assert_eq!(wrapped.provider_name(), "mock");
        assert_eq!(wrapped.model_id(), "echo-1");

        let request = GenerateRequest {
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        };
        let response = wrapped.generate(request).await.unwrap();
        assert_eq!(response.text, "hi");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_middleware_shapes_request_and_sees_response() {
        let middleware = Arc::new(PrefixMiddleware {
            responses: AtomicUsize::new(0),
        });
        let chain: Vec<Arc<dyn LanguageModelMiddleware>> = vec![middleware.clone()];
        let wrapped = wrap_language_model(Box::new(EchoModel), chain);

        let request = GenerateRequest {
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        };
        let response = wrapped.generate(request).await.unwrap();
        assert_eq!(response.text, "injected|hi");
        assert_eq!(middleware.responses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_is_transparent() {
        let wrapped = wrap_language_model(Box::new(EchoModel), Vec::new());
        let request = GenerateRequest {
            messages: vec![ChatMessage::user("a"), ChatMessage::assistant("b")],
            ..Default::default()
        };
        let response = wrapped.generate(request).await.unwrap();
        assert_eq!(response.text, "a|b");
        assert_eq!(response.usage.input_tokens, 2);
    }
}

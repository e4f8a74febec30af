//! Provider trait: the abstraction over upstream LLM APIs.
//!
//! A Provider knows how to send a short conversation (system prompt plus
//! the user's question) to an LLM and get the answer back. Exactly one
//! attempt is made per call; failures come back as [`ProviderError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "deepseek-chat", "qwen-turbo")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

impl ProviderRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// `choices[0].message.content` of the upstream reply
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The assistant calls `complete()` without knowing which upstream is
/// behind it, which also lets tests substitute scripted providers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A short name for this provider (e.g., "deepseek", "qwen").
    fn name(&self) -> &str;

    /// The chat-completions endpoint this provider posts to.
    fn endpoint(&self) -> String;

    /// Whether credentials are present. An unconfigured provider must
    /// answer `complete()` with [`ProviderError::NotConfigured`] without
    /// touching the network.
    fn is_configured(&self) -> bool;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_request_defaults() {
        let req = ProviderRequest::new("deepseek-chat", vec![Message::user("hi")]);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 500);
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn provider_request_deserialize_fills_defaults() {
        let req: ProviderRequest =
            serde_json::from_str(r#"{"model":"qwen-turbo","messages":[]}"#).unwrap();
        assert_eq!(req.model, "qwen-turbo");
        assert_eq!(req.max_tokens, 500);
    }
}

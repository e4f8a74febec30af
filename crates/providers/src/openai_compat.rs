//! OpenAI-compatible provider implementation.
//!
//! Both upstreams (Deepseek and Qwen's DashScope compatible mode) expose
//! an OpenAI-style `/chat/completions` endpoint, so one client serves both.
//!
//! One attempt per call, bounded by the client timeout. Every failure is
//! classified into a [`ProviderError`] variant for the caller to render.

use async_trait::async_trait;
use lugang_core::error::ProviderError;
use lugang_core::message::Message;
use lugang_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Upstream timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    ///
    /// An empty `api_key` yields an unconfigured provider that never
    /// makes network calls.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: build_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Create a Deepseek provider (convenience constructor).
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new("deepseek", "https://api.deepseek.com/v1", api_key)
    }

    /// Create a Qwen (DashScope compatible mode) provider.
    pub fn qwen(api_key: impl Into<String>) -> Self {
        Self::new(
            "qwen",
            "https://dashscope.aliyuncs.com/compatible-mode/v1",
            api_key,
        )
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().into(),
                content: Some(m.content.clone()),
            })
            .collect()
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Classify a reqwest failure.
fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else if e.is_decode() {
        ProviderError::InvalidResponse(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

#[async_trait]
impl lugang_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(format!(
                "no API key set for {}",
                self.name
            )));
        }

        let url = self.endpoint();
        let body = ApiRequest {
            model: &request.model,
            messages: Self::to_api_messages(&request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(provider = %self.name, status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(transport_error)?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let model = if api_response.model.is_empty() {
            request.model
        } else {
            api_response.model
        };

        Ok(ProviderResponse {
            content: choice.message.content.unwrap_or_default(),
            model,
            usage,
        })
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use lugang_core::Provider;

    /// Serve `router` on an ephemeral port and return its `/v1` base URL.
    async fn spawn_upstream(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn sample_request() -> ProviderRequest {
        ProviderRequest::new(
            "deepseek-chat",
            vec![Message::system("context"), Message::user("香港股票交易时间是什么？")],
        )
    }

    #[test]
    fn deepseek_constructor() {
        let provider = OpenAiCompatProvider::deepseek("sk-test");
        assert_eq!(provider.name(), "deepseek");
        assert_eq!(provider.endpoint(), "https://api.deepseek.com/v1/chat/completions");
        assert!(provider.is_configured());
    }

    #[test]
    fn qwen_constructor() {
        let provider = OpenAiCompatProvider::qwen("");
        assert_eq!(provider.name(), "qwen");
        assert_eq!(
            provider.endpoint(),
            "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"
        );
        assert!(!provider.is_configured());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = OpenAiCompatProvider::new("custom", "http://localhost:9000/v1/", "k");
        assert_eq!(provider.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn message_conversion() {
        let api_messages = OpenAiCompatProvider::to_api_messages(&sample_request().messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn request_body_shape() {
        let req = sample_request();
        let body = ApiRequest {
            model: &req.model,
            messages: OpenAiCompatProvider::to_api_messages(&req.messages),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][1]["content"], "香港股票交易时间是什么？");
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "deepseek-chat",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "9:30开市"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("9:30开市"));
        assert_eq!(parsed.usage.unwrap().total_tokens, 16);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        // Unroutable base URL: a network attempt would not return NotConfigured.
        let provider = OpenAiCompatProvider::new("deepseek", "http://192.0.2.1/v1", "");
        let err = provider.complete(sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn successful_completion_sends_expected_payload() {
        let router = axum::Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let content = format!(
                    "{}|{}|{}|{}",
                    auth, body["model"], body["max_tokens"], body["messages"][0]["role"]
                );
                Json(serde_json::json!({
                    "model": "deepseek-chat",
                    "choices": [{"message": {"role": "assistant", "content": content}}],
                    "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
                }))
            }),
        );
        let base = spawn_upstream(router).await;
        let provider = OpenAiCompatProvider::new("deepseek", base, "sk-test");

        let response = provider.complete(sample_request()).await.unwrap();
        assert_eq!(response.content, r#"Bearer sk-test|"deepseek-chat"|500|"system""#);
        assert_eq!(response.model, "deepseek-chat");
        assert_eq!(response.usage.unwrap().total_tokens, 2);
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let router = axum::Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let base = spawn_upstream(router).await;
        let provider = OpenAiCompatProvider::new("qwen", base, "sk-test");

        let err = provider.complete(sample_request()).await.unwrap_err();
        match err {
            ProviderError::ApiError { status_code, message } => {
                assert_eq!(status_code, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_body_is_invalid_response() {
        let router = axum::Router::new()
            .route("/v1/chat/completions", post(|| async { "not json" }));
        let base = spawn_upstream(router).await;
        let provider = OpenAiCompatProvider::new("qwen", base, "sk-test");

        let err = provider.complete(sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let router = axum::Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(serde_json::json!({"model": "m", "choices": []})) }),
        );
        let base = spawn_upstream(router).await;
        let provider = OpenAiCompatProvider::new("qwen", base, "sk-test");

        let err = provider.complete(sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let router = axum::Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let base = spawn_upstream(router).await;
        let provider = OpenAiCompatProvider::new("deepseek", base, "sk-test")
            .with_timeout(Duration::from_millis(200));

        let err = provider.complete(sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)), "{err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OpenAiCompatProvider::new("deepseek", format!("http://{addr}/v1"), "sk-test");
        let err = provider.complete(sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)), "{err:?}");
    }
}

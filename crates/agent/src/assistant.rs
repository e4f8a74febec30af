//! The assistant: one question in, one [`QueryResponse`] out.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use lugang_config::AppConfig;
use lugang_core::message::Message;
use lugang_core::provider::ProviderRequest;
use lugang_core::query::source_label;
use lugang_core::{
    ANSWER_CONFIDENCE, Classification, ProviderError, QueryRequest, QueryResponse, classify,
};
use lugang_knowledge::{KnowledgeBase, KnowledgeError};
use lugang_providers::{ProviderRouter, build_from_config};
use tracing::{info, warn};
use uuid::Uuid;

use crate::prompt::{render_failure, system_prompt};

/// Runs the query pipeline against a knowledge base and a provider router.
///
/// Holds no mutable state, so one instance serves any number of
/// concurrent requests.
pub struct Assistant {
    /// Upstream clients keyed by provider kind
    router: Arc<ProviderRouter>,

    /// Read-only fact table
    knowledge: Arc<KnowledgeBase>,

    /// Temperature sent upstream
    temperature: f32,

    /// Max tokens per upstream response
    max_tokens: u32,
}

impl Assistant {
    /// Create an assistant with the default sampling settings.
    pub fn new(router: Arc<ProviderRouter>, knowledge: Arc<KnowledgeBase>) -> Self {
        let defaults = AppConfig::default();
        Self {
            router,
            knowledge,
            temperature: defaults.default_temperature,
            max_tokens: defaults.default_max_tokens,
        }
    }

    /// Build providers and knowledge from configuration.
    ///
    /// Uses the built-in table unless `knowledge.path` is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, KnowledgeError> {
        let knowledge = match &config.knowledge.path {
            Some(path) => KnowledgeBase::load_from(Path::new(path))?,
            None => KnowledgeBase::builtin().clone(),
        };
        Ok(Self::new(Arc::new(build_from_config(config)), Arc::new(knowledge))
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Answer a question.
    ///
    /// Never fails: an upstream failure becomes the answer text and is
    /// tagged in `upstream_error`.
    pub async fn answer(&self, request: &QueryRequest) -> QueryResponse {
        let query_id = Uuid::new_v4();
        let context = self.knowledge.search(
            &request.question,
            request.knowledge_base,
            request.user_type,
        );
        let Classification { provider: kind, .. } = classify(&request.question);
        let model = self.router.model_for(kind);

        info!(
            %query_id,
            provider = %kind,
            model = %model,
            scope = %request.knowledge_base,
            "Routing question"
        );

        let outcome = match self.router.get(kind) {
            Some(provider) => {
                let provider_request = ProviderRequest {
                    model: model.clone(),
                    messages: vec![
                        Message::system(system_prompt(&context)),
                        Message::user(&request.question),
                    ],
                    temperature: self.temperature,
                    max_tokens: self.max_tokens,
                };
                provider.complete(provider_request).await
            }
            None => Err(ProviderError::NotConfigured(format!(
                "no provider registered for {kind}"
            ))),
        };

        let (answer, upstream_error) = match outcome {
            Ok(response) => (response.content, None),
            Err(e) => {
                warn!(%query_id, provider = %kind, error = %e, "Upstream call failed");
                (render_failure(kind, &e), Some(e.kind().to_string()))
            }
        };

        QueryResponse {
            answer,
            source: source_label(request.knowledge_base),
            confidence: ANSWER_CONFIDENCE,
            language: request.language,
            timestamp: Utc::now(),
            ai_service: format!("{} (Direct API)", kind.title()),
            model_used: model,
            query_id,
            upstream_error,
        }
    }
}

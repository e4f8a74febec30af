//! Provider router: maps a [`ProviderKind`] to its client and model.
//!
//! Built once at startup from configuration and shared read-only.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use lugang_config::AppConfig;
use lugang_core::ProviderKind;
use lugang_core::provider::Provider;

use crate::openai_compat::OpenAiCompatProvider;

struct Route {
    provider: Arc<dyn Provider>,
    model: String,
}

/// Routes LLM requests to the correct provider.
#[derive(Default)]
pub struct ProviderRouter {
    routes: HashMap<ProviderKind, Route>,
}

impl ProviderRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider and the model it should be asked for.
    pub fn register(
        &mut self,
        kind: ProviderKind,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
    ) {
        self.routes.insert(
            kind,
            Route {
                provider,
                model: model.into(),
            },
        );
    }

    /// Get the provider registered for `kind`.
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn Provider>> {
        self.routes.get(&kind).map(|r| r.provider.clone())
    }

    /// Model name for `kind`, falling back to the built-in default.
    pub fn model_for(&self, kind: ProviderKind) -> String {
        self.routes
            .get(&kind)
            .map(|r| r.model.clone())
            .unwrap_or_else(|| kind.default_model().to_string())
    }

    /// Whether `kind` is registered with a usable API key.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.routes
            .get(&kind)
            .is_some_and(|r| r.provider.is_configured())
    }

    /// Registered kinds, in [`ProviderKind::ALL`] order.
    pub fn list(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| self.routes.contains_key(k))
            .collect()
    }
}

/// Build providers from configuration.
///
/// Both kinds are always registered; a missing API key yields a provider
/// that reports itself unconfigured and fails without a network call.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    for kind in ProviderKind::ALL {
        let provider_config = config.providers.get(kind);
        let api_key = provider_config.api_key.clone().unwrap_or_default();
        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(kind).to_string());

        let provider = OpenAiCompatProvider::new(kind.as_str(), base_url, api_key)
            .with_timeout(timeout);

        tracing::debug!(
            provider = %kind,
            configured = config.has_api_key(kind),
            "Registered provider"
        );
        router.register(kind, Arc::new(provider), config.model_for(kind));
    }

    router
}

/// Get the default base URL for a provider kind.
pub fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Deepseek => "https://api.deepseek.com/v1",
        ProviderKind::Qwen => "https://dashscope.aliyuncs.com/compatible-mode/v1",
    }
}

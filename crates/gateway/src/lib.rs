//! HTTP API gateway for Lu-Gang Connect.
//!
//! Exposes the welcome and health endpoints at the root and the query,
//! knowledge and demo API under `/api/v1`.
//!
//! Built on Axum. State is immutable after startup and shared through an
//! `Arc`, so handlers never take a lock.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, extract::State, response::Json, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use lugang_agent::Assistant;
use lugang_config::AppConfig;
use lugang_core::ProviderKind;

/// Request body limit for the JSON API.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub assistant: Assistant,
    pub allowed_origins: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            allowed_origins: vec!["*".into()],
            started_at: Utc::now(),
        }
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// `configured` / `not_configured` for every provider kind.
    pub fn provider_status(&self) -> Vec<(ProviderKind, &'static str)> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| (kind, configured_label(self.assistant.router().is_configured(kind))))
            .collect()
    }
}

pub(crate) fn configured_label(configured: bool) -> &'static str {
    if configured { "configured" } else { "not_configured" }
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: root routes plus the v1 API.
///
/// Layers applied:
/// - CORS from `allowed_origins` (`"*"` allows any origin)
/// - Request body size limit (64 KiB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .nest("/api/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS policy for the configured origins.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(values))
}

/// Start the gateway HTTP server.
///
/// Builds the assistant (providers and knowledge base) once and serves
/// until Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let assistant = Assistant::from_config(&config)?;
    let state = Arc::new(
        GatewayState::new(assistant).with_allowed_origins(config.gateway.allowed_origins.clone()),
    );

    for (kind, status) in state.provider_status() {
        info!(provider = %kind, status, "Provider status");
    }
    info!(
        knowledge_items = state.assistant.knowledge().total_items(),
        "Knowledge base ready"
    );

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "欢迎使用鲁港通智能双语知识库系统",
        "welcome": "Welcome to Lu-Gang Connect Intelligent Bilingual Knowledge Base System",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "连接香港与山东的智能信息桥梁",
        "features": [
            "Deepseek AI智能问答 (商务金融)",
            "Qwen AI智能问答 (文化教育)",
            "双向知识库查询 (香港⇄山东)",
            "多语言支持 (中文/English/粤语)",
            "用户角色定制 (商务/投资/学生/访客)",
        ],
        "ai_services": ["Deepseek (商务)", "Qwen (文化)"],
        "knowledge_bases": ["北向(香港)", "南向(山东)"],
        "timestamp": Utc::now(),
        "endpoints": {
            "智能问答": "/api/v1/query",
            "知识库": "/api/v1/knowledge/{kb_type}",
            "演示接口": "/api/v1/demo",
            "AI服务状态": "/api/v1/ai/status",
            "健康检查": "/health",
        },
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub ai_services: BTreeMap<String, String>,
    pub knowledge_base_status: String,
    pub total_knowledge_items: usize,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime = now.signed_duration_since(state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "healthy".into(),
        service: "lu-gang-connect".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: now,
        uptime_secs: uptime,
        ai_services: state
            .provider_status()
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_string()))
            .collect(),
        knowledge_base_status: "active".into(),
        total_knowledge_items: state.assistant.knowledge().total_items(),
    })
}

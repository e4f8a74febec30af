//! HTTP API v1: question answering, knowledge browsing and demo data.
//!
//! Endpoints:
//!
//! - `POST /api/v1/query`               Answer a question
//! - `GET  /api/v1/info`                System description
//! - `GET  /api/v1/ai/status`           Upstream provider status
//! - `GET  /api/v1/knowledge/{kb_type}` Browse the knowledge table
//! - `GET  /api/v1/demo`                Sample questions
//! - `GET  /api/v1/demo/detailed`       Sample queries with expected routing

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use lugang_core::{ProviderKind, QueryRequest, QueryResponse, Region, Scope};
use lugang_knowledge::{KnowledgeBase, RegionTable};

use crate::{SharedState, configured_label};

/// Questions shown by the demo endpoints.
pub const SAMPLE_QUESTIONS: [&str; 3] = [
    "香港股票交易时间是什么？",
    "山东有什么投资优惠政策？",
    "泰山有什么文化意义？",
];

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/api/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/query", post(query_handler))
        .route("/info", get(info_handler))
        .route("/ai/status", get(ai_status_handler))
        .route("/knowledge/{kb_type}", get(knowledge_handler))
        .route("/demo", get(demo_handler))
        .route("/demo/detailed", get(detailed_demo_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub status: String,
    pub model: String,
    pub endpoint: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AiStatusResponse {
    pub deepseek: ProviderStatus,
    pub qwen: ProviderStatus,
    pub timestamp: DateTime<Utc>,
}

/// Table payload: the whole base or one region.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum KnowledgeData {
    Complete(KnowledgeBase),
    Region(RegionTable),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KnowledgeStatistics {
    Complete {
        northbound_items: usize,
        southbound_items: usize,
    },
    Region {
        total_items: usize,
        categories: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct KnowledgeResponse {
    pub knowledge_base: String,
    pub description: String,
    pub data: KnowledgeData,
    pub statistics: KnowledgeStatistics,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DemoQuery {
    pub question: String,
    pub expected_answer: String,
    pub knowledge_base: Scope,
    pub ai_service: String,
    pub category: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn query_handler(
    State(state): State<SharedState>,
    Json(payload): Json<QueryRequest>,
) -> Json<QueryResponse> {
    info!(
        scope = %payload.knowledge_base,
        language = payload.language.as_str(),
        question_len = payload.question.chars().count(),
        "v1/query request"
    );
    Json(state.assistant.answer(&payload).await)
}

async fn info_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "鲁港通 Lu-Gang Connect",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "智能双语知识库系统 - 连接香港与山东的信息桥梁",
        "architecture": "Deepseek + Qwen + 本地知识库",
        "capabilities": {
            "ai_services": {
                "deepseek": "处理商务、金融、投资、贸易类问题",
                "qwen": "处理文化、教育、旅游、历史类问题",
            },
            "knowledge_bases": {
                "northbound": "香港相关信息 (商务、投资、物流、金融)",
                "southbound": "山东相关信息 (商务、文化、教育、旅游)",
            },
            "languages": ["简体中文", "English", "繁體中文(粤语)"],
            "user_types": ["访客", "商务人士", "投资者", "学生"],
        },
        "status": "运行中",
        "startup_time": state.started_at,
    }))
}

async fn ai_status_handler(State(state): State<SharedState>) -> Json<AiStatusResponse> {
    let router = state.assistant.router();
    let status_of = |kind: ProviderKind| ProviderStatus {
        status: configured_label(router.is_configured(kind)).into(),
        model: router.model_for(kind),
        endpoint: router
            .get(kind)
            .map(|p| p.endpoint())
            .unwrap_or_default(),
    };

    Json(AiStatusResponse {
        deepseek: status_of(ProviderKind::Deepseek),
        qwen: status_of(ProviderKind::Qwen),
        timestamp: Utc::now(),
    })
}

async fn knowledge_handler(
    State(state): State<SharedState>,
    Path(kb_type): Path<String>,
) -> Result<Json<KnowledgeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let scope: Scope = kb_type.parse().map_err(|e| {
        warn!(error = %e, "Rejected knowledge request");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: "无效的知识库类型。支持: northbound, southbound, both".into(),
            }),
        )
    })?;

    let knowledge = state.assistant.knowledge();
    let response = match scope {
        Scope::Both => KnowledgeResponse {
            knowledge_base: "complete".into(),
            description: "鲁港通完整知识库".into(),
            data: KnowledgeData::Complete(knowledge.clone()),
            statistics: KnowledgeStatistics::Complete {
                northbound_items: knowledge.region(Region::Northbound).item_count(),
                southbound_items: knowledge.region(Region::Southbound).item_count(),
            },
            timestamp: Utc::now(),
        },
        Scope::Northbound | Scope::Southbound => {
            let region = scope.regions()[0];
            let table = knowledge.region(region);
            KnowledgeResponse {
                knowledge_base: region.as_str().into(),
                description: format!("鲁港通{}知识库", region.label()),
                data: KnowledgeData::Region(table.clone()),
                statistics: KnowledgeStatistics::Region {
                    total_items: table.item_count(),
                    categories: table.category_names().into_iter().map(String::from).collect(),
                },
                timestamp: Utc::now(),
            }
        }
    };

    Ok(Json(response))
}

/// Local time formatted like `2025-01-01 09:30:00`.
fn demo_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

async fn demo_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "鲁港通系统演示",
        "status": "运行中",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "智能双语知识库 - 连接香港与山东",
        "features": [
            "Deepseek AI (商务金融)",
            "Qwen AI (文化教育)",
            "双向知识库查询",
            "多语言支持",
        ],
        "sample_questions": SAMPLE_QUESTIONS,
        "timestamp": demo_timestamp(),
    }))
}

/// Sample queries with the answer and routing each is expected to get.
pub fn demo_queries() -> Vec<DemoQuery> {
    let entries = [
        (
            "香港股票交易时间为周一至周五上午9:30-12:00，下午1:00-4:00",
            Scope::Northbound,
            "Deepseek (商务金融)",
            "商务金融",
        ),
        (
            "山东自贸区提供多项优惠政策支持港资企业，青岛港连接一带一路贸易网络",
            Scope::Southbound,
            "Deepseek (商务金融)",
            "投资政策",
        ),
        (
            "泰山是五岳之首，世界文化与自然双重遗产，在中华文化中具有重要地位",
            Scope::Southbound,
            "Qwen (文化教育)",
            "文化旅游",
        ),
    ];

    SAMPLE_QUESTIONS
        .iter()
        .zip(entries)
        .map(|(question, (answer, scope, service, category))| DemoQuery {
            question: question.to_string(),
            expected_answer: answer.into(),
            knowledge_base: scope,
            ai_service: service.into(),
            category: category.into(),
        })
        .collect()
}

async fn detailed_demo_handler() -> Json<serde_json::Value> {
    let mut system_features = BTreeMap::new();
    system_features.insert(
        "ai_routing",
        serde_json::json!({
            "deepseek": "自动处理商务、金融、投资、贸易类问题",
            "qwen": "自动处理文化、教育、旅游、历史类问题",
        }),
    );
    system_features.insert(
        "knowledge_coverage",
        serde_json::json!({
            "northbound": "香港商务、金融、投资、物流信息",
            "southbound": "山东商务、文化、教育、旅游信息",
        }),
    );

    Json(serde_json::json!({
        "demo_title": "鲁港通系统详细演示",
        "description": "连接香港与山东的智能信息桥梁，使用Deepseek和Qwen AI提供专业问答服务",
        "sample_queries": demo_queries(),
        "system_features": system_features,
        "usage_example": {
            "endpoint": "/api/v1/query",
            "method": "POST",
            "payload": {
                "question": "香港公司注册需要什么文件？",
                "language": "zh",
                "user_type": "business",
                "knowledge_base": "northbound",
            },
        },
        "timestamp": demo_timestamp(),
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────

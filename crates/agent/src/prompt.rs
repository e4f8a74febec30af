//! Prompt construction and failure rendering.

use lugang_core::{ProviderError, ProviderKind};

const SYSTEM_PROMPT_PREFIX: &str =
    "你是鲁港通智能助手，专门回答香港与山东之间的商务、文化、教育、投资等问题。基于以下知识库信息回答：";

/// System prompt embedding the lookup context.
pub fn system_prompt(context: &str) -> String {
    format!("{SYSTEM_PROMPT_PREFIX}{context}")
}

/// User-visible answer for a failed upstream call.
pub fn render_failure(kind: ProviderKind, error: &ProviderError) -> String {
    let title = kind.title();
    match error {
        ProviderError::NotConfigured(_) => format!("基于鲁港通知识库的回答（{title} API未配置）"),
        ProviderError::ApiError { status_code, .. } => {
            format!("{title} API调用失败 (状态码: {status_code})")
        }
        other => format!("{title} API调用异常: {other}"),
    }
}

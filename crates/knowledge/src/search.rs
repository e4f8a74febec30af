//! Keyword lookup over the flattened candidate list.
//!
//! A fact qualifies when any search keyword appears in the lowercased
//! question *or* in the fact itself. The second haystack means a fact
//! that already names a keyword (e.g. "香港") is eligible for every
//! question, so for the built-in table the result is usually the first
//! five candidates of the scope.

use lugang_core::{Scope, UserType};

use crate::base::KnowledgeBase;

/// Upper bound on facts returned per lookup.
pub const MAX_MATCHES: usize = 5;

/// Keywords spanning both business and culture topics.
pub const SEARCH_KEYWORDS: &[&str] = &[
    "股票", "投资", "公司", "银行", "贸易", "文化", "山东", "香港", "教育", "旅游", "港口", "税收",
    "泰山", "孔子",
];

/// Returned when nothing in scope matched.
pub const FALLBACK_CONTEXT: &str =
    "鲁港通系统为您提供香港与山东之间的商务、文化、教育等信息服务。";

impl KnowledgeBase {
    /// The first [`MAX_MATCHES`] qualifying facts, in candidate order.
    pub fn matches(&self, question: &str, scope: Scope) -> Vec<&str> {
        let question_lower = question.to_lowercase();
        self.candidates(scope)
            .into_iter()
            .filter(|info| {
                SEARCH_KEYWORDS
                    .iter()
                    .any(|k| question_lower.contains(k) || info.contains(k))
            })
            .take(MAX_MATCHES)
            .collect()
    }

    /// Build the context string for a question.
    ///
    /// `_user_type` is accepted for interface compatibility and does not
    /// influence the result.
    pub fn search(&self, question: &str, scope: Scope, _user_type: UserType) -> String {
        let matched = self.matches(question, scope);
        tracing::debug!(scope = %scope, matched = matched.len(), "Knowledge lookup");
        if matched.is_empty() {
            FALLBACK_CONTEXT.to_string()
        } else {
            matched.join(" ")
        }
    }
}

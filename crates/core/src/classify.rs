//! Keyword classifier: picks the upstream provider for a question.
//!
//! Business and finance questions go to Deepseek, culture, education and
//! tourism questions go to Qwen. Business keywords are checked first and
//! win unconditionally; there is no scoring between the two sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Investment, equities, registration, banking, trade, tax, logistics, ports.
pub const BUSINESS_KEYWORDS: &[&str] = &[
    "投资", "股票", "公司", "银行", "贸易", "商务", "金融", "税收", "注册", "开户", "物流", "港口",
];

/// Culture, education, tourism, history, heritage, landmarks, cuisine, arts.
pub const CULTURE_KEYWORDS: &[&str] = &[
    "文化", "教育", "旅游", "历史", "传统", "学校", "大学", "景点", "美食", "艺术", "泰山", "孔子",
];

/// The two upstream LLM services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Business, finance and investment questions (the default)
    Deepseek,
    /// Culture, education and tourism questions
    Qwen,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Deepseek, ProviderKind::Qwen];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Deepseek => "deepseek",
            ProviderKind::Qwen => "qwen",
        }
    }

    /// Capitalized name used in user-facing strings.
    pub fn title(&self) -> &'static str {
        match self {
            ProviderKind::Deepseek => "Deepseek",
            ProviderKind::Qwen => "Qwen",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Deepseek => "deepseek-chat",
            ProviderKind::Qwen => "qwen-turbo",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deepseek" => Ok(ProviderKind::Deepseek),
            "qwen" => Ok(ProviderKind::Qwen),
            other => Err(Error::InvalidValue {
                field: "provider",
                value: other.to_string(),
            }),
        }
    }
}

/// Result of classifying a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub provider: ProviderKind,
    pub model: &'static str,
}

impl Classification {
    fn of(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model(),
        }
    }
}

/// Classify a question into a provider and model.
///
/// The question is lowercased and each keyword is tested as a substring.
/// Keywords are CJK text and need no case folding.
pub fn classify(question: &str) -> Classification {
    let question_lower = question.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| question_lower.contains(k));

    if mentions(BUSINESS_KEYWORDS) {
        return Classification::of(ProviderKind::Deepseek);
    }
    if mentions(CULTURE_KEYWORDS) {
        return Classification::of(ProviderKind::Qwen);
    }
    Classification::of(ProviderKind::Deepseek)
}

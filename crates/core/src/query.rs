//! Query request/response value objects and the enums they carry.
//!
//! Every enum here parses from (and serializes to) the lowercase wire
//! tag the HTTP API and CLI use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Confidence reported for every answer.
pub const ANSWER_CONFIDENCE: f32 = 0.85;

/// One of the two static knowledge partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Hong Kong information
    Northbound,
    /// Shandong information
    Southbound,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Northbound, Region::Southbound];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Northbound => "northbound",
            Region::Southbound => "southbound",
        }
    }

    /// Display label used in descriptions, e.g. `香港(北向)`.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Northbound => "香港(北向)",
            Region::Southbound => "山东(南向)",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-selected knowledge partition(s) to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Northbound,
    Southbound,
    #[default]
    Both,
}

impl Scope {
    /// Regions covered by this scope, northbound first.
    pub fn regions(&self) -> &'static [Region] {
        match self {
            Scope::Northbound => &[Region::Northbound],
            Scope::Southbound => &[Region::Southbound],
            Scope::Both => &Region::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Northbound => "northbound",
            Scope::Southbound => "southbound",
            Scope::Both => "both",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "northbound" => Ok(Scope::Northbound),
            "southbound" => Ok(Scope::Southbound),
            "both" => Ok(Scope::Both),
            other => Err(Error::InvalidScope(other.to_string())),
        }
    }
}

/// Answer language requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh")]
    Zh,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-hk")]
    ZhHk,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
            Language::ZhHk => "zh-hk",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            "zh-hk" => Ok(Language::ZhHk),
            other => Err(Error::InvalidValue {
                field: "language",
                value: other.to_string(),
            }),
        }
    }
}

/// Who is asking. Carried through the pipeline but does not change
/// retrieval or routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Visitor,
    Business,
    Investor,
    Student,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Visitor => "visitor",
            UserType::Business => "business",
            UserType::Investor => "investor",
            UserType::Student => "student",
        }
    }
}

impl FromStr for UserType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visitor" => Ok(UserType::Visitor),
            "business" => Ok(UserType::Business),
            "investor" => Ok(UserType::Investor),
            "student" => Ok(UserType::Student),
            other => Err(Error::InvalidValue {
                field: "user_type",
                value: other.to_string(),
            }),
        }
    }
}

/// A single question submitted to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,

    #[serde(default)]
    pub language: Language,

    #[serde(default, alias = "userType")]
    pub user_type: UserType,

    #[serde(default, alias = "scope")]
    pub knowledge_base: Scope,
}

impl QueryRequest {
    /// A request with every optional field at its default.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            language: Language::default(),
            user_type: UserType::default(),
            knowledge_base: Scope::default(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.knowledge_base = scope;
        self
    }

    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// The assistant's answer. Always has this shape, even when the
/// upstream call failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub source: String,
    pub confidence: f32,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
    pub ai_service: String,
    pub model_used: String,
    pub query_id: Uuid,

    /// Failure class of the upstream call, when it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

/// Source label for answers drawn from `scope`, e.g. `鲁港通both知识库`.
pub fn source_label(scope: Scope) -> String {
    format!("鲁港通{scope}知识库")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_known_tags() {
        assert_eq!("northbound".parse::<Scope>().unwrap(), Scope::Northbound);
        assert_eq!("southbound".parse::<Scope>().unwrap(), Scope::Southbound);
        assert_eq!("both".parse::<Scope>().unwrap(), Scope::Both);
    }

    #[test]
    fn scope_rejects_unknown_tag() {
        let err = "Both".parse::<Scope>().unwrap_err();
        assert!(matches!(err, Error::InvalidScope(ref s) if s == "Both"));
    }

    #[test]
    fn both_scope_orders_northbound_first() {
        assert_eq!(Scope::Both.regions(), &[Region::Northbound, Region::Southbound]);
        assert_eq!(Scope::Southbound.regions(), &[Region::Southbound]);
    }

    #[test]
    fn request_defaults_apply() {
        let req: QueryRequest = serde_json::from_str(r#"{"question":"你好"}"#).unwrap();
        assert_eq!(req.language, Language::Zh);
        assert_eq!(req.user_type, UserType::Visitor);
        assert_eq!(req.knowledge_base, Scope::Both);
    }

    #[test]
    fn request_accepts_aliases() {
        let req: QueryRequest = serde_json::from_str(
            r#"{"question":"q","language":"zh-hk","userType":"investor","scope":"southbound"}"#,
        )
        .unwrap();
        assert_eq!(req.language, Language::ZhHk);
        assert_eq!(req.user_type, UserType::Investor);
        assert_eq!(req.knowledge_base, Scope::Southbound);
    }

    #[test]
    fn request_rejects_unknown_scope() {
        let result: Result<QueryRequest, _> =
            serde_json::from_str(r#"{"question":"q","knowledge_base":"auto"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn language_and_user_type_parse() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("student".parse::<UserType>().unwrap(), UserType::Student);
        assert!("fr".parse::<Language>().is_err());
        assert!("admin".parse::<UserType>().is_err());
    }

    #[test]
    fn source_label_embeds_scope_tag() {
        assert_eq!(source_label(Scope::Northbound), "鲁港通northbound知识库");
    }

    #[test]
    fn response_omits_missing_upstream_error() {
        let resp = QueryResponse {
            answer: "a".into(),
            source: source_label(Scope::Both),
            confidence: ANSWER_CONFIDENCE,
            language: Language::En,
            timestamp: Utc::now(),
            ai_service: "Qwen (Direct API)".into(),
            model_used: "qwen-turbo".into(),
            query_id: Uuid::new_v4(),
            upstream_error: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("upstream_error").is_none());
        assert_eq!(json["language"], "en");
    }
}

//! Error types for the Lu-Gang Connect domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Upstream failures get their own enum so callers can tell them apart.

use thiserror::Error;

/// The top-level error type for Lu-Gang Connect operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Request validation ---
    #[error("Invalid knowledge base type '{0}', expected one of: northbound, southbound, both")]
    InvalidScope(String),

    #[error("Invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single upstream LLM call.
///
/// Never aborts a query: the assistant turns each variant into a
/// user-visible answer string.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Stable machine-readable tag for this failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "not_configured",
            Self::ApiError { .. } => "bad_status",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "transport",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 502,
            message: "Bad gateway".into(),
        });
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad gateway"));
    }

    #[test]
    fn invalid_scope_lists_choices() {
        let err = Error::InvalidScope("east".into());
        let text = err.to_string();
        assert!(text.contains("east"));
        assert!(text.contains("northbound"));
    }

    #[test]
    fn provider_error_kinds_are_distinct() {
        let kinds = [
            ProviderError::NotConfigured("deepseek".into()).kind(),
            ProviderError::ApiError { status_code: 500, message: String::new() }.kind(),
            ProviderError::Timeout("30s".into()).kind(),
            ProviderError::Network("refused".into()).kind(),
            ProviderError::InvalidResponse("no choices".into()).kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

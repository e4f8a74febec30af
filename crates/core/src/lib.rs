//! # Lu-Gang Connect Core
//!
//! Domain types, the keyword classifier, and the provider trait for the
//! Lu-Gang Connect assistant. This crate has **no framework dependencies**:
//! every other crate depends inward on it.
//!
//! The classifier is a pure function and is safe to call from any number
//! of concurrent requests.

pub mod classify;
pub mod error;
pub mod message;
pub mod provider;
pub mod query;

// Re-export key types at crate root for ergonomics
pub use classify::{Classification, ProviderKind, classify};
pub use error::{Error, ProviderError, Result};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use query::{
    ANSWER_CONFIDENCE, Language, QueryRequest, QueryResponse, Region, Scope, UserType, source_label,
};

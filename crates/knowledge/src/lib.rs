//! Knowledge base for Lu-Gang Connect.
//!
//! Holds the Hong Kong (northbound) and Shandong (southbound) fact tables
//! and the keyword lookup that turns a question into a context string
//! for the upstream model.

pub mod base;
pub mod search;

use std::path::PathBuf;

pub use base::{Category, KnowledgeBase, RegionTable};
pub use search::{FALLBACK_CONTEXT, MAX_MATCHES, SEARCH_KEYWORDS};

/// Errors raised while loading a knowledge file.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse knowledge file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Knowledge file contains no entries")]
    Empty,
}

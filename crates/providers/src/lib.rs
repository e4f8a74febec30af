//! LLM Provider implementations for Lu-Gang Connect.
//!
//! All providers implement the `lugang_core::Provider` trait.
//! The router maps each [`lugang_core::ProviderKind`] to its client.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config, default_base_url};

//! Subcommand implementations.

pub mod ask;
pub mod classify;
pub mod config_cmd;
pub mod doctor;
pub mod knowledge;
pub mod onboard;
pub mod search;
pub mod serve;
pub mod status;

use lugang_config::AppConfig;
use lugang_knowledge::{KnowledgeBase, KnowledgeError};
use std::path::Path;

/// Load the effective configuration (file plus environment overrides).
pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    tracing::debug!(path = %AppConfig::config_path().display(), "Loading config");
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// The configured knowledge file, or the built-in table.
pub(crate) fn load_knowledge(config: &AppConfig) -> Result<KnowledgeBase, KnowledgeError> {
    match &config.knowledge.path {
        Some(path) => KnowledgeBase::load_from(Path::new(path)),
        None => Ok(KnowledgeBase::builtin().clone()),
    }
}
